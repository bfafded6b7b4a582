mod add_validator;
mod create;

use std::io;

use clap::{crate_version, Command};

const APP_NAME: &str = "subnetctl";

fn main() -> io::Result<()> {
    let matches = Command::new(APP_NAME)
        .version(crate_version!())
        .about("Creates subnet configurations and adds subnet validators")
        .subcommands(vec![create::command(), add_validator::command()])
        .get_matches();

    match matches.subcommand() {
        Some((create::NAME, sub_matches)) => {
            let opts = create::Flags {
                log_level: sub_matches
                    .get_one::<String>("LOG_LEVEL")
                    .unwrap_or(&String::from("info"))
                    .clone(),
                base_dir: sub_matches.get_one::<String>("BASE_DIR").cloned(),
                subnet_name: sub_matches
                    .get_one::<String>("SUBNET_NAME")
                    .unwrap_or(&String::new())
                    .clone(),
                genesis_file: sub_matches.get_one::<String>("GENESIS").cloned(),
                vm_file: sub_matches.get_one::<String>("VM").cloned(),
                use_subnet_evm: sub_matches.get_flag("EVM"),
                use_custom: sub_matches.get_flag("CUSTOM"),
                force: sub_matches.get_flag("FORCE"),
            };
            create::execute(opts)
        }

        Some((add_validator::NAME, sub_matches)) => {
            let opts = add_validator::Flags {
                log_level: sub_matches
                    .get_one::<String>("LOG_LEVEL")
                    .unwrap_or(&String::from("info"))
                    .clone(),
                base_dir: sub_matches.get_one::<String>("BASE_DIR").cloned(),
                subnet_name: sub_matches
                    .get_one::<String>("SUBNET_NAME")
                    .unwrap_or(&String::new())
                    .clone(),
                key_name: sub_matches.get_one::<String>("KEY").cloned(),
                node_id: sub_matches.get_one::<String>("NODE_ID").cloned(),
                weight: *sub_matches.get_one::<i64>("WEIGHT").unwrap_or(&0),
                start_time: sub_matches.get_one::<String>("START_TIME").cloned(),
                staking_period: sub_matches
                    .get_one::<std::time::Duration>("STAKING_PERIOD")
                    .copied(),
            };
            add_validator::execute(opts)
        }

        _ => unreachable!("unknown subcommand"),
    }
}
