use std::{io, path::PathBuf};

use clap::{Arg, Command};
use serde::{Deserialize, Serialize};
use subnet_ops::{
    app::App,
    create::{self, Request},
    prompt::DialoguerPrompter,
    ux,
};

pub const NAME: &str = "create";

/// Defines "create" option.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
pub struct Flags {
    pub log_level: String,
    pub base_dir: Option<String>,
    pub subnet_name: String,
    pub genesis_file: Option<String>,
    pub vm_file: Option<String>,
    pub use_subnet_evm: bool,
    pub use_custom: bool,
    pub force: bool,
}

pub fn command() -> Command {
    Command::new(NAME)
        .about("Creates a new subnet configuration (genesis and sidecar)")
        .arg(
            Arg::new("SUBNET_NAME")
                .help("Sets the name of the subnet")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("LOG_LEVEL")
                .long("log-level")
                .short('l')
                .help("Sets the log level")
                .required(false)
                .num_args(1)
                .value_parser(["debug", "info"])
                .default_value("info"),
        )
        .arg(
            Arg::new("BASE_DIR")
                .long("base-dir")
                .help("Sets the directory holding keys and subnet configurations (default '$HOME/.avalanche-cli')")
                .required(false)
                .num_args(1),
        )
        .arg(
            Arg::new("GENESIS")
                .long("genesis")
                .help("Sets the file path of an existing genesis to import")
                .required(false)
                .num_args(1),
        )
        .arg(
            Arg::new("VM")
                .long("vm")
                .help("Sets the file path of a custom VM binary")
                .required(false)
                .num_args(1),
        )
        .arg(
            Arg::new("EVM")
                .long("evm")
                .help("Uses Subnet-EVM as the subnet VM")
                .required(false)
                .num_args(0),
        )
        .arg(
            Arg::new("CUSTOM")
                .long("custom")
                .help("Uses a custom VM as the subnet VM")
                .required(false)
                .num_args(0),
        )
        .arg(
            Arg::new("FORCE")
                .long("force")
                .short('f')
                .help("Overwrites the existing configuration if one exists")
                .required(false)
                .num_args(0),
        )
}

pub fn execute(opts: Flags) -> io::Result<()> {
    // ref. <https://github.com/env-logger-rs/env_logger/issues/47>
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, opts.log_level),
    );

    let app = match &opts.base_dir {
        Some(d) => App::new(PathBuf::from(d)),
        None => App::from_home()?,
    };
    log::info!("using base directory '{}'", app.base_dir().display());

    let req = Request {
        subnet_name: opts.subnet_name,
        genesis_file: opts.genesis_file.map(PathBuf::from),
        vm_file: opts.vm_file.map(PathBuf::from),
        use_subnet_evm: opts.use_subnet_evm,
        use_custom: opts.use_custom,
        force: opts.force,
    };
    let sc = create::execute(&req, &app, &DialoguerPrompter::new())?;

    ux::print_to_user(&format!(
        "Genesis written to '{}', sidecar written to '{}'",
        app.genesis_path(&sc.name).display(),
        app.sidecar_path(&sc.name).display()
    ))?;
    Ok(())
}

/// RUST_LOG=debug cargo test --package subnetctl --bin subnetctl -- create::test_command --exact --show-output
#[test]
fn test_command() {
    let m = command()
        .try_get_matches_from([NAME, "mysubnet", "--evm", "-f"])
        .unwrap();
    assert_eq!(m.get_one::<String>("SUBNET_NAME").unwrap(), "mysubnet");
    assert!(m.get_flag("EVM"));
    assert!(!m.get_flag("CUSTOM"));
    assert!(m.get_flag("FORCE"));
    assert_eq!(m.get_one::<String>("LOG_LEVEL").unwrap(), "info");
}
