use std::{io, path::PathBuf, time::Duration};

use chrono::Utc;
use clap::{value_parser, Arg, Command};
use serde::{Deserialize, Serialize};
use subnet_ops::{
    add_validator::{self, Collaborators, Request},
    app::App,
    deployer::PublicDeployer,
    gateway::PlatformClient,
    prompt::DialoguerPrompter,
    ux,
};

pub const NAME: &str = "add-validator";

/// Defines "add-validator" option.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
pub struct Flags {
    pub log_level: String,
    pub base_dir: Option<String>,
    pub subnet_name: String,
    pub key_name: Option<String>,
    pub node_id: Option<String>,
    pub weight: i64,
    pub start_time: Option<String>,
    pub staking_period: Option<Duration>,
}

/// Parses durations such as "8760h" or "1h30m".
#[derive(Clone, Debug)]
pub struct DurationParser;

impl clap::builder::TypedValueParser for DurationParser {
    type Value = Duration;

    fn parse_ref(
        &self,
        _cmd: &Command,
        _arg: Option<&Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let str = value.to_str().unwrap_or_default();
        humantime::parse_duration(str.trim()).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("duration parsing failed ({})", e),
            )
        })
    }
}

pub fn command() -> Command {
    Command::new(NAME)
        .visible_alias("addValidator")
        .about("Allows a primary network validator to validate a deployed subnet")
        .arg(
            Arg::new("SUBNET_NAME")
                .help("Sets the name of the subnet (as given to 'create')")
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
            Arg::new("KEY")
                .long("key")
                .short('k')
                .help("Sets the name of the key in the key directory to pay the transaction fee with")
                .required(false)
                .num_args(1),
        )
        .arg(
            Arg::new("NODE_ID")
                .long("nodeID")
                .help("Sets the node ID of the validator to add")
                .required(false)
                .num_args(1),
        )
        .arg(
            Arg::new("WEIGHT")
                .long("weight")
                .help("Sets the validator stake weight (between 1 and 100)")
                .required(false)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("START_TIME")
                .long("start-time")
                .help("Sets the UTC start time of validation, in 'YYYY-MM-DD HH:MM:SS' format")
                .required(false)
                .num_args(1),
        )
        .arg(
            Arg::new("STAKING_PERIOD")
                .long("staking-period")
                .help("Sets how long the validator validates the subnet (e.g., 8760h)")
                .required(false)
                .num_args(1)
                .value_parser(DurationParser {}),
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
        key_name: opts.key_name,
        node_id: opts.node_id,
        weight: opts.weight,
        start_time: opts.start_time,
        staking_period: opts.staking_period,
    };
    let prompter = DialoguerPrompter::new();
    let gateway = PlatformClient::default();
    let deployer = PublicDeployer::default();
    let outcome = add_validator::execute(
        &req,
        &Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        },
        Utc::now(),
    )?;

    ux::print_step(&format!(
        "Added {} as a validator of subnet {} on {} (tx {})",
        outcome.node_id, outcome.subnet_id, outcome.network, outcome.tx_id
    ))?;
    Ok(())
}

/// RUST_LOG=debug cargo test --package subnetctl --bin subnetctl -- add_validator::test_command --exact --show-output
#[test]
fn test_command() {
    let m = command()
        .try_get_matches_from([
            NAME,
            "mysubnet",
            "-k",
            "mykey",
            "--nodeID",
            "NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg",
            "--weight",
            "30",
            "--staking-period",
            "8760h",
        ])
        .unwrap();
    assert_eq!(m.get_one::<String>("SUBNET_NAME").unwrap(), "mysubnet");
    assert_eq!(m.get_one::<String>("KEY").unwrap(), "mykey");
    assert_eq!(*m.get_one::<i64>("WEIGHT").unwrap(), 30);
    assert_eq!(
        *m.get_one::<Duration>("STAKING_PERIOD").unwrap(),
        Duration::from_secs(8760 * 3600)
    );
    assert!(m.get_one::<String>("START_TIME").is_none());

    assert!(command()
        .try_get_matches_from([NAME, "mysubnet", "--staking-period", "10 parsecs"])
        .is_err());
    assert!(command().try_get_matches_from([NAME]).is_err());
}
