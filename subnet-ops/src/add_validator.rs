//! "addValidator" workflow: whitelists a primary network validator on a
//! deployed subnet.

use std::{str::FromStr, time::Duration};

use avalanche_types::ids::{self, node};
use chrono::{DateTime, Utc};
use log::info;

use crate::{
    app::App,
    constants::DEFAULT_STAKE_WEIGHT,
    deployer::{AddValidatorTx, Deployer},
    errors::{Error, Result},
    gateway::ValidatorSetGateway,
    network::Network,
    prompt::Prompter,
    resolver::{Resolver, TimeFlags, ValidationWindow, CUSTOM_OPTION},
    timefmt, ux, validate,
};

pub const MAINNET_COMING_SOON: &str = "Mainnet (coming soon)";

/// Inputs collected from flags; anything unset is prompted for.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub subnet_name: String,
    pub key_name: Option<String>,
    pub node_id: Option<String>,
    /// Zero means unset.
    pub weight: i64,
    pub start_time: Option<String>,
    pub staking_period: Option<Duration>,
}

/// What was submitted.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub key_name: String,
    pub network: Network,
    pub subnet_id: ids::Id,
    pub node_id: node::Id,
    pub weight: u64,
    pub window: ValidationWindow,
    pub tx_id: ids::Id,
}

pub struct Collaborators<'a> {
    pub app: &'a App,
    pub prompter: &'a dyn Prompter,
    pub gateway: &'a dyn ValidatorSetGateway,
    pub deployer: &'a dyn Deployer,
}

pub fn execute(req: &Request, c: &Collaborators<'_>, now: DateTime<Utc>) -> Result<Outcome> {
    let key_name = match req.key_name.as_deref().filter(|k| !k.is_empty()) {
        Some(k) => k.to_string(),
        None => capture_key_name(c.app, c.prompter)?,
    };

    let network = capture_network(c.prompter)?;

    validate::subnet_name(&req.subnet_name)?;
    let sc = c.app.load_sidecar(&req.subnet_name)?;
    let subnet_id = sc.subnet_id(network)?;
    info!(
        "subnet {:?} has ID {subnet_id} on {network}",
        req.subnet_name
    );

    let node_id = match req.node_id.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => node::Id::from_str(s).map_err(|e| Error::parse("node ID", s, e))?,
        None => c
            .prompter
            .capture_node_id("What is the NodeID of the validator you'd like to whitelist?")?,
    };

    let weight = if req.weight == 0 {
        capture_weight(c.prompter)?
    } else {
        validate::stake_weight(req.weight)?;
        req.weight as u64
    };

    let flags = TimeFlags {
        start_time: req.start_time.clone(),
        staking_period: req.staking_period,
    };
    let window = Resolver::new(c.prompter, c.gateway, now).resolve(&flags, network, &node_id)?;
    let end = window.end()?;

    for line in [
        format!("NodeID: {node_id}"),
        format!("Network: {network}"),
        format!("Start time: {}", timefmt::format(&window.start)),
        format!("End time: {}", timefmt::format(&end)),
        format!("Weight: {weight}"),
    ] {
        ux::print_to_user(&line)?;
    }
    ux::print_step(
        "Inputs complete, issuing transaction to add the provided validator information...",
    )?;

    let tx = AddValidatorTx {
        subnet_id,
        node_id: node_id.clone(),
        weight,
        start: window.start,
        duration: window.duration,
    };
    let tx_id = c
        .deployer
        .add_validator(&c.app.key_path(&key_name), network, &tx)?;

    Ok(Outcome {
        key_name,
        network,
        subnet_id,
        node_id,
        weight,
        window,
        tx_id,
    })
}

fn capture_key_name(app: &App, prompter: &dyn Prompter) -> Result<String> {
    let keys = app.key_names()?;
    prompter.capture_list(
        "Which private key should be used to issue the transaction?",
        &keys,
    )
}

fn capture_network(prompter: &dyn Prompter) -> Result<Network> {
    let options = [
        Network::Fuji.to_string(),
        MAINNET_COMING_SOON.to_string(),
    ];
    let selected = prompter.capture_list(
        "Choose a network to deploy on. This command only supports Fuji currently.",
        &options,
    )?;
    let network = if selected == MAINNET_COMING_SOON {
        Network::Mainnet
    } else {
        Network::from_str(&selected)?
    };
    if !network.is_supported() {
        return Err(Error::NetworkNotSupported(network.to_string()));
    }
    Ok(network)
}

fn capture_weight(prompter: &dyn Prompter) -> Result<u64> {
    let default_option = format!("Default ({DEFAULT_STAKE_WEIGHT})");
    let txt = "What stake weight would you like to assign to the validator?";
    let options = [default_option.clone(), CUSTOM_OPTION.to_string()];
    if prompter.capture_list(txt, &options)? == default_option {
        return Ok(DEFAULT_STAKE_WEIGHT as u64);
    }
    let w = prompter.capture_weight(txt)?;
    validate::stake_weight(w as i64)?;
    Ok(w)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs, path::Path};

    use chrono::TimeZone;

    use super::*;
    use crate::{
        gateway::ValidatorRecord,
        resolver::{DEFAULT_DURATION_OPTION, DEFAULT_START_OPTION},
        sidecar::{NetworkData, Sidecar, VmType},
        testutil::{node, ScriptedPrompter, StaticGateway, NODE_A, NODE_B},
    };

    #[derive(Default)]
    struct RecordingDeployer {
        submitted: RefCell<Vec<(String, Network, AddValidatorTx)>>,
    }

    impl Deployer for RecordingDeployer {
        fn add_validator(
            &self,
            key_path: &Path,
            network: Network,
            tx: &AddValidatorTx,
        ) -> Result<ids::Id> {
            self.submitted
                .borrow_mut()
                .push((key_path.display().to_string(), network, tx.clone()));
            Ok(ids::Id::from_slice(&[9u8; 32]))
        }
    }

    fn setup(dir: &Path) -> (App, ids::Id) {
        let app = App::new(dir);
        fs::create_dir_all(app.key_dir()).unwrap();
        fs::write(app.key_path("mykey"), "x").unwrap();

        let subnet_id = ids::Id::from_slice(&[7u8; 32]);
        let mut sc = Sidecar::new("mysubnet", VmType::SubnetEvm);
        sc.networks.insert(
            Network::Fuji.to_string(),
            NetworkData {
                subnet_id: subnet_id.to_string(),
                blockchain_id: String::new(),
            },
        );
        app.create_sidecar(&sc).unwrap();
        (app, subnet_id)
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1690000000, 0).unwrap()
    }

    /// RUST_LOG=debug cargo test --package subnet-ops --lib -- add_validator::tests::test_prompted_flow --exact --show-output
    #[test]
    fn test_prompted_flow() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir().unwrap();
        let (app, subnet_id) = setup(dir.path());

        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().extend([
            String::from("mykey"),
            String::from("Fuji"),
            format!("Default ({DEFAULT_STAKE_WEIGHT})"),
            DEFAULT_START_OPTION.to_string(),
            DEFAULT_DURATION_OPTION.to_string(),
        ]);
        prompter.node_ids.borrow_mut().push_back(node(NODE_A));

        let gateway = StaticGateway::new(vec![ValidatorRecord {
            node_id: node(NODE_A),
            end_time: 1700000300,
        }]);
        let deployer = RecordingDeployer::default();
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };

        let req = Request {
            subnet_name: String::from("mysubnet"),
            ..Default::default()
        };
        let outcome = execute(&req, &c, now()).unwrap();
        assert_eq!(outcome.key_name, "mykey");
        assert_eq!(outcome.network, Network::Fuji);
        assert_eq!(outcome.subnet_id, subnet_id);
        assert_eq!(outcome.weight, 20);
        assert_eq!(outcome.window.start.timestamp(), 1690000300);
        assert_eq!(outcome.window.duration, Duration::from_secs(10000000));

        let submitted = deployer.submitted.borrow();
        assert_eq!(submitted.len(), 1);
        let (key_path, network, tx) = &submitted[0];
        assert!(key_path.ends_with("mykey.pk"));
        assert_eq!(*network, Network::Fuji);
        assert_eq!(tx.subnet_id, subnet_id);
        assert_eq!(tx.node_id, node(NODE_A));
        assert_eq!(tx.weight, 20);
    }

    #[test]
    fn test_flag_flow() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path());

        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().push_back(String::from("Fuji"));
        let gateway = StaticGateway::new(Vec::new());
        let deployer = RecordingDeployer::default();
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };

        let req = Request {
            subnet_name: String::from("mysubnet"),
            key_name: Some(String::from("mykey")),
            node_id: Some(NODE_B.to_string()),
            weight: 100,
            start_time: Some(String::from("2023-07-23 00:00:00")),
            staking_period: Some(Duration::from_secs(8760 * 3600)),
        };
        let outcome = execute(&req, &c, now()).unwrap();
        assert_eq!(outcome.node_id, node(NODE_B));
        assert_eq!(outcome.weight, 100);
        assert_eq!(
            timefmt::format(&outcome.window.end().unwrap()),
            "2024-07-22 00:00:00"
        );
        // only the network is prompted for
        assert_eq!(prompter.asked().len(), 1);
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn test_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path());
        let gateway = StaticGateway::new(Vec::new());
        let deployer = RecordingDeployer::default();

        let base = Request {
            subnet_name: String::from("mysubnet"),
            key_name: Some(String::from("mykey")),
            ..Default::default()
        };

        // mainnet is not enabled yet
        let prompter = ScriptedPrompter::default();
        prompter
            .lists
            .borrow_mut()
            .push_back(MAINNET_COMING_SOON.to_string());
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };
        assert!(matches!(
            execute(&base, &c, now()),
            Err(Error::NetworkNotSupported(_))
        ));

        // sidecar without a Fuji subnet ID
        let sc = Sidecar::new("undeployed", VmType::SubnetEvm);
        app.create_sidecar(&sc).unwrap();
        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().push_back(String::from("Fuji"));
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };
        let req = Request {
            subnet_name: String::from("undeployed"),
            ..base.clone()
        };
        assert!(matches!(execute(&req, &c, now()), Err(Error::NoSubnetId)));

        // weight out of range
        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().push_back(String::from("Fuji"));
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };
        let req = Request {
            node_id: Some(NODE_A.to_string()),
            weight: 101,
            ..base.clone()
        };
        assert!(matches!(
            execute(&req, &c, now()),
            Err(Error::InvalidWeight(101))
        ));

        // malformed node ID
        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().push_back(String::from("Fuji"));
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };
        let req = Request {
            node_id: Some(String::from("NodeID-notanode")),
            ..base.clone()
        };
        assert!(matches!(
            execute(&req, &c, now()),
            Err(Error::Parse { .. })
        ));

        // node absent from the primary network validator set
        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().extend([
            String::from("Fuji"),
            DEFAULT_DURATION_OPTION.to_string(),
        ]);
        let c = Collaborators {
            app: &app,
            prompter: &prompter,
            gateway: &gateway,
            deployer: &deployer,
        };
        let req = Request {
            node_id: Some(NODE_A.to_string()),
            weight: 20,
            start_time: Some(String::from("2023-07-23 00:00:00")),
            ..base.clone()
        };
        assert!(matches!(
            execute(&req, &c, now()),
            Err(Error::NodeNotFound(_))
        ));

        assert!(deployer.submitted.borrow().is_empty());
    }
}
