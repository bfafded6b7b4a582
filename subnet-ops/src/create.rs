//! "create" wizard: builds a genesis and a sidecar for a new subnet.

use std::{fs, path::PathBuf};

use log::info;
use primitive_types::U256;

use crate::{
    app::App,
    constants::EWOQ_ADDRESS,
    errors::{Error, Result},
    prompt::{self, Prompter},
    sidecar::{Sidecar, VmType},
    subnet_evm::genesis::{Genesis, PrecompileConfig, DEFAULT_AIRDROP_AMOUNT},
    ux, validate,
};

pub const DEFAULT_AIRDROP_OPTION: &str =
    "Airdrop 1 million tokens to the default address (do not use in production)";
pub const CUSTOM_AIRDROP_OPTION: &str = "Customize your airdrop";

pub const NATIVE_MINT: &str = "Native Minting";
pub const CONTRACT_ALLOW_LIST: &str = "Contract Deployment Allow List";
pub const TX_ALLOW_LIST: &str = "Transaction Allow List";
pub const FEE_MANAGER: &str = "Adjust Fee Settings Post Deploy";

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub subnet_name: String,
    pub genesis_file: Option<PathBuf>,
    pub vm_file: Option<PathBuf>,
    pub use_subnet_evm: bool,
    pub use_custom: bool,
    pub force: bool,
}

impl Request {
    fn vm_from_flags(&self) -> Result<Option<VmType>> {
        match (self.use_subnet_evm, self.use_custom) {
            (true, true) => Err(Error::TooManyVms),
            (true, false) => Ok(Some(VmType::SubnetEvm)),
            (false, true) => Ok(Some(VmType::CustomVm)),
            (false, false) => Ok(None),
        }
    }
}

/// Writes "<name>_genesis.json" and "<name>_sidecar.json" and returns the sidecar.
pub fn execute(req: &Request, app: &App, prompter: &dyn Prompter) -> Result<Sidecar> {
    let name = req.subnet_name.as_str();
    if app.genesis_exists(name) && !req.force {
        return Err(Error::ConfigExists(name.to_string()));
    }
    validate::subnet_name(name)?;

    let vm = match req.vm_from_flags()? {
        Some(vm) => vm,
        None => {
            let options = [
                VmType::SubnetEvm.as_str().to_string(),
                VmType::CustomVm.as_str().to_string(),
            ];
            prompter.capture_list("Choose your VM", &options)?.parse()?
        }
    };
    info!("creating {vm} subnet configuration for {name:?}");

    let (genesis, sc) = match vm {
        VmType::SubnetEvm => subnet_evm_config(req, prompter)?,
        VmType::CustomVm => custom_vm_config(req, app, prompter)?,
    };

    app.write_genesis_file(name, &genesis)?;
    app.create_sidecar(&sc)?;
    ux::print_step("Successfully created subnet configuration")?;
    Ok(sc)
}

fn subnet_evm_config(req: &Request, prompter: &dyn Prompter) -> Result<(Vec<u8>, Sidecar)> {
    let mut sc = Sidecar::new(&req.subnet_name, VmType::SubnetEvm);

    if let Some(path) = &req.genesis_file {
        info!("importing subnet-evm genesis from '{}'", path.display());
        let d = fs::read(path)?;
        let genesis = Genesis::from_slice(&d)?;
        if let Some(chain_id) = genesis.chain_id() {
            sc.chain_id = chain_id.to_string();
        }
        return Ok((d, sc));
    }

    let chain_id = loop {
        let id = prompter.capture_u64("Enter your subnet's ChainId. It can be any positive integer.")?;
        if id > 0 {
            break id;
        }
        ux::print_notice("ChainId must be greater than zero")?;
    };
    let token_name = prompter.capture_string("Select a symbol for your subnet's native token")?;

    let mut genesis = Genesis::new(chain_id);
    let amount = U256::from_str_radix(DEFAULT_AIRDROP_AMOUNT.trim_start_matches("0x"), 16)
        .map_err(|e| Error::parse("airdrop amount", DEFAULT_AIRDROP_AMOUNT, e))?;

    let options = [
        DEFAULT_AIRDROP_OPTION.to_string(),
        CUSTOM_AIRDROP_OPTION.to_string(),
    ];
    if prompter.capture_list("How would you like to distribute funds?", &options)?
        == DEFAULT_AIRDROP_OPTION
    {
        genesis.airdrop(&prompt::parse_address(EWOQ_ADDRESS)?, amount);
    } else {
        loop {
            let addr = prompter.capture_address("Address to airdrop to")?;
            genesis.airdrop(&addr, amount);
            if !prompter.capture_yes_no("Would you like to airdrop more tokens?")? {
                break;
            }
        }
    }

    add_precompiles(&mut genesis, prompter)?;

    sc.token_name = token_name;
    sc.chain_id = chain_id.to_string();
    Ok((genesis.to_bytes()?, sc))
}

fn add_precompiles(genesis: &mut Genesis, prompter: &dyn Prompter) -> Result<()> {
    let mut remaining = vec![
        NATIVE_MINT.to_string(),
        CONTRACT_ALLOW_LIST.to_string(),
        TX_ALLOW_LIST.to_string(),
        FEE_MANAGER.to_string(),
    ];
    while !remaining.is_empty()
        && prompter.capture_yes_no("Would you like to add a custom precompile to modify the EVM?")?
    {
        let selected = prompter.capture_list("Choose a precompile", &remaining)?;
        remaining.retain(|p| *p != selected);

        let admin = prompter.capture_address(&format!("Admin address for {selected}"))?;
        let config = Some(PrecompileConfig::with_admins(&[admin]));

        let chain_config = genesis.config.get_or_insert_with(Default::default);
        match selected.as_str() {
            NATIVE_MINT => chain_config.contract_native_minter_config = config,
            CONTRACT_ALLOW_LIST => chain_config.contract_deployer_allow_list_config = config,
            TX_ALLOW_LIST => chain_config.tx_allow_list_config = config,
            _ => chain_config.fee_manager_config = config,
        }
        info!("enabled precompile {selected:?}");
    }
    Ok(())
}

fn custom_vm_config(
    req: &Request,
    app: &App,
    prompter: &dyn Prompter,
) -> Result<(Vec<u8>, Sidecar)> {
    let genesis_path = match &req.genesis_file {
        Some(p) => p.clone(),
        None => prompter.capture_existing_file("Enter path to custom genesis")?,
    };
    let vm_path = match &req.vm_file {
        Some(p) => p.clone(),
        None => prompter.capture_existing_file("Enter path to vm binary")?,
    };

    let genesis = fs::read(&genesis_path)?;
    serde_json::from_slice::<serde_json::Value>(&genesis).map_err(|e| {
        Error::parse("genesis", &genesis_path.display().to_string(), e)
    })?;
    app.copy_vm_binary(&req.subnet_name, &vm_path)?;

    Ok((genesis, Sidecar::new(&req.subnet_name, VmType::CustomVm)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedPrompter;

    /// RUST_LOG=debug cargo test --package subnet-ops --lib -- create::tests::test_create_subnet_evm --exact --show-output
    #[test]
    fn test_create_subnet_evm() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path());

        let prompter = ScriptedPrompter::default();
        prompter.lists.borrow_mut().extend([
            VmType::SubnetEvm.as_str().to_string(),
            CUSTOM_AIRDROP_OPTION.to_string(),
            TX_ALLOW_LIST.to_string(),
        ]);
        prompter.numbers.borrow_mut().extend([0, 12345]);
        prompter.strings.borrow_mut().push_back(String::from("TEST"));
        let addr = prompt::parse_address(EWOQ_ADDRESS).unwrap();
        prompter.addresses.borrow_mut().extend([addr, addr]);
        // no more airdrops, one precompile, then stop
        prompter.yes_no.borrow_mut().extend([false, true, false]);

        let req = Request {
            subnet_name: String::from("mysubnet"),
            ..Default::default()
        };
        let sc = execute(&req, &app, &prompter).unwrap();
        assert_eq!(sc.vm, VmType::SubnetEvm);
        assert_eq!(sc.token_name, "TEST");
        assert_eq!(sc.chain_id, "12345");
        assert_eq!(app.load_sidecar("mysubnet").unwrap(), sc);

        let genesis = Genesis::from_slice(&fs::read(app.genesis_path("mysubnet")).unwrap()).unwrap();
        assert_eq!(genesis.chain_id(), Some(12345));
        let alloc = genesis.alloc.as_ref().unwrap();
        assert!(alloc.contains_key("8db97c7cece249c2b98bdc0226cc4c2a57bf52fc"));
        let chain_config = genesis.config.as_ref().unwrap();
        assert!(chain_config.tx_allow_list_config.is_some());
        assert!(chain_config.contract_native_minter_config.is_none());

        // existing configuration needs --force
        let err = execute(&req, &app, &ScriptedPrompter::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigExists(_)));
    }

    #[test]
    fn test_create_imported_genesis_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path());
        app.write_genesis_file("mysubnet", b"{}").unwrap();

        let genesis_path = dir.path().join("input.json");
        fs::write(&genesis_path, Genesis::new(777).to_bytes().unwrap()).unwrap();

        let req = Request {
            subnet_name: String::from("mysubnet"),
            genesis_file: Some(genesis_path),
            use_subnet_evm: true,
            force: true,
            ..Default::default()
        };
        let prompter = ScriptedPrompter::default();
        let sc = execute(&req, &app, &prompter).unwrap();
        assert_eq!(sc.chain_id, "777");
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_create_custom_vm() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path().join("base"));

        let genesis_path = dir.path().join("custom-genesis.json");
        fs::write(&genesis_path, br#"{"hello":"world"}"#).unwrap();
        let vm_path = dir.path().join("customvm");
        fs::write(&vm_path, b"\x7fELF").unwrap();

        let prompter = ScriptedPrompter::default();
        prompter.files.borrow_mut().push_back(vm_path);

        let req = Request {
            subnet_name: String::from("custom"),
            genesis_file: Some(genesis_path),
            use_custom: true,
            ..Default::default()
        };
        let sc = execute(&req, &app, &prompter).unwrap();
        assert_eq!(sc.vm, VmType::CustomVm);
        assert_eq!(fs::read(app.custom_vm_path("custom")).unwrap(), b"\x7fELF");
        assert_eq!(
            fs::read(app.genesis_path("custom")).unwrap(),
            br#"{"hello":"world"}"#
        );
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path());
        let prompter = ScriptedPrompter::default();

        let req = Request {
            subnet_name: String::from("my-subnet"),
            ..Default::default()
        };
        assert!(matches!(
            execute(&req, &app, &prompter),
            Err(Error::InvalidName { .. })
        ));

        let req = Request {
            subnet_name: String::from("mysubnet"),
            use_subnet_evm: true,
            use_custom: true,
            ..Default::default()
        };
        assert!(matches!(
            execute(&req, &app, &prompter),
            Err(Error::TooManyVms)
        ));
        assert!(!app.genesis_exists("mysubnet"));
    }
}
