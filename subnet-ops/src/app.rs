use std::{
    fs,
    io::{self, Error as IoError, ErrorKind},
    path::{Path, PathBuf},
};

use avalanche_types::key::secp256k1::private_key::Key;
use log::info;

use crate::{
    constants::{BASE_DIR_NAME, GENESIS_SUFFIX, KEY_DIR, KEY_SUFFIX, SIDECAR_SUFFIX, VM_DIR},
    errors::{Error, Result},
    sidecar::Sidecar,
};

/// On-disk layout rooted at the base directory:
///
/// ```text
/// <base>/key/<name>.pk
/// <base>/<subnet>_genesis.json
/// <base>/<subnet>_sidecar.json
/// <base>/vms/<subnet>
/// ```
#[derive(Debug, Clone)]
pub struct App {
    base_dir: PathBuf,
}

impl App {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Uses "$HOME/.avalanche-cli" when no base directory is given.
    pub fn from_home() -> io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            IoError::new(ErrorKind::NotFound, "failed to find the home directory")
        })?;
        Ok(Self::new(home.join(BASE_DIR_NAME)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn key_dir(&self) -> PathBuf {
        self.base_dir.join(KEY_DIR)
    }

    pub fn key_path(&self, key_name: &str) -> PathBuf {
        self.key_dir().join(format!("{key_name}{KEY_SUFFIX}"))
    }

    /// Returns the names of all "*.pk" files in the key directory, sorted.
    pub fn key_names(&self) -> Result<Vec<String>> {
        let key_dir = self.key_dir();
        let entries = match fs::read_dir(&key_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NoKeys(key_dir)),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(name) = file_name.strip_suffix(KEY_SUFFIX) {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
        if names.is_empty() {
            return Err(Error::NoKeys(key_dir));
        }
        names.sort();
        Ok(names)
    }

    pub fn genesis_path(&self, subnet_name: &str) -> PathBuf {
        self.base_dir.join(format!("{subnet_name}{GENESIS_SUFFIX}"))
    }

    pub fn sidecar_path(&self, subnet_name: &str) -> PathBuf {
        self.base_dir.join(format!("{subnet_name}{SIDECAR_SUFFIX}"))
    }

    pub fn custom_vm_path(&self, subnet_name: &str) -> PathBuf {
        self.base_dir.join(VM_DIR).join(subnet_name)
    }

    pub fn genesis_exists(&self, subnet_name: &str) -> bool {
        self.genesis_path(subnet_name).exists()
    }

    pub fn write_genesis_file(&self, subnet_name: &str, genesis: &[u8]) -> Result<()> {
        let path = self.genesis_path(subnet_name);
        info!("writing genesis to '{}'", path.display());
        fs::create_dir_all(&self.base_dir)?;
        fs::write(path, genesis)?;
        Ok(())
    }

    pub fn load_sidecar(&self, subnet_name: &str) -> Result<Sidecar> {
        let path = self.sidecar_path(subnet_name);
        info!("loading sidecar from '{}'", path.display());
        let d = fs::read(&path).map_err(|e| {
            IoError::new(
                e.kind(),
                format!("failed to read sidecar '{}' ({e})", path.display()),
            )
        })?;
        serde_json::from_slice(&d)
            .map_err(|e| Error::parse("sidecar", &path.display().to_string(), e))
    }

    pub fn create_sidecar(&self, sc: &Sidecar) -> Result<()> {
        let path = self.sidecar_path(&sc.name);
        info!("writing sidecar to '{}'", path.display());
        let d = serde_json::to_vec_pretty(sc)
            .map_err(|e| IoError::new(ErrorKind::Other, format!("failed to encode sidecar {e}")))?;
        fs::create_dir_all(&self.base_dir)?;
        fs::write(path, d)?;
        Ok(())
    }

    /// Copies a VM binary into the base directory.
    pub fn copy_vm_binary(&self, subnet_name: &str, vm_path: &Path) -> Result<PathBuf> {
        let dst = self.custom_vm_path(subnet_name);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("copying VM binary '{}' to '{}'", vm_path.display(), dst.display());
        fs::copy(vm_path, &dst)?;
        Ok(dst)
    }
}

/// Loads a private key file holding either a hex-encoded key or
/// a "PrivateKey-" prefixed cb58 key.
pub fn load_key(path: &Path) -> Result<Key> {
    let contents = fs::read_to_string(path).map_err(|e| {
        IoError::new(
            e.kind(),
            format!("failed to read key file '{}' ({e})", path.display()),
        )
    })?;
    let raw = contents.trim();
    let what = "private key";
    let shown = path.display().to_string();
    if let Some(cb58) = raw.strip_prefix("PrivateKey-") {
        return Key::from_cb58(cb58).map_err(|e| Error::parse(what, &shown, e));
    }
    Key::from_hex(raw.trim_start_matches("0x")).map_err(|e| Error::parse(what, &shown, e))
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- app::test_layout --exact --show-output
#[test]
fn test_layout() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir().unwrap();
    let app = App::new(dir.path());

    assert!(matches!(app.key_names(), Err(Error::NoKeys(_))));
    fs::create_dir_all(app.key_dir()).unwrap();
    assert!(matches!(app.key_names(), Err(Error::NoKeys(_))));

    fs::write(app.key_path("zeta"), "x").unwrap();
    fs::write(app.key_path("alpha"), "x").unwrap();
    fs::write(app.key_dir().join("README.txt"), "x").unwrap();
    assert_eq!(app.key_names().unwrap(), vec!["alpha", "zeta"]);
    assert_eq!(
        app.key_path("alpha"),
        dir.path().join("key").join("alpha.pk")
    );

    assert!(!app.genesis_exists("mysubnet"));
    app.write_genesis_file("mysubnet", b"{}").unwrap();
    assert!(app.genesis_exists("mysubnet"));
    assert!(dir.path().join("mysubnet_genesis.json").is_file());

    let sc = Sidecar::new("mysubnet", crate::sidecar::VmType::SubnetEvm);
    app.create_sidecar(&sc).unwrap();
    assert_eq!(app.load_sidecar("mysubnet").unwrap(), sc);
    assert!(app.load_sidecar("other").is_err());
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- app::test_load_key --exact --show-output
#[test]
fn test_load_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ewoq.pk");

    // ref. <https://github.com/ava-labs/avalanchego/blob/master/genesis/genesis_local.go>
    fs::write(
        &path,
        "56289e99c94b6912bfc12adc093c9b51124f0dc54ac7a766b2bc5ccf558d8027\n",
    )
    .unwrap();
    let from_hex = load_key(&path).unwrap();

    fs::write(
        &path,
        "PrivateKey-ewoqjP7PxY4yr3iLTpLisriqt94hdyDFNgchSxGGztUrTXtNN",
    )
    .unwrap();
    let from_cb58 = load_key(&path).unwrap();
    assert_eq!(from_hex.to_hex(), from_cb58.to_hex());

    fs::write(&path, "not a key").unwrap();
    assert!(matches!(load_key(&path), Err(Error::Parse { .. })));
}
