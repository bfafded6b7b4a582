use std::{collections::BTreeMap, fmt, str::FromStr};

use avalanche_types::ids;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, Result},
    network::Network,
};

/// Virtual machine templates a subnet can be created from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum VmType {
    #[serde(rename = "SubnetEVM")]
    SubnetEvm,
    #[serde(rename = "Custom")]
    CustomVm,
}

impl VmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VmType::SubnetEvm => "SubnetEVM",
            VmType::CustomVm => "Custom",
        }
    }
}

impl fmt::Display for VmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SubnetEVM" => Ok(VmType::SubnetEvm),
            "Custom" => Ok(VmType::CustomVm),
            _ => Err(Error::parse("VM type", s, "expected SubnetEVM or Custom")),
        }
    }
}

/// Per-subnet metadata persisted next to the genesis file.
/// Field names match the files written by avalanche-cli.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Sidecar {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "VM")]
    pub vm: VmType,
    #[serde(rename = "Subnet")]
    pub subnet: String,
    #[serde(rename = "TokenName", default)]
    pub token_name: String,
    #[serde(rename = "ChainID", default)]
    pub chain_id: String,
    #[serde(rename = "Networks", default)]
    pub networks: BTreeMap<String, NetworkData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct NetworkData {
    #[serde(rename = "SubnetID", default)]
    pub subnet_id: String,
    #[serde(rename = "BlockchainID", default)]
    pub blockchain_id: String,
}

impl Sidecar {
    pub fn new(name: &str, vm: VmType) -> Self {
        Self {
            name: name.to_string(),
            vm,
            subnet: name.to_string(),
            token_name: String::new(),
            chain_id: String::new(),
            networks: BTreeMap::new(),
        }
    }

    /// Returns the subnet ID assigned when the subnet was deployed to "network".
    pub fn subnet_id(&self, network: Network) -> Result<ids::Id> {
        let raw = match self.networks.get(network.as_str()) {
            Some(data) if !data.subnet_id.trim().is_empty() => data.subnet_id.trim(),
            _ => return Err(Error::NoSubnetId),
        };
        let subnet_id =
            ids::Id::from_str(raw).map_err(|e| Error::parse("subnet ID", raw, e))?;
        if subnet_id.is_empty() {
            return Err(Error::NoSubnetId);
        }
        Ok(subnet_id)
    }
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- sidecar::test_sidecar --exact --show-output
#[test]
fn test_sidecar() {
    let fuji_subnet_id = ids::Id::from_slice(&[7u8; 32]);
    let sc: Sidecar = serde_json::from_str(
        &r#"
{
    "Name": "mysubnet",
    "VM": "SubnetEVM",
    "Subnet": "mysubnet",
    "TokenName": "TEST",
    "ChainID": "12345",
    "Networks": {
        "Fuji": {
            "SubnetID": "FUJI_SUBNET_ID",
            "BlockchainID": "11111111111111111111111111111111LpoYY"
        },
        "Mainnet": {
            "SubnetID": "11111111111111111111111111111111LpoYY",
            "BlockchainID": "11111111111111111111111111111111LpoYY"
        }
    }
}
"#
        .replace("FUJI_SUBNET_ID", &fuji_subnet_id.to_string()),
    )
    .unwrap();
    assert_eq!(sc.vm, VmType::SubnetEvm);
    assert_eq!(sc.subnet_id(Network::Fuji).unwrap(), fuji_subnet_id);
    assert!(matches!(
        sc.subnet_id(Network::Mainnet),
        Err(Error::NoSubnetId)
    ));

    let encoded = serde_json::to_string(&sc).unwrap();
    assert!(encoded.contains("\"VM\":\"SubnetEVM\""));
    let decoded: Sidecar = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, sc);

    let fresh = Sidecar::new("other", VmType::CustomVm);
    assert!(matches!(fresh.subnet_id(Network::Fuji), Err(Error::NoSubnetId)));
}
