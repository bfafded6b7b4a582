use std::collections::BTreeMap;

use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// ref. <https://pkg.go.dev/github.com/ava-labs/subnet-evm/core#Genesis>
/// ref. <https://pkg.go.dev/github.com/ava-labs/subnet-evm/params#ChainConfig>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ChainConfig>,

    pub nonce: U256,
    pub timestamp: U256,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<String>,

    /// Make sure this is set equal to "ChainConfig.FeeConfig.gas_limit".
    /// ref. <https://github.com/ava-labs/subnet-evm/pull/63>
    pub gas_limit: U256,
    pub difficulty: U256,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,

    /// Keyed by hex address without "0x"; ordered so every node encodes
    /// the same genesis bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloc: Option<BTreeMap<String, AllocAccount>>,

    pub number: U256,
    pub gas_used: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<String>,
    #[serde(rename = "baseFeePerGas", skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<String>,
}

/// "0xD3C21BCECCEDA1000000" is 10^24, one million tokens with 18 decimals.
pub const DEFAULT_AIRDROP_AMOUNT: &str = "0xD3C21BCECCEDA1000000";

/// Don't use the local ID "43112" to avoid config overrides.
/// ref. <https://github.com/ava-labs/avalanche-ops/issues/8>
pub const DEFAULT_CHAIN_ID: u64 = 2000777;

const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

impl Default for Genesis {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_ID)
    }
}

impl Genesis {
    /// Empty-alloc genesis with the standard fee config and no precompiles.
    pub fn new(chain_id: u64) -> Self {
        let mut config = ChainConfig::default();
        config.chain_id = Some(chain_id);
        Self {
            config: Some(config),

            nonce: U256::zero(),
            timestamp: U256::zero(),
            extra_data: Some(String::from("0x00")),

            gas_limit: U256::from(DEFAULT_GAS_LIMIT),
            difficulty: U256::zero(),
            mix_hash: Some(String::from(ZERO_HASH)),
            coinbase: Some(String::from("0x0000000000000000000000000000000000000000")),

            alloc: Some(BTreeMap::new()),

            number: U256::zero(),
            gas_used: U256::zero(),
            parent_hash: Some(String::from(ZERO_HASH)),
            base_fee: None,
        }
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.config.as_ref().and_then(|c| c.chain_id)
    }

    /// Credits "amount" (in wei) to "addr" at genesis.
    pub fn airdrop(&mut self, addr: &H160, amount: U256) {
        let alloc = self.alloc.get_or_insert_with(BTreeMap::new);
        alloc.insert(format!("{:x}", addr), AllocAccount::with_balance(amount));
    }

    pub fn from_slice(d: &[u8]) -> Result<Self> {
        serde_json::from_slice(d)
            .map_err(|e| Error::parse("subnet-evm genesis", &format!("<{} bytes>", d.len()), e))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("failed to serialize genesis to JSON {e}"),
            ))
        })
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/subnet-evm/params#ChainConfig>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub homestead_block: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip150_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip150_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip155_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip158_block: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub byzantium_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constantinople_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub petersburg_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub istanbul_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muir_glacier_block: Option<u64>,

    #[serde(rename = "subnetEVMTimestamp", skip_serializing_if = "Option::is_none")]
    pub subnet_evm_timestamp: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_config: Option<FeeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_fee_recipients: Option<bool>,

    /// ref. <https://docs.avax.network/subnets/customize-a-subnet>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_deployer_allow_list_config: Option<PrecompileConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_native_minter_config: Option<PrecompileConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_allow_list_config: Option<PrecompileConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_manager_config: Option<PrecompileConfig>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: Some(DEFAULT_CHAIN_ID),
            homestead_block: Some(0),

            eip150_block: Some(0),
            eip150_hash: Some(String::from(
                "0x2086799aeebeae135c246c65021c82b4e15a2c451340993aacfd2751886514f0",
            )),

            eip155_block: Some(0),
            eip158_block: Some(0),

            byzantium_block: Some(0),
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            istanbul_block: Some(0),
            muir_glacier_block: Some(0),

            subnet_evm_timestamp: Some(0),

            fee_config: Some(FeeConfig::default()),
            allow_fee_recipients: None,

            contract_deployer_allow_list_config: None,
            contract_native_minter_config: None,
            tx_allow_list_config: None,
            fee_manager_config: None,
        }
    }
}

/// 8-million, same as C-chain.
pub const DEFAULT_GAS_LIMIT: u64 = 8000000;
pub const DEFAULT_TARGET_BLOCK_RATE: u64 = 2;

/// ref. <https://pkg.go.dev/github.com/ava-labs/subnet-evm/params#FeeConfig>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_block_rate: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_base_fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee_change_denominator: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_block_gas_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_block_gas_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_gas_cost_step: Option<u64>,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gas_limit: Some(DEFAULT_GAS_LIMIT),
            target_block_rate: Some(DEFAULT_TARGET_BLOCK_RATE),

            min_base_fee: Some(25000000000),
            target_gas: Some(15000000),
            base_fee_change_denominator: Some(36),

            min_block_gas_cost: Some(0),
            max_block_gas_cost: Some(1000000),
            block_gas_cost_step: Some(200000),
        }
    }
}

/// Shared shape of the allow-list style stateful precompiles.
/// ref. <https://github.com/ava-labs/subnet-evm/blob/master/params/precompile_config.go>
#[derive(Debug, Default, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PrecompileConfig {
    #[serde(rename = "adminAddresses", skip_serializing_if = "Option::is_none")]
    pub admin_addresses: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_timestamp: Option<u64>,
    /// "true" deactivates the precompile and resets its storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,
}

impl PrecompileConfig {
    pub fn with_admins(admins: &[H160]) -> Self {
        Self {
            admin_addresses: Some(admins.iter().map(|a| format!("{:#x}", a)).collect()),
            block_timestamp: Some(0),
            disable: None,
        }
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/subnet-evm/core#GenesisAccount>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AllocAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<BTreeMap<String, String>>,

    pub balance: U256,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

impl AllocAccount {
    pub fn with_balance(balance: U256) -> Self {
        Self {
            code: None,
            storage: None,
            balance,
            nonce: None,
        }
    }
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- subnet_evm::genesis::test_parse --exact --show-output
#[test]
fn test_parse() {
    let _ = env_logger::builder().is_test(true).try_init();

    // ref. <https://github.com/ava-labs/subnet-evm/blob/master/networks/11111/genesis.json>
    let parsed = Genesis::from_slice(
        br#"
{
    "config": {
        "chainId": 12345,
        "homesteadBlock": 0,
        "eip150Block": 0,
        "eip150Hash": "0x2086799aeebeae135c246c65021c82b4e15a2c451340993aacfd2751886514f0",
        "eip155Block": 0,
        "eip158Block": 0,
        "byzantiumBlock": 0,
        "constantinopleBlock": 0,
        "petersburgBlock": 0,
        "istanbulBlock": 0,
        "muirGlacierBlock": 0,
        "subnetEVMTimestamp": 0,
        "feeConfig": {
            "gasLimit": 8000000,
            "minBaseFee": 25000000000,
            "targetGas": 15000000,
            "baseFeeChangeDenominator": 36,
            "minBlockGasCost": 0,
            "maxBlockGasCost": 1000000,
            "targetBlockRate": 2,
            "blockGasCostStep": 200000
        }
    },
    "alloc": {
        "8db97c7cece249c2b98bdc0226cc4c2a57bf52fc": {
            "balance": "0xD3C21BCECCEDA1000000"
        }
    },
    "nonce": "0x0",
    "timestamp": "0x0",
    "extraData": "0x00",
    "gasLimit": "0x7A1200",
    "difficulty": "0x0",
    "mixHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
    "coinbase": "0x0000000000000000000000000000000000000000",
    "number": "0x0",
    "gasUsed": "0x0",
    "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000"
}
"#,
    )
    .unwrap();

    let mut expected = Genesis::new(12345);
    expected.airdrop(
        &crate::prompt::parse_address(crate::constants::EWOQ_ADDRESS).unwrap(),
        U256::from_str_radix(DEFAULT_AIRDROP_AMOUNT.trim_start_matches("0x"), 16).unwrap(),
    );
    assert_eq!(parsed, expected);
    assert_eq!(parsed.chain_id(), Some(12345));

    let encoded = String::from_utf8(expected.to_bytes().unwrap()).unwrap();
    log::info!("{encoded}");
    assert!(encoded.contains("\"gasLimit\": \"0x7a1200\""));
    assert_eq!(Genesis::from_slice(encoded.as_bytes()).unwrap(), expected);

    assert!(Genesis::from_slice(b"{\"config\": 1}").is_err());
}

#[test]
fn test_precompile_admins() {
    let admin = crate::prompt::parse_address(crate::constants::EWOQ_ADDRESS).unwrap();
    let c = PrecompileConfig::with_admins(&[admin]);
    let encoded = serde_json::to_string(&c).unwrap();
    assert_eq!(
        encoded,
        r#"{"adminAddresses":["0x8db97c7cece249c2b98bdc0226cc4c2a57bf52fc"],"blockTimestamp":0}"#
    );
}
