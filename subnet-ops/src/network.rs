use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{FUJI_API_ENDPOINT, MAINNET_API_ENDPOINT},
    errors::{Error, Result},
};

/// Public networks a subnet can be deployed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum Network {
    Fuji,
    Mainnet,
}

impl Network {
    /// Returns the public API endpoint for the network.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Network::Fuji => FUJI_API_ENDPOINT,
            Network::Mainnet => MAINNET_API_ENDPOINT,
        }
    }

    /// Mainnet validator onboarding is not enabled yet.
    pub fn is_supported(&self) -> bool {
        matches!(self, Network::Fuji)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Fuji => "Fuji",
            Network::Mainnet => "Mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fuji" => Ok(Network::Fuji),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(Error::parse("network", s, "expected Fuji or Mainnet")),
        }
    }
}

#[test]
fn test_network() {
    assert_eq!(Network::from_str("Fuji").unwrap(), Network::Fuji);
    assert_eq!(Network::from_str("mainnet").unwrap(), Network::Mainnet);
    assert!(Network::from_str("Mainnet (coming soon)").is_err());

    assert_eq!(Network::Fuji.endpoint(), "https://api.avax-test.network");
    assert_eq!(Network::Mainnet.endpoint(), "https://api.avax.network");
    assert!(Network::Fuji.is_supported());
    assert!(!Network::Mainnet.is_supported());
    assert_eq!(Network::Mainnet.to_string(), "Mainnet");
}
