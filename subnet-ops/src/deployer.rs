use std::{path::Path, time::Duration};

use avalanche_types::{
    ids::{self, node},
    wallet,
};
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::{
    app,
    constants::REQUEST_TIMEOUT,
    errors::{Error, Result},
    network::Network,
    timefmt,
};

/// Everything needed to add a node to a subnet's validator set.
#[derive(Debug, Clone)]
pub struct AddValidatorTx {
    pub subnet_id: ids::Id,
    pub node_id: node::Id,
    pub weight: u64,
    pub start: DateTime<Utc>,
    pub duration: Duration,
}

/// Write side of the P-chain.
pub trait Deployer {
    /// Signs with the key at "key_path" and issues the transaction.
    /// Returns the transaction ID.
    fn add_validator(&self, key_path: &Path, network: Network, tx: &AddValidatorTx)
        -> Result<ids::Id>;
}

/// Issues transactions through the public API endpoint of each network,
/// or through the base URL when one is set.
#[derive(Debug, Clone)]
pub struct PublicDeployer {
    timeout: Duration,
    base_url: Option<String>,
}

impl Default for PublicDeployer {
    fn default() -> Self {
        Self::new(REQUEST_TIMEOUT)
    }
}

impl PublicDeployer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl Deployer for PublicDeployer {
    fn add_validator(
        &self,
        key_path: &Path,
        network: Network,
        tx: &AddValidatorTx,
    ) -> Result<ids::Id> {
        let key = app::load_key(key_path)?;
        let end = timefmt::add(&tx.start, tx.duration)?;
        let uri = match &self.base_url {
            Some(u) => u.clone(),
            None => network.endpoint().to_string(),
        };
        info!(
            "adding {} to subnet {} via '{uri}' (weight {}, {} ~ {})",
            tx.node_id,
            tx.subnet_id,
            tx.weight,
            timefmt::format(&tx.start),
            timefmt::format(&end)
        );

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let issued = rt.block_on(async {
            tokio::time::timeout(self.timeout, async {
                let w = wallet::Builder::new(&key)
                    .base_http_url(uri.clone())
                    .build()
                    .await
                    .map_err(|e| Error::Submission(format!("failed to build wallet ({e})")))?;
                w.p()
                    .add_subnet_validator()
                    .node_id(tx.node_id.clone())
                    .subnet_id(tx.subnet_id)
                    .weight(tx.weight)
                    .start_time(tx.start)
                    .end_time(end)
                    .check_acceptance(true)
                    .issue()
                    .await
                    .map_err(|e| Error::Submission(e.to_string()))
            })
            .await
        });

        let (tx_id, added) = issued.map_err(|_| Error::TransportTimeout {
            uri: uri.clone(),
            timeout: self.timeout,
        })??;
        if !added {
            warn!("{} is already a validator of subnet {}", tx.node_id, tx.subnet_id);
        }
        info!("subnet validator tx id {tx_id}, added {added}");
        Ok(tx_id)
    }
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- deployer::test_add_validator_timeout --exact --show-output
#[test]
fn test_add_validator_timeout() {
    use std::{fs, net::TcpListener, str::FromStr};

    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("ewoq.pk");
    fs::write(
        &key_path,
        "56289e99c94b6912bfc12adc093c9b51124f0dc54ac7a766b2bc5ccf558d8027",
    )
    .unwrap();

    // connections are queued by the kernel but never answered
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let timeout = Duration::from_millis(300);
    let deployer = PublicDeployer::new(timeout).with_base_url(base_url.clone());
    let tx = AddValidatorTx {
        subnet_id: ids::Id::from_slice(&[7u8; 32]),
        node_id: node::Id::from_str("NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg").unwrap(),
        weight: 20,
        start: timefmt::parse("2024-01-01 00:00:00").unwrap(),
        duration: Duration::from_secs(8760 * 3600),
    };
    let err = deployer
        .add_validator(&key_path, Network::Fuji, &tx)
        .unwrap_err();
    match err {
        Error::TransportTimeout { uri, timeout: t } => {
            assert_eq!(uri, base_url);
            assert_eq!(t, timeout);
        }
        e => panic!("unexpected error {e}"),
    }
    drop(listener);
}
