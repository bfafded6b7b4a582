use std::time::Duration;

use avalanche_types::{
    ids::{self, node},
    jsonrpc::client::p as client_p,
};
use log::{debug, info};

use crate::{
    constants::REQUEST_TIMEOUT,
    errors::{Error, Result},
    network::Network,
};

/// A current validator and the unix time (in seconds) its staking ends.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidatorRecord {
    pub node_id: node::Id,
    pub end_time: u64,
}

/// Read side of the P-chain.
pub trait ValidatorSetGateway {
    fn get_current_validators(
        &self,
        network: Network,
        subnet_id: &ids::Id,
    ) -> Result<Vec<ValidatorRecord>>;
}

/// The primary network's subnet ID is the empty ID.
pub fn primary_network_id() -> ids::Id {
    ids::Id::empty()
}

/// Queries "platform.getCurrentValidators" through the avalanche-types
/// JSON-RPC client. Uses the public API endpoint of each network unless a
/// base URL is set.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    timeout: Duration,
    base_url: Option<String>,
}

impl Default for PlatformClient {
    fn default() -> Self {
        Self::new(REQUEST_TIMEOUT)
    }
}

impl PlatformClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            base_url: None,
        }
    }

    /// Sends every request to "base_url" (e.g., "http://127.0.0.1:9650")
    /// regardless of the network.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn http_rpc(&self, network: Network) -> String {
        match &self.base_url {
            Some(u) => u.clone(),
            None => network.endpoint().to_string(),
        }
    }
}

impl ValidatorSetGateway for PlatformClient {
    fn get_current_validators(
        &self,
        network: Network,
        subnet_id: &ids::Id,
    ) -> Result<Vec<ValidatorRecord>> {
        let http_rpc = self.http_rpc(network);
        info!("getting current validators for subnet {subnet_id} via '{http_rpc}'");

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let resp = rt
            .block_on(async {
                tokio::time::timeout(self.timeout, async {
                    if subnet_id.is_empty() {
                        client_p::get_primary_network_validators(&http_rpc).await
                    } else {
                        client_p::get_subnet_validators(&http_rpc, &subnet_id.to_string()).await
                    }
                })
                .await
            })
            .map_err(|_| Error::TransportTimeout {
                uri: http_rpc.clone(),
                timeout: self.timeout,
            })?
            .map_err(|e| Error::Transport {
                uri: http_rpc.clone(),
                reason: e.to_string(),
            })?;

        if let Some(e) = resp.error {
            return Err(Error::Transport {
                uri: http_rpc,
                reason: format!("JSON-RPC error {}: {}", e.code, e.message),
            });
        }
        let validators = resp
            .result
            .and_then(|r| r.validators)
            .unwrap_or_default();

        let records: Vec<ValidatorRecord> = validators
            .into_iter()
            .map(|v| ValidatorRecord {
                node_id: v.node_id,
                end_time: v.end_time,
            })
            .collect();
        debug!("fetched {} current validators", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::{Shutdown, TcpListener, TcpStream},
        str::FromStr,
        sync::mpsc,
        thread,
    };

    use super::*;

    /// Reads one HTTP request (headers and body) and returns it as text.
    fn read_request(socket: &mut TcpStream) -> String {
        let mut req = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = match socket.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            req.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&req);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        if k.eq_ignore_ascii_case("content-length") {
                            v.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if req.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&req).to_string()
    }

    /// Answers a single request with "body"; the received request is sent back
    /// over the channel.
    fn spawn_static_http_server(body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            if let Ok((mut socket, _)) = listener.accept() {
                let req = read_request(&mut socket);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes());
                let _ = socket.shutdown(Shutdown::Write);
                let _ = tx.send(req);
            }
        });

        (format!("http://{addr}"), rx)
    }

    /// RUST_LOG=debug cargo test --package subnet-ops --lib -- gateway::tests::test_get_current_validators --exact --show-output
    #[test]
    fn test_get_current_validators() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (base_url, rx) = spawn_static_http_server(
            r#"{"jsonrpc":"2.0","result":{"validators":[{"txID":"2NNkpYTGfTFLSGXJcHtVv6drwVU2cczhmjK2uhvwDyxwsjzZMm","startTime":"1600368632","endTime":"1602960455","stakeAmount":"2000000000000","potentialReward":"0","nodeID":"NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg","delegationFee":"10.0000","uptime":"0.0000","connected":false}]},"id":1}"#,
        );
        let cli = PlatformClient::new(Duration::from_secs(10)).with_base_url(base_url);
        let records = cli
            .get_current_validators(Network::Fuji, &primary_network_id())
            .unwrap();
        assert_eq!(
            records,
            vec![ValidatorRecord {
                node_id: node::Id::from_str("NodeID-7Xhw2mDxuDS44j42TCB6U5579esbSt3Lg").unwrap(),
                end_time: 1602960455,
            }]
        );

        let req = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(req.starts_with("POST /ext/P"), "unexpected request {req}");
        assert!(req.contains("platform.getCurrentValidators"));
    }

    #[test]
    fn test_get_current_validators_rpc_error() {
        let (base_url, _rx) = spawn_static_http_server(
            r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"couldn't get validator set"},"id":1}"#,
        );
        let cli = PlatformClient::new(Duration::from_secs(10)).with_base_url(base_url);
        let err = cli
            .get_current_validators(Network::Fuji, &primary_network_id())
            .unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert!(err.to_string().contains("couldn't get validator set"));
    }

    /// RUST_LOG=debug cargo test --package subnet-ops --lib -- gateway::tests::test_get_current_validators_timeout --exact --show-output
    #[test]
    fn test_get_current_validators_timeout() {
        // connections are queued by the kernel but never answered
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let timeout = Duration::from_millis(300);
        let cli = PlatformClient::new(timeout).with_base_url(base_url.clone());
        let err = cli
            .get_current_validators(Network::Fuji, &primary_network_id())
            .unwrap_err();
        assert!(err.is_timeout());
        match err {
            Error::TransportTimeout { uri, timeout: t } => {
                assert_eq!(uri, base_url);
                assert_eq!(t, timeout);
            }
            e => panic!("unexpected error {e}"),
        }
        drop(listener);
    }

    #[test]
    fn test_http_rpc() {
        let cli = PlatformClient::default();
        assert_eq!(cli.http_rpc(Network::Fuji), "https://api.avax-test.network");
        let cli = cli.with_base_url("http://127.0.0.1:9650");
        assert_eq!(cli.http_rpc(Network::Mainnet), "http://127.0.0.1:9650");
    }
}
