use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use crate::error::GatewayError;

/// An explicitly established link to a node.
///
/// Created only by [`ChainGateway::connect`]; dropping it is the only way to
/// disconnect. Gateways never reconnect on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    endpoint: String,
    chain_id: u64,
}

impl Connection {
    pub fn new(endpoint: impl Into<String>, chain_id: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            chain_id,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Chain id reported by the node when the connection was made.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// `scheme://host[:port]` of the endpoint, for logs. Hosted providers put
    /// API keys in the path or query, so both are dropped along with any
    /// credentials.
    pub fn display_endpoint(&self) -> String {
        display_endpoint(&self.endpoint)
    }
}

pub(crate) fn display_endpoint(endpoint: &str) -> String {
    let Ok(url) = Url::parse(endpoint) else {
        return "<invalid endpoint>".to_string();
    };
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

/// The boundary between the wallet core and a remote Ethereum node.
///
/// Each method is a single request/response. Implementations must not retry,
/// cache results, or reconnect implicitly; timeouts belong to the
/// implementation's transport.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Checks that `endpoint` is reachable and returns a connection bound to
    /// the node's chain id.
    async fn connect(&self, endpoint: &str) -> Result<Connection, GatewayError>;

    /// Balance of `address` in wei at the latest block.
    async fn get_balance(&self, conn: &Connection, address: &str) -> Result<u128, GatewayError>;

    /// Next nonce for `address`, counting pending transactions.
    async fn get_nonce(&self, conn: &Connection, address: &str) -> Result<u64, GatewayError>;

    /// Current gas price in wei.
    async fn get_gas_price(&self, conn: &Connection) -> Result<u128, GatewayError>;

    /// Submits raw signed transaction bytes and returns the transaction hash.
    async fn broadcast(&self, conn: &Connection, raw_tx: &[u8]) -> Result<String, GatewayError>;
}
