use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::gateway::{display_endpoint, ChainGateway, Connection};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Why a single JSON-RPC call failed, before it is mapped onto
/// [`GatewayError`] by the operation that issued it.
#[derive(Debug)]
enum CallError {
    Transport(String),
    Rpc { code: i64, message: String },
    Malformed(String),
}

impl CallError {
    fn into_query_error(self) -> GatewayError {
        match self {
            CallError::Transport(msg) => GatewayError::Connection(msg),
            CallError::Rpc { code, message } => {
                GatewayError::Connection(format!("RPC error {code}: {message}"))
            }
            CallError::Malformed(msg) => GatewayError::InvalidResponse(msg),
        }
    }

    fn into_broadcast_error(self) -> GatewayError {
        match self {
            CallError::Transport(msg) | CallError::Malformed(msg) => GatewayError::Broadcast(msg),
            CallError::Rpc { code, message } => {
                GatewayError::Broadcast(format!("RPC error {code}: {message}"))
            }
        }
    }
}

/// [`ChainGateway`] over HTTP(S) JSON-RPC 2.0.
#[derive(Debug)]
pub struct JsonRpcGateway {
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcGateway {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Connection(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T>(
        &self,
        endpoint: &str,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, CallError>
    where
        T: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        debug!(
            endpoint = %display_endpoint(endpoint),
            method,
            id = request.id,
            "sending JSON-RPC request"
        );

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CallError::Transport(format!("failed to send {method}: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                CallError::Transport(format!("failed to read {method} response: {}", e.without_url()))
            })?;

        let rpc_response: RpcResponse<T> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(CallError::Transport(format!("{method} returned HTTP {status}")));
            }
            Err(e) => {
                return Err(CallError::Malformed(format!(
                    "failed to parse {method} response: {e}"
                )));
            }
        };

        if let Some(error) = rpc_response.error {
            warn!(method, code = error.code, message = %error.message, "JSON-RPC error");
            return Err(CallError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| CallError::Malformed(format!("{method} response has no result")))
    }

    async fn query_quantity(
        &self,
        conn: &Connection,
        method: &str,
        params: serde_json::Value,
    ) -> Result<u128, GatewayError> {
        let raw: String = self
            .call(conn.endpoint(), method, params)
            .await
            .map_err(CallError::into_query_error)?;
        parse_quantity(&raw)
    }
}

#[async_trait]
impl ChainGateway for JsonRpcGateway {
    async fn connect(&self, endpoint: &str) -> Result<Connection, GatewayError> {
        let url = Url::parse(endpoint)
            .map_err(|e| GatewayError::Connection(format!("invalid endpoint: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::Connection(format!(
                "unsupported endpoint scheme: {}",
                url.scheme()
            )));
        }

        let raw: String = self
            .call(endpoint, "eth_chainId", json!([]))
            .await
            .map_err(CallError::into_query_error)?;
        let chain_id = u64::try_from(parse_quantity(&raw)?)
            .map_err(|_| GatewayError::InvalidResponse(format!("chain id out of range: {raw}")))?;

        let connection = Connection::new(endpoint, chain_id);
        info!(endpoint = %connection.display_endpoint(), chain_id, "connected to node");
        Ok(connection)
    }

    async fn get_balance(&self, conn: &Connection, address: &str) -> Result<u128, GatewayError> {
        self.query_quantity(conn, "eth_getBalance", json!([address, "latest"]))
            .await
    }

    async fn get_nonce(&self, conn: &Connection, address: &str) -> Result<u64, GatewayError> {
        let nonce = self
            .query_quantity(conn, "eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        u64::try_from(nonce)
            .map_err(|_| GatewayError::InvalidResponse(format!("nonce out of range: {nonce}")))
    }

    async fn get_gas_price(&self, conn: &Connection) -> Result<u128, GatewayError> {
        self.query_quantity(conn, "eth_gasPrice", json!([])).await
    }

    async fn broadcast(&self, conn: &Connection, raw_tx: &[u8]) -> Result<String, GatewayError> {
        let raw_hex = format!("0x{}", hex::encode(raw_tx));
        let tx_hash: String = self
            .call(conn.endpoint(), "eth_sendRawTransaction", json!([raw_hex]))
            .await
            .map_err(CallError::into_broadcast_error)?;

        if !is_tx_hash(&tx_hash) {
            return Err(GatewayError::Broadcast(format!(
                "node returned a malformed transaction hash: {tx_hash}"
            )));
        }

        info!(%tx_hash, "transaction broadcast");
        Ok(tx_hash)
    }
}

/// Parses a JSON-RPC hex quantity (`"0x1bc16d674ec80000"`).
///
/// The `0x` prefix and at least one digit are required; the value must fit
/// in `u128`.
pub fn parse_quantity(raw: &str) -> Result<u128, GatewayError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::InvalidResponse(format!("quantity missing 0x prefix: {raw}")))?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GatewayError::InvalidResponse(format!(
            "quantity is not hex: {raw}"
        )));
    }

    u128::from_str_radix(digits, 16)
        .map_err(|_| GatewayError::InvalidResponse(format!("quantity out of range: {raw}")))
}

fn is_tx_hash(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|h| h.len() == 64 && h.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quantity_values() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1").unwrap(), 1);
        assert_eq!(parse_quantity("0x4a817c800").unwrap(), 20_000_000_000);
        assert_eq!(
            parse_quantity("0xde0b6b3a7640000").unwrap(),
            1_000_000_000_000_000_000
        );
        assert_eq!(parse_quantity("0xAbC").unwrap(), 0xabc);
    }

    #[test]
    fn parse_quantity_rejects_malformed() {
        for bad in ["", "0x", "1a", "0xzz", "0x-1", "0x 1", "12"] {
            assert!(
                matches!(parse_quantity(bad), Err(GatewayError::InvalidResponse(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_quantity_rejects_overflow() {
        let too_big = format!("0x1{}", "0".repeat(32));
        assert!(matches!(
            parse_quantity(&too_big),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn tx_hash_shape() {
        assert!(is_tx_hash(&format!("0x{}", "ab".repeat(32))));
        assert!(!is_tx_hash("0x1234"));
        assert!(!is_tx_hash(&"ab".repeat(32)));
    }

    #[test]
    fn rpc_errors_map_by_operation() {
        let rpc = || CallError::Rpc {
            code: -32000,
            message: "nonce too low".into(),
        };
        assert_eq!(
            rpc().into_query_error(),
            GatewayError::Connection("RPC error -32000: nonce too low".into())
        );
        assert_eq!(
            rpc().into_broadcast_error(),
            GatewayError::Broadcast("RPC error -32000: nonce too low".into())
        );
        assert!(matches!(
            CallError::Malformed("x".into()).into_query_error(),
            GatewayError::InvalidResponse(_)
        ));
    }

    #[test]
    fn request_serializes_as_json_rpc_2() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "eth_gasPrice",
            params: json!([]),
            id: 7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "method": "eth_gasPrice", "params": [], "id": 7})
        );
    }
}
