//! Chain gateway: the network boundary of the wallet.
//!
//! [`ChainGateway`] describes the five node operations the wallet core needs
//! (connect, balance, nonce, gas price, broadcast). [`JsonRpcGateway`]
//! implements them against an Ethereum JSON-RPC endpoint.

pub mod error;
pub mod gateway;
pub mod json_rpc;

pub use error::GatewayError;
pub use gateway::{ChainGateway, Connection};
pub use json_rpc::{parse_quantity, JsonRpcGateway, DEFAULT_TIMEOUT};
