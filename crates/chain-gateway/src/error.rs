use thiserror::Error;

/// Failures reported by a chain gateway.
///
/// Every variant is surfaced to the caller as-is; nothing in this crate
/// retries a failed call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The node could not be reached, or it answered a query with an error.
    #[error("connection error: {0}")]
    Connection(String),

    /// A signed transaction was not accepted for broadcast.
    #[error("broadcast error: {0}")]
    Broadcast(String),

    /// The node answered, but the reply could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
