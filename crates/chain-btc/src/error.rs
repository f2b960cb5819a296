use crypto_utils::CryptoError;
use thiserror::Error;

/// Bitcoin chain operation errors.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid WIF: {0}")]
    InvalidWif(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error(transparent)]
    Encoding(#[from] CryptoError),
}
