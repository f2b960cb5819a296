use chain_btc::BtcError;
use chain_eth::EthError;
use chain_gateway::GatewayError;
use crypto_utils::CryptoError;
use thiserror::Error;

/// Errors surfaced by the wallet core.
///
/// Lower-layer errors are mapped onto these kinds one-to-one where a matching
/// kind exists; a checksum mismatch stays a checksum mismatch no matter which
/// decoder found it.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("private key is zero or not below the curve order")]
    InvalidKeyRange,

    #[error("no private key loaded")]
    MissingPrivateKey,

    #[error("invalid public key format: {0}")]
    InvalidPublicKeyFormat(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("insufficient fields: {0}")]
    InsufficientFields(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The OS random source failed. Not recoverable.
    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidEncoding(msg) => WalletError::InvalidEncoding(msg),
            CryptoError::ChecksumMismatch => WalletError::ChecksumMismatch,
            CryptoError::RandomSourceUnavailable(msg) => WalletError::RandomSourceUnavailable(msg),
        }
    }
}

impl From<BtcError> for WalletError {
    fn from(e: BtcError) -> Self {
        match e {
            BtcError::InvalidPrivateKey(_) => WalletError::InvalidKeyRange,
            BtcError::InvalidPublicKey(msg) => WalletError::InvalidPublicKeyFormat(msg),
            BtcError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            BtcError::InvalidWif(msg) => WalletError::InvalidEncoding(format!("WIF: {msg}")),
            BtcError::InvalidNetwork(msg) => {
                WalletError::InvalidEncoding(format!("bitcoin network: {msg}"))
            }
            BtcError::Encoding(inner) => inner.into(),
        }
    }
}

impl From<EthError> for WalletError {
    fn from(e: EthError) -> Self {
        match e {
            EthError::InvalidPrivateKey(_) => WalletError::InvalidKeyRange,
            EthError::InvalidPublicKey(msg) => WalletError::InvalidPublicKeyFormat(msg),
            EthError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            EthError::InvalidRecipient(msg) => WalletError::InvalidRecipient(msg),
            EthError::InsufficientFields(msg) => WalletError::InsufficientFields(msg),
            EthError::SigningError(msg) => WalletError::SigningFailed(msg),
        }
    }
}
