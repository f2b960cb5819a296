use thiserror::Error;

/// Hashing, encoding, and randomness errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}
