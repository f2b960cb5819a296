//! Ethereum chain support for the multi-network wallet.
//!
//! This crate provides:
//! - Ethereum address derivation from secp256k1 public keys, plus EIP-55
//!   checksum formatting and validation
//! - Legacy transaction building and EIP-155 signing
//! - Wei/ether unit conversion
//! - Known EVM network definitions

pub mod address;
pub mod chains;
pub mod error;
pub mod transaction;
pub mod units;

pub use error::EthError;
pub use transaction::{SignedTransaction, TransactionRequest, UnsignedTransaction, DEFAULT_GAS_LIMIT};
