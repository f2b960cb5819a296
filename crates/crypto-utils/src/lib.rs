//! # crypto-utils
//!
//! Hashing primitives, Base58Check encoding, and secure random generation
//! shared by the chain crates and the wallet core.

pub mod base58check;
pub mod error;
pub mod hash;
pub mod random;

pub use error::CryptoError;
