//! Bitcoin chain support for the multi-network wallet.
//!
//! Provides legacy P2PKH address derivation and Wallet Import Format (WIF)
//! encoding of secp256k1 private keys, both built on Base58Check.

pub mod address;
pub mod error;
pub mod network;
pub mod wif;

pub use address::{address_to_pubkey_hash, pubkey_to_p2pkh_address, validate_address};
pub use error::BtcError;
pub use network::BtcNetwork;
pub use wif::{from_wif, to_wif, WifKey};
