//! Wallet core: key management, address derivation, signing and the
//! session that ties them to a chain gateway.
//!
//! The free functions below are the stateless surface; [`WalletSession`]
//! holds a key pair and a node connection for callers that need both.

pub mod address;
pub mod error;
pub mod keys;
pub mod session;
pub mod signing;
pub mod types;

pub use chain_btc::{BtcNetwork, WifKey};
pub use chain_eth::SignedTransaction;
pub use chain_gateway::{ChainGateway, Connection, GatewayError, JsonRpcGateway};
pub use error::WalletError;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use session::WalletSession;
pub use signing::{MessageSignature, SignatureScheme};
pub use types::{BalanceReport, Chain, TransferReceipt, WalletRecord};

use zeroize::Zeroizing;

// ─── Keys ────────────────────────────────────────────────────────────

/// Generate a new private key from the OS random source
pub fn generate_private_key() -> Result<PrivateKey, WalletError> {
    PrivateKey::generate()
}

/// Import a private key from hex (optional `0x` prefix)
pub fn import_private_key(hex: &str) -> Result<PrivateKey, WalletError> {
    PrivateKey::from_hex(hex)
}

/// Derive the uncompressed public key of `private_key`.
///
/// Session callers that may not have a key yet should use
/// [`WalletSession::public_key`], which reports `MissingPrivateKey`.
pub fn derive_public_key(private_key: &PrivateKey) -> PublicKey {
    private_key.public_key()
}

// ─── Addresses ───────────────────────────────────────────────────────

/// Mainnet P2PKH address of an uncompressed public key
pub fn bitcoin_address(public_key: &PublicKey) -> Result<String, WalletError> {
    address::bitcoin_address(public_key, BtcNetwork::Mainnet)
}

/// Lowercase `0x` Ethereum address of an uncompressed public key
pub fn ethereum_address(public_key: &PublicKey) -> Result<String, WalletError> {
    address::ethereum_address(public_key)
}

/// Validate an address for a given chain
pub fn validate_address(addr: &str, chain: Chain) -> Result<bool, WalletError> {
    address::validate_address(addr, chain)
}

// ─── Encoding ────────────────────────────────────────────────────────

pub fn base58check_encode(payload: &[u8]) -> String {
    crypto_utils::base58check::encode(payload)
}

pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>, WalletError> {
    Ok(crypto_utils::base58check::decode(encoded)?)
}

/// Mainnet WIF with the compressed-key flag.
pub fn to_wif(private_key: &PrivateKey) -> Zeroizing<String> {
    Zeroizing::new(chain_btc::to_wif(
        &private_key.to_bytes(),
        BtcNetwork::Mainnet,
        true,
    ))
}

/// Decode a WIF string (mainnet or testnet, either compression flag)
pub fn from_wif(wif: &str) -> Result<PrivateKey, WalletError> {
    let decoded = chain_btc::from_wif(wif)?;
    PrivateKey::from_bytes(&decoded.private_key)
}

// ─── Signing ─────────────────────────────────────────────────────────

/// Sign a message with the deterministic (RFC 6979) scheme
pub fn sign_message(private_key: &PrivateKey, message: &[u8]) -> Result<MessageSignature, WalletError> {
    signing::sign_message(private_key, message, SignatureScheme::Deterministic)
}

pub fn verify_message(public_key: &PublicKey, message: &[u8], signature: &MessageSignature) -> bool {
    signing::verify_message(public_key, message, signature)
}

/// Build and sign a legacy ETH transfer with EIP-155 replay protection.
///
/// Fails with `InvalidRecipient` for a malformed `to` and with
/// `InsufficientFields` for a zero chain id or gas limit.
pub fn build_and_sign_transaction(
    private_key: &PrivateKey,
    to: &str,
    value_wei: u128,
    gas_limit: u64,
    gas_price_wei: u128,
    nonce: u64,
    chain_id: u64,
) -> Result<SignedTransaction, WalletError> {
    let tx = chain_eth::transaction::build_transfer(
        chain_id,
        nonce,
        to,
        value_wei,
        gas_price_wei,
        gas_limit,
    )?;
    Ok(chain_eth::transaction::sign_transaction(
        &tx,
        &private_key.to_bytes(),
    )?)
}
