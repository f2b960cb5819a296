use alloy_rlp::{Encodable, RlpEncodable};
use crypto_utils::hash::keccak256;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use tracing::debug;
use zeroize::Zeroize;

use crate::address::{parse_address, validate_address};
use crate::error::EthError;

/// Gas used by a plain ETH transfer to an externally owned account.
pub const DEFAULT_GAS_LIMIT: u64 = 21_000;

/// An unsigned legacy (type 0) Ethereum transaction with every field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Recipient address bytes.
    pub to: [u8; 20],
    /// Transfer value in wei.
    pub value: u128,
    /// Calldata (empty for simple ETH transfers).
    pub data: Vec<u8>,
}

/// Builder collecting transaction fields that may arrive piecemeal (user
/// input, node queries). Every numeric field must be set before [`build`].
///
/// [`build`]: TransactionRequest::build
#[derive(Debug, Clone, Default)]
pub struct TransactionRequest {
    to: Option<String>,
    value: Option<u128>,
    gas_limit: Option<u64>,
    gas_price: Option<u128>,
    nonce: Option<u64>,
    chain_id: Option<u64>,
    data: Vec<u8>,
}

impl TransactionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn value(mut self, value_wei: u128) -> Self {
        self.value = Some(value_wei);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn gas_price(mut self, gas_price_wei: u128) -> Self {
        self.gas_price = Some(gas_price_wei);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Validates the request and produces an [`UnsignedTransaction`].
    ///
    /// Fails with [`EthError::InsufficientFields`] naming the first unset
    /// field (or a zero chain id / gas limit), and with
    /// [`EthError::InvalidRecipient`] if `to` is not a well-formed 20-byte
    /// address.
    pub fn build(self) -> Result<UnsignedTransaction, EthError> {
        let to = self.to.ok_or_else(|| missing("to"))?;
        let to = validate_recipient(&to)?;
        let value = self.value.ok_or_else(|| missing("value"))?;
        let gas_limit = self.gas_limit.ok_or_else(|| missing("gas limit"))?;
        let gas_price = self.gas_price.ok_or_else(|| missing("gas price"))?;
        let nonce = self.nonce.ok_or_else(|| missing("nonce"))?;
        let chain_id = self.chain_id.ok_or_else(|| missing("chain id"))?;

        if chain_id == 0 {
            return Err(EthError::InsufficientFields(
                "chain id must be non-zero for replay protection".into(),
            ));
        }
        if gas_limit == 0 {
            return Err(EthError::InsufficientFields("gas limit must be non-zero".into()));
        }

        Ok(UnsignedTransaction {
            chain_id,
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data: self.data,
        })
    }
}

fn missing(field: &str) -> EthError {
    EthError::InsufficientFields(format!("{field} is not set"))
}

/// Parses a transfer recipient, rejecting malformed addresses and mixed-case
/// addresses whose EIP-55 checksum does not match.
pub fn validate_recipient(to: &str) -> Result<[u8; 20], EthError> {
    let bytes = parse_address(to).map_err(|e| EthError::InvalidRecipient(e.to_string()))?;
    let checksum_ok =
        validate_address(to).map_err(|e| EthError::InvalidRecipient(e.to_string()))?;
    if !checksum_ok {
        return Err(EthError::InvalidRecipient(format!(
            "EIP-55 checksum mismatch for {to}"
        )));
    }
    Ok(bytes)
}

/// Builds an unsigned ETH transfer with empty calldata.
pub fn build_transfer(
    chain_id: u64,
    nonce: u64,
    to: &str,
    value_wei: u128,
    gas_price: u128,
    gas_limit: u64,
) -> Result<UnsignedTransaction, EthError> {
    TransactionRequest::new()
        .chain_id(chain_id)
        .nonce(nonce)
        .to(to)
        .value(value_wei)
        .gas_price(gas_price)
        .gas_limit(gas_limit)
        .build()
}

impl UnsignedTransaction {
    /// EIP-155 signing payload:
    /// `rlp([nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0])`.
    pub fn signing_payload(&self) -> Vec<u8> {
        let fields = UnsignedTxFields {
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: RlpAddress(self.to),
            value: self.value,
            data: RlpBytes(self.data.clone()),
            chain_id: self.chain_id,
            empty_r: 0,
            empty_s: 0,
        };

        let mut buf = Vec::with_capacity(fields.length());
        fields.encode(&mut buf);
        buf
    }

    /// Keccak-256 of [`signing_payload`](Self::signing_payload).
    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.signing_payload())
    }

    /// Recipient as a lowercase 0x-prefixed hex string.
    pub fn to_address(&self) -> String {
        format!("0x{}", hex::encode(self.to))
    }
}

/// A signed legacy transaction ready for broadcast.
///
/// Fields are private: the raw bytes and hash are derived from them at
/// signing time and must not drift apart afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: UnsignedTransaction,
    v: u64,
    r: [u8; 32],
    s: [u8; 32],
    raw_tx: Vec<u8>,
    tx_hash: [u8; 32],
}

impl SignedTransaction {
    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.tx
    }

    /// EIP-155 `v`: `chain_id * 2 + 35 + recovery_id`.
    pub fn v(&self) -> u64 {
        self.v
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Recovery id (y parity) recovered from `v`.
    pub fn recovery_id(&self) -> u8 {
        (self.v - 35 - self.tx.chain_id * 2) as u8
    }

    /// RLP-encoded signed transaction bytes.
    pub fn raw_tx(&self) -> &[u8] {
        &self.raw_tx
    }

    /// Raw bytes as 0x-prefixed hex, the form `eth_sendRawTransaction` expects.
    pub fn raw_tx_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw_tx))
    }

    /// Transaction hash as a 0x-prefixed hex string.
    pub fn tx_hash(&self) -> String {
        format!("0x{}", hex::encode(self.tx_hash))
    }
}

/// Signs a legacy transaction with EIP-155 replay protection.
///
/// The signing process:
/// 1. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0]`.
/// 2. Keccak-256 hash the payload.
/// 3. Sign the hash with k256 (RFC 6979 deterministic nonce, low-s).
/// 4. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, v, r, s]`.
/// 5. The transaction hash is the Keccak-256 of those raw bytes.
pub fn sign_transaction(
    tx: &UnsignedTransaction,
    private_key: &[u8; 32],
) -> Result<SignedTransaction, EthError> {
    let msg_hash = tx.signing_hash();

    // Create the signing key (zeroized on drop).
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(&msg_hash)
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let v = tx
        .chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + recovery_id.is_y_odd() as u64))
        .ok_or_else(|| EthError::SigningError(format!("chain id {} too large", tx.chain_id)))?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature.r().to_bytes());
    s.copy_from_slice(&signature.s().to_bytes());

    let signed_fields = SignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: RlpAddress(tx.to),
        value: tx.value,
        data: RlpBytes(tx.data.clone()),
        v,
        r: RlpU256(r),
        s: RlpU256(s),
    };

    let mut raw_tx = Vec::with_capacity(signed_fields.length());
    signed_fields.encode(&mut raw_tx);

    let tx_hash = keccak256(&raw_tx);
    debug!(
        chain_id = tx.chain_id,
        nonce = tx.nonce,
        tx_hash = %hex::encode(tx_hash),
        "signed legacy transaction"
    );

    Ok(SignedTransaction {
        tx: tx.clone(),
        v,
        r,
        s,
        raw_tx,
        tx_hash,
    })
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: RlpBytes,
    chain_id: u64,
    empty_r: u8,
    empty_s: u8,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: RlpBytes,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

/// Wrapper for a 20-byte Ethereum address that implements `Encodable`.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Calldata encoded as an RLP byte string (not a list of integers).
#[derive(Debug, Clone)]
struct RlpBytes(Vec<u8>);

impl Encodable for RlpBytes {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Wrapper for a 256-bit integer (32 bytes) that encodes as minimal big-endian
/// bytes with leading zeros stripped (standard RLP integer encoding).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl RlpU256 {
    fn trimmed(&self) -> &[u8] {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        &self.0[start..]
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.trimmed().encode(out);
    }

    fn length(&self) -> usize {
        self.trimmed().length()
    }
}
