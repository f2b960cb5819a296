use crypto_utils::{base58check, hash::hash160};
use k256::PublicKey;
use tracing::debug;

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Decoded P2PKH payload length: 1 version byte + 20-byte hash160.
const P2PKH_PAYLOAD_LEN: usize = 21;

/// Derive a legacy P2PKH address from a SEC1-encoded secp256k1 public key.
///
/// Accepts the 65-byte uncompressed form (`0x04 || X || Y`) or the 33-byte
/// compressed form. The two forms of the same key hash to different
/// addresses; the bytes are hashed exactly as given.
///
/// Steps:
/// 1. SHA-256(pubkey)
/// 2. RIPEMD-160(sha256_result) -> 20-byte pubkey hash
/// 3. Prepend the network version byte
/// 4. Base58Check encode (4-byte SHA-256d checksum)
pub fn pubkey_to_p2pkh_address(pubkey: &[u8], network: BtcNetwork) -> Result<String, BtcError> {
    match (pubkey.len(), pubkey.first()) {
        (65, Some(0x04)) | (33, Some(0x02 | 0x03)) => {}
        (len, _) => {
            return Err(BtcError::InvalidPublicKey(format!(
                "expected 65-byte uncompressed or 33-byte compressed SEC1 key, got {len} bytes"
            )))
        }
    }

    PublicKey::from_sec1_bytes(pubkey).map_err(|_| {
        BtcError::InvalidPublicKey("point is not on the secp256k1 curve".into())
    })?;

    let mut payload = Vec::with_capacity(P2PKH_PAYLOAD_LEN);
    payload.push(network.p2pkh_version());
    payload.extend_from_slice(&hash160(pubkey));

    let address = base58check::encode(&payload);
    debug!(%network, %address, "derived p2pkh address");
    Ok(address)
}

/// Validate a P2PKH address string for the given network.
///
/// Returns `Ok(true)` for a well-formed address of `network`, `Ok(false)` for
/// a well-formed address of another network, and an error if the string is
/// not a Base58Check P2PKH address at all.
pub fn validate_address(address: &str, network: BtcNetwork) -> Result<bool, BtcError> {
    let payload = decode_p2pkh(address)?;
    Ok(payload[0] == network.p2pkh_version())
}

/// Extract the 20-byte pubkey hash from a P2PKH address.
pub fn address_to_pubkey_hash(address: &str) -> Result<[u8; 20], BtcError> {
    let payload = decode_p2pkh(address)?;
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok(hash)
}

fn decode_p2pkh(address: &str) -> Result<Vec<u8>, BtcError> {
    let payload = base58check::decode(address)?;

    if payload.len() != P2PKH_PAYLOAD_LEN {
        return Err(BtcError::InvalidAddress(format!(
            "expected {P2PKH_PAYLOAD_LEN} bytes, got {}",
            payload.len()
        )));
    }

    let version = payload[0];
    if version != BtcNetwork::Mainnet.p2pkh_version()
        && version != BtcNetwork::Testnet.p2pkh_version()
    {
        return Err(BtcError::InvalidAddress(format!(
            "unknown P2PKH version byte 0x{version:02x}"
        )));
    }

    Ok(payload)
}
