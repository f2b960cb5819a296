use crypto_utils::hash::keccak256;
use k256::PublicKey;
use tracing::debug;

use crate::error::EthError;

/// Derives an Ethereum address from an uncompressed secp256k1 public key
/// (65 bytes, starting with 0x04).
///
/// The derivation takes the Keccak-256 hash of the 64-byte public key (without
/// the 0x04 prefix) and uses the last 20 bytes as the address. The result is
/// `0x` followed by 40 lowercase hex characters; use [`checksum_address`] for
/// the EIP-55 display form.
pub fn pubkey_to_eth_address(uncompressed_pubkey: &[u8]) -> Result<String, EthError> {
    if uncompressed_pubkey.len() != 65 {
        return Err(EthError::InvalidPublicKey(format!(
            "expected 65-byte uncompressed key, got {} bytes",
            uncompressed_pubkey.len()
        )));
    }
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }
    PublicKey::from_sec1_bytes(uncompressed_pubkey).map_err(|_| {
        EthError::InvalidPublicKey("point is not on the secp256k1 curve".into())
    })?;

    // Keccak-256 of the 64-byte key (skip the 0x04 prefix).
    let hash = keccak256(&uncompressed_pubkey[1..]);

    let address = format!("0x{}", hex::encode(&hash[12..]));
    debug!(%address, "derived ethereum address");
    Ok(address)
}

/// Parses a 0x-prefixed, 40-hex-character address into its 20 raw bytes.
///
/// Letter case is not checked here; see [`validate_address`].
pub fn parse_address(address: &str) -> Result<[u8; 20], EthError> {
    let hex_str = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_str.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let mut addr = [0u8; 20];
    hex::decode_to_slice(hex_str, &mut addr)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;
    Ok(addr)
}

/// Validates an Ethereum address string.
///
/// Checks that the address has the correct format (0x + 40 hex characters).
/// If the address contains mixed case, the EIP-55 checksum is verified.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    parse_address(address)?;
    let hex_part = &address[2..];

    // If the address is all-lowercase or all-uppercase, it's valid (no checksum
    // to verify).
    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());

    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    // Mixed case: verify EIP-55 checksum.
    let checksummed = checksum_address(address)?;
    Ok(checksummed[2..] == *hex_part)
}

/// Applies EIP-55 mixed-case checksum encoding to an Ethereum address.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let bytes = parse_address(address)?;
    let hex_part = hex::encode(bytes);

    // EIP-55: hash the lowercase hex address (without 0x).
    let hash = keccak256(hex_part.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        // Nibble i of the hash decides the case of character i.
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}
