use crate::error::CryptoError;
use crate::hash::double_sha256;

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

/// First four bytes of the double SHA-256 of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = double_sha256(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Base58Check-encodes `payload`: `base58(payload || checksum(payload))`.
///
/// The payload is taken verbatim, so callers prepend any version byte
/// themselves.
pub fn encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).into_string()
}

/// Decodes a Base58Check string and returns the payload without checksum.
///
/// Fails with [`CryptoError::InvalidEncoding`] on characters outside the
/// Base58 alphabet or input too short to carry a checksum, and with
/// [`CryptoError::ChecksumMismatch`] when the trailing four bytes do not
/// match the recomputed checksum.
pub fn decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let mut data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| CryptoError::InvalidEncoding(format!("invalid base58: {e}")))?;

    if data.len() < CHECKSUM_LEN {
        return Err(CryptoError::InvalidEncoding(format!(
            "expected at least {CHECKSUM_LEN} bytes, got {}",
            data.len()
        )));
    }

    let split = data.len() - CHECKSUM_LEN;
    if data[split..] != checksum(&data[..split]) {
        return Err(CryptoError::ChecksumMismatch);
    }

    data.truncate(split);
    Ok(data)
}
