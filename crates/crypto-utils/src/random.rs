use rand_core::{OsRng, RngCore};

use crate::error::CryptoError;

/// Generates a fixed-size array of cryptographically secure random bytes.
///
/// Every call reads from the operating system CSPRNG, so independent callers
/// never share generator state.
pub fn try_random_bytes_fixed<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| CryptoError::RandomSourceUnavailable(e.to_string()))?;
    Ok(buf)
}
