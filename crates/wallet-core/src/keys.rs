use std::fmt;

use crypto_utils::random::try_random_bytes_fixed;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Length of an uncompressed SEC1 public key: `0x04 || X || Y`.
pub const PUBLIC_KEY_LEN: usize = 65;

/// Draws that fall outside `[1, n)` are retried; with 32 uniform bytes this
/// happens with probability below 2^-127 per draw.
const MAX_GENERATION_ATTEMPTS: usize = 8;

/// A secp256k1 private key, always in `[1, n)`.
///
/// The scalar is wiped from memory when dropped and never printed by `Debug`.
#[derive(Clone)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    /// Generates a new key from the OS random source.
    pub fn generate() -> Result<Self, WalletError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let candidate = Zeroizing::new(try_random_bytes_fixed::<32>()?);
            if let Ok(secret) = SecretKey::from_bytes((&*candidate).into()) {
                return Ok(Self(secret));
            }
        }
        Err(WalletError::RandomSourceUnavailable(
            "random source produced no valid scalar".into(),
        ))
    }

    /// Imports a key from 64 hex characters, with or without a `0x` prefix.
    ///
    /// Non-hex input or a length other than 32 bytes is `InvalidKeyFormat`;
    /// a zero scalar or one not below the curve order is `InvalidKeyRange`.
    pub fn from_hex(input: &str) -> Result<Self, WalletError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = Zeroizing::new(
            hex::decode(digits)
                .map_err(|e| WalletError::InvalidKeyFormat(format!("not valid hex: {e}")))?,
        );
        let bytes: &[u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            WalletError::InvalidKeyFormat(format!("expected 32 bytes, got {}", bytes.len()))
        })?;

        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, WalletError> {
        SecretKey::from_bytes(bytes.into())
            .map(Self)
            .map_err(|_| WalletError::InvalidKeyRange)
    }

    /// Big-endian scalar bytes.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.0.to_bytes().into())
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// Multiplies the generator point by this scalar.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(&self.0.public_key())
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// An uncompressed secp256k1 public key (65 bytes, first byte `0x04`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    fn from_point(point: &k256::PublicKey) -> Self {
        let encoded = point.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(encoded.as_bytes());
        Self(bytes)
    }

    /// Parses a SEC1 public key. Compressed (33-byte) keys are accepted and
    /// expanded; anything not on the curve is `InvalidPublicKeyFormat`.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        if !matches!(bytes.len(), 33 | PUBLIC_KEY_LEN) {
            return Err(WalletError::InvalidPublicKeyFormat(format!(
                "expected 33 or 65 bytes, got {}",
                bytes.len()
            )));
        }
        let point = k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| {
            WalletError::InvalidPublicKeyFormat("point is not on the secp256k1 curve".into())
        })?;
        Ok(Self::from_point(&point))
    }

    pub fn from_hex(input: &str) -> Result<Self, WalletError> {
        let digits = input.trim().trim_start_matches("0x");
        let bytes = hex::decode(digits)
            .map_err(|e| WalletError::InvalidPublicKeyFormat(format!("not valid hex: {e}")))?;
        Self::from_sec1_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A private key together with its derived public key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    pub fn generate() -> Result<Self, WalletError> {
        Ok(Self::from_private_key(PrivateKey::generate()?))
    }

    pub fn from_hex(input: &str) -> Result<Self, WalletError> {
        Ok(Self::from_private_key(PrivateKey::from_hex(input)?))
    }

    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}
