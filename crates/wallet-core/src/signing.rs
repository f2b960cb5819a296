use crypto_utils::hash::sha256;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier, RandomizedPrehashSigner};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::keys::{PrivateKey, PublicKey};

/// How the ECDSA nonce is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// RFC 6979: the same key and message always give the same signature.
    #[default]
    Deterministic,
    /// RFC 6979 with fresh OS randomness mixed in; every signature differs.
    Randomized,
}

/// A secp256k1 ECDSA signature over the SHA-256 digest of a message.
///
/// `s` is always in the lower half of the group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSignature {
    rs: [u8; 64],
    recovery_id: u8,
}

impl MessageSignature {
    fn from_parts(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&signature.to_bytes());
        Self {
            rs,
            recovery_id: recovery_id.to_byte(),
        }
    }

    /// Parses `r || s` (64 bytes) or `r || s || recovery_id` (65 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let (rs, recovery_id) = match bytes.len() {
            64 => (&bytes[..64], 0),
            65 => (&bytes[..64], bytes[64]),
            len => {
                return Err(WalletError::InvalidEncoding(format!(
                    "signature must be 64 or 65 bytes, got {len}"
                )))
            }
        };
        if recovery_id > 3 {
            return Err(WalletError::InvalidEncoding(format!(
                "recovery id out of range: {recovery_id}"
            )));
        }
        Signature::from_slice(rs)
            .map_err(|e| WalletError::InvalidEncoding(format!("invalid signature: {e}")))?;

        let mut out = [0u8; 64];
        out.copy_from_slice(rs);
        Ok(Self {
            rs: out,
            recovery_id,
        })
    }

    pub fn from_hex(input: &str) -> Result<Self, WalletError> {
        let digits = input.trim().trim_start_matches("0x");
        let bytes = hex::decode(digits)
            .map_err(|e| WalletError::InvalidEncoding(format!("signature is not hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn r(&self) -> &[u8] {
        &self.rs[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.rs[32..]
    }

    /// `r || s`.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.rs
    }

    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Hex of `r || s || recovery_id`.
    pub fn to_hex(&self) -> String {
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&self.rs);
        out.push(self.recovery_id);
        hex::encode(out)
    }

    fn signature(&self) -> Result<Signature, WalletError> {
        Signature::from_slice(&self.rs)
            .map_err(|e| WalletError::InvalidEncoding(format!("invalid signature: {e}")))
    }
}

/// SHA-256 digest that message signatures are computed over.
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    sha256(message)
}

/// Sign `message` (hashed with SHA-256) using `scheme` to pick the nonce.
pub fn sign_message(
    private_key: &PrivateKey,
    message: &[u8],
    scheme: SignatureScheme,
) -> Result<MessageSignature, WalletError> {
    let digest = message_digest(message);
    let signing_key = SigningKey::from(private_key.secret());

    let (signature, recovery_id) = match scheme {
        SignatureScheme::Deterministic => {
            let (signature, recovery_id): (Signature, RecoveryId) = signing_key
                .sign_prehash(&digest)
                .map_err(|e| WalletError::SigningFailed(e.to_string()))?;
            (signature, recovery_id)
        }
        SignatureScheme::Randomized => {
            let signature: Signature = signing_key
                .sign_prehash_with_rng(&mut OsRng, &digest)
                .map_err(|e| WalletError::SigningFailed(e.to_string()))?;
            let recovery_id = RecoveryId::trial_recovery_from_prehash(
                signing_key.verifying_key(),
                &digest,
                &signature,
            )
            .map_err(|e| WalletError::SigningFailed(e.to_string()))?;
            (signature, recovery_id)
        }
    };

    Ok(MessageSignature::from_parts(&signature, recovery_id))
}

/// Check `signature` over `message` against `public_key`.
///
/// Any malformed input yields `false`.
pub fn verify_message(public_key: &PublicKey, message: &[u8], signature: &MessageSignature) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key.as_bytes()) else {
        return false;
    };
    let Ok(signature) = signature.signature() else {
        return false;
    };
    verifying_key
        .verify_prehash(&message_digest(message), &signature)
        .is_ok()
}

/// Recover the signer's public key from a message and its signature.
pub fn recover_public_key(
    message: &[u8],
    signature: &MessageSignature,
) -> Result<PublicKey, WalletError> {
    let recovery_id = RecoveryId::from_byte(signature.recovery_id)
        .ok_or_else(|| WalletError::InvalidEncoding("invalid recovery id".into()))?;

    let recovered = VerifyingKey::recover_from_prehash(
        &message_digest(message),
        &signature.signature()?,
        recovery_id,
    )
    .map_err(|e| WalletError::SigningFailed(format!("recovery failed: {e}")))?;

    PublicKey::from_sec1_bytes(recovered.to_encoded_point(false).as_bytes())
}
