use crypto_utils::base58check;
use k256::SecretKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Suffix byte marking a WIF key whose public key is used in compressed form.
const COMPRESSION_FLAG: u8 = 0x01;

/// A private key decoded from Wallet Import Format.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WifKey {
    pub private_key: [u8; 32],
    #[zeroize(skip)]
    pub network: BtcNetwork,
    pub compressed: bool,
}

impl std::fmt::Debug for WifKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WifKey")
            .field("private_key", &"<redacted>")
            .field("network", &self.network)
            .field("compressed", &self.compressed)
            .finish()
    }
}

/// Encode a 32-byte secp256k1 private key as WIF.
///
/// Layout before Base58Check: `prefix(1) || key(32) [|| 0x01]`, where the
/// trailing flag is present when `compressed` is set.
pub fn to_wif(private_key: &[u8; 32], network: BtcNetwork, compressed: bool) -> String {
    let mut payload = Vec::with_capacity(34);
    payload.push(network.wif_prefix());
    payload.extend_from_slice(private_key);
    if compressed {
        payload.push(COMPRESSION_FLAG);
    }

    let encoded = base58check::encode(&payload);
    payload.zeroize();
    encoded
}

/// Decode a WIF string back into its private key, network, and compression flag.
pub fn from_wif(wif: &str) -> Result<WifKey, BtcError> {
    let mut payload = base58check::decode(wif)?;
    let result = parse_payload(&payload);
    payload.zeroize();
    result
}

fn parse_payload(payload: &[u8]) -> Result<WifKey, BtcError> {
    let compressed = match payload.len() {
        33 => false,
        34 if payload[33] == COMPRESSION_FLAG => true,
        34 => {
            return Err(BtcError::InvalidWif(format!(
                "unexpected compression flag 0x{:02x}",
                payload[33]
            )))
        }
        len => {
            return Err(BtcError::InvalidWif(format!(
                "expected 33 or 34 bytes, got {len}"
            )))
        }
    };

    let network = BtcNetwork::from_wif_prefix(payload[0]).ok_or_else(|| {
        BtcError::InvalidWif(format!("unknown prefix 0x{:02x}", payload[0]))
    })?;

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&payload[1..33]);

    if SecretKey::from_slice(&private_key).is_err() {
        private_key.zeroize();
        return Err(BtcError::InvalidPrivateKey(
            "scalar is zero or not below the curve order".into(),
        ));
    }

    Ok(WifKey {
        private_key,
        network,
        compressed,
    })
}
