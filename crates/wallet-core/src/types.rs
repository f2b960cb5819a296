use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Networks the wallet derives addresses for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Bitcoin,
    BitcoinTestnet,
    Ethereum,
}

/// The logical output of wallet generation or import.
///
/// Secret fields are `None` once [`without_secrets`](Self::without_secrets)
/// has been applied, and are skipped when serializing in that state. They are
/// wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_hex: Option<String>,
    pub public_key_hex: String,
    pub bitcoin_address: String,
    pub ethereum_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wif: Option<String>,
}

impl WalletRecord {
    /// Drops the private key hex and WIF, keeping only public data.
    pub fn without_secrets(mut self) -> Self {
        // Zeroizing an `Option` wipes the contents and leaves `None`.
        self.private_key_hex.zeroize();
        self.wif.zeroize();
        self
    }

    pub fn has_secrets(&self) -> bool {
        self.private_key_hex.is_some() || self.wif.is_some()
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |field: &Option<String>| field.as_ref().map(|_| "<redacted>");
        f.debug_struct("WalletRecord")
            .field("private_key_hex", &redact(&self.private_key_hex))
            .field("public_key_hex", &self.public_key_hex)
            .field("bitcoin_address", &self.bitcoin_address)
            .field("ethereum_address", &self.ethereum_address)
            .field("wif", &redact(&self.wif))
            .finish()
    }
}

impl Drop for WalletRecord {
    fn drop(&mut self) {
        self.private_key_hex.zeroize();
        self.wif.zeroize();
    }
}

/// Balance of an Ethereum address. Amounts are decimal strings so JSON
/// consumers do not lose precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub address: String,
    pub chain_id: u64,
    /// Known network name, or `chain <id>`.
    pub network: String,
    pub wei: String,
    pub ether: String,
}

/// Result of a successful ETH transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub tx_hash: String,
    pub from: String,
    pub to: String,
    pub value_wei: String,
    pub nonce: u64,
    pub gas_price_wei: String,
    pub gas_limit: u64,
    pub chain_id: u64,
    pub network: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WalletRecord {
        WalletRecord {
            private_key_hex: Some("11".repeat(32)),
            public_key_hex: format!("04{}", "22".repeat(64)),
            bitcoin_address: "1BitcoinAddr".into(),
            ethereum_address: "0xethaddr".into(),
            wif: Some("KwifString".into()),
        }
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["privateKeyHex"], "11".repeat(32));
        assert_eq!(json["bitcoinAddress"], "1BitcoinAddr");
        assert_eq!(json["ethereumAddress"], "0xethaddr");
        assert_eq!(json["wif"], "KwifString");
        assert!(json.get("publicKeyHex").is_some());
    }

    #[test]
    fn without_secrets_omits_private_fields() {
        let public = record().without_secrets();
        assert!(!public.has_secrets());

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("privateKeyHex").is_none());
        assert!(json.get("wif").is_none());
        assert_eq!(json["ethereumAddress"], "0xethaddr");
    }

    #[test]
    fn debug_redacts_secrets() {
        let debug = format!("{:?}", record());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&"11".repeat(32)));
        assert!(!debug.contains("KwifString"));
    }

    #[test]
    fn receipt_serializes_camel_case() {
        let receipt = TransferReceipt {
            tx_hash: "0xabc".into(),
            from: "0x1".into(),
            to: "0x2".into(),
            value_wei: "1".into(),
            nonce: 0,
            gas_price_wei: "2".into(),
            gas_limit: 21_000,
            chain_id: 1,
            network: "Ethereum".into(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["txHash"], "0xabc");
        assert_eq!(json["network"], "Ethereum");
        assert_eq!(json["gasLimit"], 21_000);
    }
}
