use std::str::FromStr;

use crate::error::BtcError;

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BtcNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl BtcNetwork {
    /// Version byte prepended to the hash160 of a P2PKH address.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x00,
            BtcNetwork::Testnet => 0x6f,
        }
    }

    /// Version byte prepended to a private key in WIF.
    pub fn wif_prefix(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x80,
            BtcNetwork::Testnet => 0xef,
        }
    }

    /// Looks up the network owning a WIF prefix byte.
    pub fn from_wif_prefix(prefix: u8) -> Option<Self> {
        match prefix {
            0x80 => Some(BtcNetwork::Mainnet),
            0xef => Some(BtcNetwork::Testnet),
            _ => None,
        }
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for BtcNetwork {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(BtcNetwork::Mainnet),
            "testnet" => Ok(BtcNetwork::Testnet),
            other => Err(BtcError::InvalidNetwork(other.to_string())),
        }
    }
}
