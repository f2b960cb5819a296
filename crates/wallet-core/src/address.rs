use chain_btc::BtcNetwork;

use crate::error::WalletError;
use crate::keys::PublicKey;
use crate::types::Chain;

/// P2PKH address over all 65 bytes of the uncompressed key.
pub fn bitcoin_address(public_key: &PublicKey, network: BtcNetwork) -> Result<String, WalletError> {
    Ok(chain_btc::pubkey_to_p2pkh_address(
        public_key.as_bytes(),
        network,
    )?)
}

/// Lowercase `0x`-prefixed Ethereum address.
pub fn ethereum_address(public_key: &PublicKey) -> Result<String, WalletError> {
    Ok(chain_eth::address::pubkey_to_eth_address(
        public_key.as_bytes(),
    )?)
}

/// Validate an address for a given chain.
///
/// Returns `Ok(false)` for well-formed input that fails a check (wrong
/// network, bad EIP-55 casing), and an error for malformed input.
pub fn validate_address(address: &str, chain: Chain) -> Result<bool, WalletError> {
    match chain {
        Chain::Bitcoin => Ok(chain_btc::validate_address(address, BtcNetwork::Mainnet)?),
        Chain::BitcoinTestnet => Ok(chain_btc::validate_address(address, BtcNetwork::Testnet)?),
        Chain::Ethereum => Ok(chain_eth::address::validate_address(address)?),
    }
}
