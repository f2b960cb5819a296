use serde::Serialize;

/// An Ethereum network the wallet knows how to sign for.
#[derive(Debug, Clone, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub is_testnet: bool,
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum",
    symbol: "ETH",
    is_testnet: false,
};

/// Sepolia Testnet (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11_155_111,
    name: "Sepolia",
    symbol: "ETH",
    is_testnet: true,
};

/// Holesky Testnet (chain ID 17000).
pub const HOLESKY: EvmChain = EvmChain {
    chain_id: 17_000,
    name: "Holesky",
    symbol: "ETH",
    is_testnet: true,
};

const ALL_CHAINS: &[&EvmChain] = &[&ETHEREUM, &SEPOLIA, &HOLESKY];

/// Returns the chain definition for a given chain ID, or `None` if unknown.
///
/// Unknown chain IDs are still signable; this lookup only provides display
/// names.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS
        .iter()
        .find(|c| c.chain_id == chain_id)
        .copied()
}

/// Human-readable network name, falling back to `chain <id>`.
pub fn chain_name(chain_id: u64) -> String {
    match get_chain(chain_id) {
        Some(chain) => chain.name.to_string(),
        None => format!("chain {chain_id}"),
    }
}

pub fn supported_chains() -> Vec<&'static EvmChain> {
    ALL_CHAINS.to_vec()
}
