// multiwallet CLI
// Generates and imports secp256k1 keys, prints Bitcoin/Ethereum addresses,
// signs messages and sends ETH through a JSON-RPC node.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "multiwallet")]
#[command(about = "Minimal Bitcoin/Ethereum wallet", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML config file (default: ~/.multiwallet/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ethereum JSON-RPC endpoint
    #[arg(short, long, global = true, env = "WALLET_RPC_URL")]
    rpc_url: Option<String>,

    /// Bitcoin network for addresses and WIF (mainnet, testnet)
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Include private key hex and WIF in output
    #[arg(long, global = true)]
    reveal_secrets: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new key pair
    Generate,

    /// Import a private key from hex or WIF
    Import {
        /// Private key hex (64 characters, optional 0x)
        #[arg(long, env = "WALLET_PRIVATE_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Private key in Wallet Import Format
        #[arg(long)]
        wif: Option<String>,
    },

    /// Sign a message (SHA-256 digest, secp256k1 ECDSA)
    Sign {
        /// Message to sign
        message: String,

        #[arg(long, env = "WALLET_PRIVATE_KEY", hide_env_values = true)]
        key: String,

        /// Use a randomized nonce instead of RFC 6979
        #[arg(long)]
        randomized: bool,
    },

    /// Verify a message signature
    Verify {
        /// Public key hex (33 or 65 bytes). Without it the signer is
        /// recovered from a 65-byte signature.
        #[arg(long)]
        public_key: Option<String>,

        /// Signature hex (r || s, optionally followed by the recovery id)
        #[arg(long)]
        signature: String,

        /// Message that was signed
        message: String,
    },

    /// Decode a WIF private key
    DecodeWif {
        wif: String,
    },

    /// Query an ETH balance
    Balance {
        /// Address to query (default: address of --key)
        address: Option<String>,

        #[arg(long, env = "WALLET_PRIVATE_KEY", hide_env_values = true)]
        key: Option<String>,
    },

    /// Send ETH
    Send {
        /// Recipient address
        to: String,

        /// Amount in ether (decimal, e.g. 0.25)
        amount: String,

        #[arg(long, env = "WALLET_PRIVATE_KEY", hide_env_values = true)]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.debug);

    // Load configuration, then let flags and env override it
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(network) = cli.network {
        config.bitcoin_network = network;
    }
    if cli.reveal_secrets {
        config.reveal_secrets = true;
    }
    config.validate()?;
    debug!(rpc_url = %config.rpc_url, network = %config.bitcoin_network, "configuration loaded");

    let output = commands::run(cli.command, &config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
