use anyhow::{bail, Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use wallet_core::BtcNetwork;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL
    pub rpc_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Gas limit for ETH transfers
    pub gas_limit: u64,

    /// Bitcoin network for addresses and WIF (mainnet, testnet)
    pub bitcoin_network: String,

    /// Print private key hex and WIF in command output
    pub reveal_secrets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            timeout_secs: 30,
            gas_limit: 21_000,
            bitcoin_network: "mainnet".to_string(),
            reveal_secrets: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the defaults; nothing is written to disk.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::config_path() {
                Ok(path) => (path, false),
                Err(_) => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            if required {
                bail!("Config file not found: {}", config_path.display());
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", config_path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            bail!("rpc_url must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.gas_limit == 0 {
            bail!("gas_limit must be greater than zero");
        }
        self.network()?;
        Ok(())
    }

    pub fn network(&self) -> Result<BtcNetwork> {
        BtcNetwork::from_str(&self.bitcoin_network)
            .with_context(|| format!("Unsupported bitcoin_network: {}", self.bitcoin_network))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = home_dir().context("Failed to get home directory")?;
        Ok(home.join(".multiwallet").join("config.toml"))
    }
}
