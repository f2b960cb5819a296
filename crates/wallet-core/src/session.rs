use chain_btc::BtcNetwork;
use chain_eth::transaction::{sign_transaction, validate_recipient, TransactionRequest};
use chain_eth::chains::chain_name;
use chain_eth::units::format_ether;
use chain_eth::DEFAULT_GAS_LIMIT;
use chain_gateway::{ChainGateway, Connection, GatewayError};
use tracing::{debug, info, warn};

use crate::address::{bitcoin_address, ethereum_address, validate_address};
use crate::error::WalletError;
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::signing::{self, MessageSignature, SignatureScheme};
use crate::types::{BalanceReport, Chain, TransferReceipt, WalletRecord};

/// State held across wallet operations: at most one key pair and at most one
/// node connection.
///
/// The caller owns the session and passes it to each operation. Connections
/// are only made by [`connect`](Self::connect); a dropped or never-made
/// connection is reported, not re-established.
#[derive(Debug)]
pub struct WalletSession {
    keys: Option<KeyPair>,
    connection: Option<Connection>,
    bitcoin_network: BtcNetwork,
    gas_limit: u64,
}

impl Default for WalletSession {
    fn default() -> Self {
        Self {
            keys: None,
            connection: None,
            bitcoin_network: BtcNetwork::Mainnet,
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Network used for the Bitcoin address and WIF in [`record`](Self::record).
    pub fn with_bitcoin_network(mut self, network: BtcNetwork) -> Self {
        self.bitcoin_network = network;
        self
    }

    /// Fixed gas limit for [`send_eth`](Self::send_eth).
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn bitcoin_network(&self) -> BtcNetwork {
        self.bitcoin_network
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Replaces the session key with a freshly generated one.
    pub fn generate(&mut self) -> Result<&KeyPair, WalletError> {
        let pair = KeyPair::generate()?;
        debug!("generated new key pair");
        Ok(&*self.keys.insert(pair))
    }

    /// Replaces the session key with one imported from hex.
    pub fn import(&mut self, private_key_hex: &str) -> Result<&KeyPair, WalletError> {
        let pair = KeyPair::from_hex(private_key_hex)?;
        debug!("imported key pair");
        Ok(&*self.keys.insert(pair))
    }

    /// Replaces the session key with one decoded from WIF. The session's
    /// Bitcoin network follows the WIF prefix.
    pub fn import_wif(&mut self, wif: &str) -> Result<&KeyPair, WalletError> {
        let decoded = chain_btc::from_wif(wif)?;
        let pair = KeyPair::from_private_key(PrivateKey::from_bytes(&decoded.private_key)?);
        self.bitcoin_network = decoded.network;
        debug!(network = %decoded.network, "imported key pair from WIF");
        Ok(&*self.keys.insert(pair))
    }

    pub fn key_pair(&self) -> Result<&KeyPair, WalletError> {
        self.keys.as_ref().ok_or(WalletError::MissingPrivateKey)
    }

    /// Public key of the session key; `MissingPrivateKey` before one exists.
    pub fn public_key(&self) -> Result<&PublicKey, WalletError> {
        Ok(self.key_pair()?.public_key())
    }

    pub fn ethereum_address(&self) -> Result<String, WalletError> {
        ethereum_address(self.public_key()?)
    }

    pub fn bitcoin_address(&self) -> Result<String, WalletError> {
        bitcoin_address(self.public_key()?, self.bitcoin_network)
    }

    /// The full wallet record, secrets included. Callers decide whether to
    /// strip them with [`WalletRecord::without_secrets`].
    ///
    /// Addresses come from the uncompressed public key while the WIF carries
    /// the compressed-key flag.
    pub fn record(&self) -> Result<WalletRecord, WalletError> {
        let pair = self.key_pair()?;
        let public_key = pair.public_key();

        Ok(WalletRecord {
            private_key_hex: Some(pair.private_key().to_hex().to_string()),
            public_key_hex: public_key.to_hex(),
            bitcoin_address: bitcoin_address(public_key, self.bitcoin_network)?,
            ethereum_address: ethereum_address(public_key)?,
            wif: Some(chain_btc::to_wif(
                &pair.private_key().to_bytes(),
                self.bitcoin_network,
                true,
            )),
        })
    }

    pub fn sign_message(
        &self,
        message: &[u8],
        scheme: SignatureScheme,
    ) -> Result<MessageSignature, WalletError> {
        signing::sign_message(self.key_pair()?.private_key(), message, scheme)
    }

    /// Connects to `endpoint`, replacing any existing connection.
    pub async fn connect<G>(&mut self, gateway: &G, endpoint: &str) -> Result<&Connection, WalletError>
    where
        G: ChainGateway + ?Sized,
    {
        let connection = gateway.connect(endpoint).await?;
        info!(
            endpoint = %connection.display_endpoint(),
            chain_id = connection.chain_id(),
            "session connected"
        );
        Ok(&*self.connection.insert(connection))
    }

    /// Forgets the current connection, returning it if there was one.
    pub fn disconnect(&mut self) -> Option<Connection> {
        self.connection.take()
    }

    pub fn connection(&self) -> Result<&Connection, WalletError> {
        self.connection
            .as_ref()
            .ok_or_else(|| GatewayError::Connection("not connected to a node".into()).into())
    }

    /// Balance of `address`, or of the session's own Ethereum address when
    /// `None`.
    pub async fn balance<G>(&self, gateway: &G, address: Option<&str>) -> Result<BalanceReport, WalletError>
    where
        G: ChainGateway + ?Sized,
    {
        let address = match address {
            Some(address) => {
                if !validate_address(address, Chain::Ethereum)? {
                    return Err(WalletError::InvalidAddress(format!(
                        "EIP-55 checksum mismatch for {address}"
                    )));
                }
                address.to_string()
            }
            None => self.ethereum_address()?,
        };
        let connection = self.connection()?;

        let wei = gateway.get_balance(connection, &address).await?;
        debug!(%address, wei, "fetched balance");

        Ok(BalanceReport {
            address,
            chain_id: connection.chain_id(),
            network: chain_name(connection.chain_id()),
            wei: wei.to_string(),
            ether: format_ether(wei),
        })
    }

    /// Sends `value_wei` to `to` from the session key.
    ///
    /// Fetches the pending nonce and current gas price, builds a legacy
    /// transaction with the session gas limit and the connection's chain id,
    /// signs it, and broadcasts the raw bytes. Nothing is retried.
    pub async fn send_eth<G>(&self, gateway: &G, to: &str, value_wei: u128) -> Result<TransferReceipt, WalletError>
    where
        G: ChainGateway + ?Sized,
    {
        let pair = self.key_pair()?;
        validate_recipient(to)?;
        let connection = self.connection()?;
        let from = ethereum_address(pair.public_key())?;

        let nonce = gateway.get_nonce(connection, &from).await?;
        let gas_price = gateway.get_gas_price(connection).await?;

        let tx = TransactionRequest::new()
            .to(to)
            .value(value_wei)
            .gas_limit(self.gas_limit)
            .gas_price(gas_price)
            .nonce(nonce)
            .chain_id(connection.chain_id())
            .build()?;
        let signed = sign_transaction(&tx, &pair.private_key().to_bytes())?;

        let tx_hash = gateway.broadcast(connection, signed.raw_tx()).await?;
        if !tx_hash.eq_ignore_ascii_case(&signed.tx_hash()) {
            warn!(
                node = %tx_hash,
                local = %signed.tx_hash(),
                "node reported a different transaction hash"
            );
        }
        info!(%tx_hash, nonce, "sent ETH transfer");

        Ok(TransferReceipt {
            tx_hash,
            from,
            to: tx.to_address(),
            value_wei: value_wei.to_string(),
            nonce,
            gas_price_wei: gas_price.to_string(),
            gas_limit: self.gas_limit,
            chain_id: connection.chain_id(),
            network: chain_name(connection.chain_id()),
        })
    }
}
