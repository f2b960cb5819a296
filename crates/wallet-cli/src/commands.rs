use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::{info, warn};
use wallet_core::signing::recover_public_key;
use wallet_core::{
    JsonRpcGateway, MessageSignature, PublicKey, SignatureScheme, WalletRecord, WalletSession,
};

use crate::config::Config;
use crate::Command;

/// Execute a command and return the JSON document to print.
pub async fn run(command: Command, config: &Config) -> Result<Value> {
    let mut session = WalletSession::new()
        .with_bitcoin_network(config.network()?)
        .with_gas_limit(config.gas_limit);

    match command {
        Command::Generate => {
            session.generate()?;
            info!(address = %session.ethereum_address()?, "generated new key pair");
            record_output(&session, config)
        }

        Command::Import { key, wif } => {
            // An explicit --wif wins over a key taken from the environment
            match (wif, key) {
                (Some(wif), _) => {
                    session.import_wif(&wif)?;
                }
                (None, Some(key)) => {
                    session.import(&key)?;
                }
                (None, None) => bail!("Provide --key or --wif"),
            }
            record_output(&session, config)
        }

        Command::Sign {
            message,
            key,
            randomized,
        } => {
            session.import(&key)?;
            let scheme = if randomized {
                SignatureScheme::Randomized
            } else {
                SignatureScheme::Deterministic
            };
            let signature = session.sign_message(message.as_bytes(), scheme)?;
            Ok(json!({
                "message": message,
                "scheme": scheme,
                "publicKey": session.public_key()?.to_hex(),
                "signature": signature.to_hex(),
                "r": hex::encode(signature.r()),
                "s": hex::encode(signature.s()),
                "recoveryId": signature.recovery_id(),
            }))
        }

        Command::Verify {
            public_key,
            signature,
            message,
        } => {
            let recoverable = signature.trim().trim_start_matches("0x").len() == 130;
            let signature = MessageSignature::from_hex(&signature).context("Invalid signature")?;
            let public_key = match public_key {
                Some(public_key) => {
                    PublicKey::from_hex(&public_key).context("Invalid public key")?
                }
                None if recoverable => {
                    recover_public_key(message.as_bytes(), &signature)
                        .context("Failed to recover signer")?
                }
                None => bail!("--public-key is required for a 64-byte signature"),
            };
            let valid = wallet_core::verify_message(&public_key, message.as_bytes(), &signature);
            Ok(json!({
                "valid": valid,
                "publicKey": public_key.to_hex(),
                "ethereumAddress": wallet_core::ethereum_address(&public_key)?,
            }))
        }

        Command::DecodeWif { wif } => {
            session.import_wif(&wif)?;
            Ok(json!({
                "network": session.bitcoin_network().to_string(),
                "wallet": output_record(session.record()?, config)?,
            }))
        }

        Command::Balance { address, key } => {
            if let Some(key) = key {
                session.import(&key)?;
            }
            if address.is_none() && session.key_pair().is_err() {
                bail!("Provide an address or --key");
            }
            let gateway = gateway(config)?;
            session.connect(&gateway, &config.rpc_url).await?;
            let report = session.balance(&gateway, address.as_deref()).await?;
            Ok(serde_json::to_value(report)?)
        }

        Command::Send { to, amount, key } => {
            let value_wei = chain_eth::units::parse_ether(&amount)
                .with_context(|| format!("Invalid amount: {amount}"))?;
            session.import(&key)?;
            let gateway = gateway(config)?;
            session.connect(&gateway, &config.rpc_url).await?;
            let receipt = session.send_eth(&gateway, &to, value_wei).await?;
            info!(tx_hash = %receipt.tx_hash, "transaction broadcast");
            Ok(serde_json::to_value(receipt)?)
        }
    }
}

fn gateway(config: &Config) -> Result<JsonRpcGateway> {
    JsonRpcGateway::new(Duration::from_secs(config.timeout_secs))
        .context("Failed to create RPC client")
}

fn record_output(session: &WalletSession, config: &Config) -> Result<Value> {
    output_record(session.record()?, config)
}

fn output_record(record: WalletRecord, config: &Config) -> Result<Value> {
    let record = if config.reveal_secrets {
        warn!("private key material included in output");
        record
    } else {
        record.without_secrets()
    };
    Ok(serde_json::to_value(&record)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn config() -> Config {
        Config::default()
    }

    #[tokio::test]
    async fn import_hides_secrets_by_default() {
        let output = run(
            Command::Import {
                key: Some(TEST_KEY.to_string()),
                wif: None,
            },
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(
            output["ethereumAddress"],
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
        assert_eq!(output["bitcoinAddress"], "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm");
        assert!(output.get("privateKeyHex").is_none());
        assert!(output.get("wif").is_none());
    }

    #[tokio::test]
    async fn import_reveals_secrets_when_configured() {
        let config = Config {
            reveal_secrets: true,
            ..Config::default()
        };
        let output = run(
            Command::Import {
                key: Some(TEST_KEY.to_string()),
                wif: None,
            },
            &config,
        )
        .await
        .unwrap();

        assert_eq!(output["privateKeyHex"], TEST_KEY);
        assert_eq!(
            output["wif"],
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
    }

    #[tokio::test]
    async fn import_requires_a_source() {
        let none = run(Command::Import { key: None, wif: None }, &config()).await;
        assert!(none.is_err());
    }

    #[tokio::test]
    async fn explicit_wif_wins_over_key() {
        let output = run(
            Command::Import {
                key: Some("0000000000000000000000000000000000000000000000000000000000000002".into()),
                wif: Some("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn".into()),
            },
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(
            output["ethereumAddress"],
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[tokio::test]
    async fn decode_testnet_wif() {
        let output = run(
            Command::DecodeWif {
                wif: "cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN87JcbXMTcA".to_string(),
            },
            &config(),
        )
        .await
        .unwrap();

        assert_eq!(output["network"], "testnet");
        assert!(output["wallet"]["bitcoinAddress"]
            .as_str()
            .unwrap()
            .starts_with(['m', 'n']));
    }

    #[tokio::test]
    async fn sign_then_verify() {
        let signed = run(
            Command::Sign {
                message: "hello".to_string(),
                key: TEST_KEY.to_string(),
                randomized: false,
            },
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(signed["scheme"], "deterministic");

        let public_key = signed["publicKey"].as_str().unwrap().to_string();
        let signature = signed["signature"].as_str().unwrap().to_string();

        let valid = run(
            Command::Verify {
                public_key: Some(public_key.clone()),
                signature: signature.clone(),
                message: "hello".to_string(),
            },
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(valid["valid"], true);

        let tampered = run(
            Command::Verify {
                public_key: Some(public_key.clone()),
                signature: signature.clone(),
                message: "hellp".to_string(),
            },
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(tampered["valid"], false);

        let recovered = run(
            Command::Verify {
                public_key: None,
                signature: signature.clone(),
                message: "hello".to_string(),
            },
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(recovered["valid"], true);
        assert_eq!(recovered["publicKey"], public_key.as_str());
        assert_eq!(
            recovered["ethereumAddress"],
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );

        let short = run(
            Command::Verify {
                public_key: None,
                signature: signature[..128].to_string(),
                message: "hello".to_string(),
            },
            &config(),
        )
        .await;
        assert!(short.is_err());
    }

    #[tokio::test]
    async fn send_rejects_bad_amount_before_network() {
        let config = Config {
            rpc_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let result = run(
            Command::Send {
                to: "0x3535353535353535353535353535353535353535".to_string(),
                amount: "one".to_string(),
                key: TEST_KEY.to_string(),
            },
            &config,
        )
        .await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Invalid amount"));
    }

    #[tokio::test]
    async fn balance_needs_address_or_key() {
        let result = run(
            Command::Balance {
                address: None,
                key: None,
            },
            &config(),
        )
        .await;
        assert!(result.is_err());
    }
}
