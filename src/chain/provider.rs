use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use super::address::Address;
use super::rpc::{RpcClient, RpcError};
use super::CODE_USER_REJECTED;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("no wallet provider reachable at {url}")]
    NoProvider { url: String },
    #[error("connection request rejected by the user")]
    Rejected,
    #[error("no accounts authorized by the wallet")]
    NoAccounts,
    #[error("wallet provider error: {0}")]
    Remote(String),
}

/// The consumed wallet surface: hand out the accounts the user authorizes.
/// Signing and key custody stay inside the provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;
}

/// Wallet provider reached over JSON-RPC, e.g. a local node or a
/// wallet daemon exposing `eth_requestAccounts`.
pub struct HttpWalletProvider {
    rpc: RpcClient,
}

impl HttpWalletProvider {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            rpc: RpcClient::new(url, timeout),
        }
    }

    /// Liveness probe. A provider that cannot answer a version request is
    /// treated as absent, distinct from one that declines accounts.
    async fn probe(&self) -> Result<(), WalletError> {
        match self.rpc.call("web3_clientVersion", json!([])).await {
            Ok(_) => Ok(()),
            Err(RpcError::Transport(e)) => {
                tracing::warn!(url = self.rpc.url(), error = %e, "wallet probe failed");
                Err(WalletError::NoProvider {
                    url: self.rpc.url().to_string(),
                })
            }
            // Endpoint answered, even if it dislikes the method.
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.probe().await?;

        let result = self
            .rpc
            .call("eth_requestAccounts", json!([]))
            .await
            .map_err(|e| match e {
                RpcError::Remote { code, .. } if code == CODE_USER_REJECTED => {
                    WalletError::Rejected
                }
                other => WalletError::Remote(other.to_string()),
            })?;

        let raw: Vec<String> = serde_json::from_value(result)
            .map_err(|e| WalletError::Remote(format!("malformed accounts list: {e}")))?;

        let accounts: Vec<Address> = raw
            .iter()
            .filter_map(|s| match Address::parse(s) {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(account = %s, error = %e, "skipping malformed account");
                    None
                }
            })
            .collect();

        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        Ok(accounts)
    }
}
