use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use super::address::Address;
use super::rpc::{RpcClient, RpcError};
use super::CODE_USER_REJECTED;
use crate::feed::Tweet;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transaction rejected by the user")]
    Rejected,
    #[error("remote call failed: {0}")]
    Remote(String),
}

/// Typed facade over the contract's callable surface. The contract itself
/// enforces authorship, persistence, and double-like rules; this trait only
/// marshals the three calls. Tests substitute an in-memory fake.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    async fn submit_post(&self, content: &str, from: &Address) -> Result<(), GatewayError>;

    /// Returns the full post set for a viewing context. Order is
    /// unspecified here; the renderer owns ordering.
    async fn fetch_all_posts(&self, viewer: &Address) -> Result<Vec<Tweet>, GatewayError>;

    async fn like_post(&self, author: &Address, id: u64, from: &Address)
        -> Result<(), GatewayError>;
}

/// Gateway speaking JSON-RPC 2.0 to the deployed contract service:
/// `createTweet`, `getAllTweets`, `likeTweet`.
pub struct RpcGateway {
    rpc: RpcClient,
}

impl RpcGateway {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            rpc: RpcClient::new(url, timeout),
        }
    }
}

fn map_rpc_error(e: RpcError) -> GatewayError {
    match e {
        RpcError::Remote { code, .. } if code == CODE_USER_REJECTED => GatewayError::Rejected,
        other => GatewayError::Remote(other.to_string()),
    }
}

/// Decode the fetched rows one by one, dropping rows that fail to decode
/// so one malformed post never sinks the whole list.
pub fn decode_posts(rows: Vec<serde_json::Value>) -> Vec<Tweet> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Tweet>(row) {
            Ok(tweet) => Some(tweet),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed post row");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ContractGateway for RpcGateway {
    async fn submit_post(&self, content: &str, from: &Address) -> Result<(), GatewayError> {
        self.rpc
            .call("createTweet", json!([content, from.as_str()]))
            .await
            .map_err(map_rpc_error)?;
        Ok(())
    }

    async fn fetch_all_posts(&self, viewer: &Address) -> Result<Vec<Tweet>, GatewayError> {
        let result = self
            .rpc
            .call("getAllTweets", json!([viewer.as_str()]))
            .await
            .map_err(map_rpc_error)?;

        let rows: Vec<serde_json::Value> = serde_json::from_value(result)
            .map_err(|e| GatewayError::Remote(format!("malformed post list: {e}")))?;

        Ok(decode_posts(rows))
    }

    async fn like_post(
        &self,
        author: &Address,
        id: u64,
        from: &Address,
    ) -> Result<(), GatewayError> {
        self.rpc
            .call("likeTweet", json!([author.as_str(), id, from.as_str()]))
            .await
            .map_err(map_rpc_error)?;
        Ok(())
    }
}
