use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Minimal JSON-RPC 2.0 client shared by the wallet provider and the
/// contract gateway. One HTTP POST per call, no batching, no subscriptions.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote error {code}: {message}")]
    Remote { code: i64, message: String },
    #[error("response carried neither result nor error")]
    EmptyResponse,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("chainfeed/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!(method, url = %self.url, "rpc call");

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            tracing::warn!(method, code = err.code, message = %err.message, "rpc error");
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }

        response.result.ok_or(RpcError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_error_deserializes() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#;
        let resp: RpcResponse = serde_json::from_str(raw).unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, 4001);
        assert!(resp.result.is_none());
    }

    #[test]
    fn test_response_with_result_deserializes() {
        let raw = r#"{"jsonrpc":"2.0","id":2,"result":["0xabc"]}"#;
        let resp: RpcResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.error.is_none());
        assert_eq!(resp.result.unwrap()[0], "0xabc");
    }

    #[test]
    fn test_request_serializes_envelope() {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "getAllTweets",
            params: serde_json::json!(["0xabc"]),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "getAllTweets");
        assert_eq!(json["params"][0], "0xabc");
    }
}
