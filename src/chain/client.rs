//! JSON-RPC chain-state client
//!
//! Every call is one POST exchange. Transport failures, bad statuses, bad
//! bodies and RPC error objects all surface as [`AppError::ChainUnavailable`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::types::{
    EpochInfo, MaybeContextual, PerformanceSample, SupplyInfo, VoteAccounts,
};
use super::ChainState;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

// == RPC Chain Client ==
/// Chain-state client over HTTP JSON-RPC 2.0.
#[derive(Debug)]
pub struct RpcChainClient {
    http: Client,
    endpoint: String,
    /// Correlation ids, unique for the life of the process
    next_id: AtomicU64,
}

impl RpcChainClient {
    /// Builds a client for `endpoint` with a per-call timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .user_agent(concat!("explorer-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ChainUnavailable(format!("client build failed: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends `method` and decodes its `result` as `T`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_request_id();
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(id, method, "sending chain-state request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_failure(id, method, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(id, method, format!("HTTP status {status}")));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| transport_failure(id, method, &e))?;

        if let Some(error) = envelope.error {
            tracing::debug!(id, method, code = error.code, "node returned error object");
            return Err(unavailable(id, method, error.message));
        }
        if let Some(echoed) = envelope.id.as_ref().and_then(Value::as_u64) {
            if echoed != id {
                tracing::debug!(id, echoed, method, "response id does not match request");
            }
        }

        let result = envelope
            .result
            .ok_or_else(|| unavailable(id, method, "response has no result".to_string()))?;
        serde_json::from_value(result)
            .map_err(|e| unavailable(id, method, format!("unexpected result shape: {e}")))
    }
}

fn unavailable(id: u64, method: &str, message: String) -> AppError {
    tracing::warn!(id, method, error = %message, "chain-state request failed");
    AppError::ChainUnavailable(message)
}

/// reqwest errors name the endpoint URL, so only the log sees them.
fn transport_failure(id: u64, method: &str, error: &reqwest::Error) -> AppError {
    tracing::warn!(id, method, error = %error, "chain-state transport failure");
    AppError::ChainUnavailable(describe_transport_error(error).to_string())
}

fn describe_transport_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection refused or unreachable"
    } else if error.is_decode() {
        "invalid response body"
    } else {
        "request failed"
    }
}

#[async_trait]
impl ChainState for RpcChainClient {
    async fn fetch_supply(&self) -> Result<SupplyInfo> {
        let supply: MaybeContextual<SupplyInfo> = self.call("getSupply", json!([])).await?;
        Ok(supply.into_inner())
    }

    async fn fetch_vote_accounts(&self) -> Result<VoteAccounts> {
        self.call("getVoteAccounts", json!([])).await
    }

    async fn fetch_epoch_info(&self) -> Result<EpochInfo> {
        self.call("getEpochInfo", json!([])).await
    }

    async fn fetch_recent_performance_samples(&self, limit: usize) -> Result<Vec<PerformanceSample>> {
        self.call("getRecentPerformanceSamples", json!([limit])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(url: String) -> RpcChainClient {
        RpcChainClient::new(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_vote_accounts() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r#""method"\s*:\s*"getVoteAccounts""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "current": [{
                            "nodePubkey": "node-a", "votePubkey": "vote-a",
                            "commission": 5, "lastVote": 10, "rootSlot": 9,
                            "activatedStake": 42
                        }],
                        "delinquent": []
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let accounts = client_for(server.url()).fetch_vote_accounts().await.unwrap();

        mock.assert_async().await;
        assert_eq!(accounts.current.len(), 1);
        assert_eq!(accounts.current[0].activated_stake, 42);
        assert!(accounts.delinquent.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_supply_unwraps_context() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "context": {"slot": 5},
                        "value": {"total": 1000, "circulating": 800, "nonCirculating": 200}
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let supply = client_for(server.url()).fetch_supply().await.unwrap();
        assert_eq!(supply.total, 1000);
        assert_eq!(supply.circulating, 800);
    }

    #[tokio::test]
    async fn test_error_object_becomes_chain_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {"code": -32601, "message": "Method not found"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client_for(server.url()).fetch_epoch_info().await.unwrap_err();
        assert!(matches!(&err, AppError::ChainUnavailable(msg) if msg == "Method not found"));
        assert_eq!(err.to_string(), "RPC Error: Method not found");
    }

    #[tokio::test]
    async fn test_http_failure_becomes_chain_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(server.url()).fetch_supply().await.unwrap_err();
        assert!(matches!(err, AppError::ChainUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_node_becomes_chain_unavailable() {
        // Port 9 (discard) on localhost is not listening in test environments
        let client = client_for("http://127.0.0.1:9".to_string());
        let err = client.fetch_vote_accounts().await.unwrap_err();
        assert!(matches!(
            &err,
            AppError::ChainUnavailable(msg) if msg == "connection refused or unreachable"
        ));
        assert!(!err.to_string().contains("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_leak_endpoint() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let url = server.url();
        let err = client_for(url.clone()).fetch_supply().await.unwrap_err();

        assert!(matches!(&err, AppError::ChainUnavailable(msg) if msg == "invalid response body"));
        assert!(!err.to_string().contains(&url));
    }

    #[tokio::test]
    async fn test_request_ids_increase() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"id": 1})))
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":[]}"#)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"id": 2})))
            .with_body(r#"{"jsonrpc":"2.0","id":2,"result":[]}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        client.fetch_recent_performance_samples(5).await.unwrap();
        client.fetch_recent_performance_samples(5).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }
}
