mod backoff;
mod http;

use async_trait::async_trait;
use routeflow_core::{BridgeStatus, Route, RouteKind};
use serde_json::Value as JsonValue;

pub use backoff::{parse_retry_after, retry_delay};
pub use http::{BridgeApiConfig, HttpBridgeClient};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("bridge API returned HTTP {status}")]
    Http { status: u16 },
    #[error("failed to decode bridge API response: {0}")]
    Decode(String),
}

/// One observation of a leg's bridge-level status, plus whatever payload
/// the endpoint attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub status: BridgeStatus,
    pub detail: JsonValue,
}

/// Inputs the quote endpoint turns into a prepared [`Route`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct QuoteRequest {
    #[serde(rename = "type")]
    pub kind: RouteKind,
    #[serde(rename = "originChainId")]
    pub origin_chain_id: u64,
    #[serde(rename = "destinationChainId")]
    pub destination_chain_id: u64,
    #[serde(rename = "originTokenAddress")]
    pub origin_token: String,
    #[serde(rename = "destinationTokenAddress")]
    pub destination_token: String,
    pub amount: String,
    pub sender: String,
    pub receiver: String,
}

/// Quote/prepare surface: turns a request into an immutable route.
#[async_trait]
pub trait QuoteApi: Send + Sync {
    async fn prepare(&self, req: &QuoteRequest) -> Result<Route, ApiError>;
}

/// Status surface, keyed by chain + transaction hash for chain legs and by
/// session id for the onramp leg.
#[async_trait]
pub trait StatusApi: Send + Sync {
    async fn transaction_status(
        &self,
        chain_id: u64,
        tx_hash: &str,
    ) -> Result<StatusSnapshot, ApiError>;

    async fn onramp_status(&self, session_id: &str) -> Result<StatusSnapshot, ApiError>;
}
