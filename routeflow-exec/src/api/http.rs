use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use routeflow_core::{BridgeStatus, Route};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use url::Url;

use crate::api::backoff::{parse_retry_after, retry_delay};
use crate::api::{ApiError, QuoteApi, QuoteRequest, StatusApi, StatusSnapshot};

#[derive(Debug, Clone)]
pub struct BridgeApiConfig {
    pub base_url: Url,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    /// Attempts per call when the endpoint rate-limits or the connection
    /// drops; the first attempt counts.
    pub max_attempts: usize,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
}

impl BridgeApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(10),
        }
    }
}

/// Reqwest-backed client for the vendor quote + status endpoints.
pub struct HttpBridgeClient {
    config: BridgeApiConfig,
    client: reqwest::Client,
}

impl HttpBridgeClient {
    pub fn new(config: BridgeApiConfig) -> Self {
        // Client creation should never fail in practice, but if it does, we'll
        // get a better error when trying to use it rather than panicking at
        // initialization.
        let client = reqwest::Client::builder()
            .user_agent(concat!("routeflow-exec/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                panic!("failed to create reqwest HTTP client: {e}. This is a bug - please report it.");
            });
        Self { config, client }
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        if !query.is_empty() {
            let qs = query
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&qs));
        }
        Ok(url)
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        url: Url,
        body: Option<&JsonValue>,
    ) -> Result<JsonValue, ApiError> {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            let mut rb = self
                .client
                .request(method.clone(), url.clone())
                .timeout(self.config.timeout);
            if let Some(key) = &self.config.api_key {
                rb = rb.header("x-client-id", key.expose_secret());
            }
            if let Some(body) = body {
                rb = rb.json(body);
            }

            match rb.send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if resp.status().is_success() {
                        return resp
                            .json::<JsonValue>()
                            .await
                            .map_err(|e| ApiError::Decode(e.to_string()));
                    }
                    let retryable = matches!(status, 429 | 502 | 503 | 504);
                    if !retryable || attempt >= self.config.max_attempts {
                        return Err(ApiError::Http { status });
                    }
                    let delay = parse_retry_after(resp.headers(), SystemTime::now())
                        .unwrap_or_else(|| {
                            retry_delay(
                                attempt,
                                self.config.retry_base_delay,
                                self.config.retry_max_delay,
                            )
                        });
                    tokio::time::sleep(delay.min(self.config.retry_max_delay)).await;
                }
                Err(err) => {
                    let mapped = map_reqwest_error(&err);
                    let retryable = matches!(mapped, ApiError::Network(_) | ApiError::Timeout);
                    if !retryable || attempt >= self.config.max_attempts {
                        return Err(mapped);
                    }
                    let delay = retry_delay(
                        attempt,
                        self.config.retry_base_delay,
                        self.config.retry_max_delay,
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn snapshot_from(value: JsonValue) -> Result<StatusSnapshot, ApiError> {
        let status: BridgeStatus = value
            .get("status")
            .cloned()
            .ok_or_else(|| ApiError::Decode("missing status field".to_string()))
            .and_then(|v| {
                serde_json::from_value(v).map_err(|e| ApiError::Decode(e.to_string()))
            })?;
        Ok(StatusSnapshot {
            status,
            detail: value,
        })
    }
}

#[async_trait]
impl QuoteApi for HttpBridgeClient {
    async fn prepare(&self, req: &QuoteRequest) -> Result<Route, ApiError> {
        let url = self.endpoint("v1/routes/prepare", &[])?;
        let body = serde_json::to_value(req).map_err(|e| ApiError::Decode(e.to_string()))?;
        let value = self
            .send_json(reqwest::Method::POST, url, Some(&body))
            .await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StatusApi for HttpBridgeClient {
    async fn transaction_status(
        &self,
        chain_id: u64,
        tx_hash: &str,
    ) -> Result<StatusSnapshot, ApiError> {
        let url = self.endpoint(
            "v1/status",
            &[
                ("chainId", chain_id.to_string()),
                ("transactionHash", tx_hash.to_string()),
            ],
        )?;
        let value = self.send_json(reqwest::Method::GET, url, None).await?;
        Self::snapshot_from(value)
    }

    async fn onramp_status(&self, session_id: &str) -> Result<StatusSnapshot, ApiError> {
        let url = self.endpoint("v1/onramp/status", &[("id", session_id.to_string())])?;
        let value = self.send_json(reqwest::Method::GET, url, None).await?;
        Self::snapshot_from(value)
    }
}

fn map_reqwest_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        return ApiError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return ApiError::Network(e.to_string());
    }
    ApiError::Network(e.to_string())
}
