//! HTTP catalog provider
//!
//! Forwards `GET {base_url}/{operation}?{options}` to a scraper bridge and
//! returns the JSON body untouched. Non-2xx answers become
//! `ProviderError::Upstream` with the bridge's `message` field (or the raw
//! body when it is not JSON).

use async_trait::async_trait;
use gp_common::CatalogOptions;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{CatalogProvider, Operation, ProviderError, Result};

/// Configuration for the HTTP provider
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3100".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl HttpProviderConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

pub struct HttpCatalogProvider {
    client: Client,
    base_url: String,
}

impl HttpCatalogProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        info!(
            base_url = %base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            "HttpCatalogProvider initialized"
        );

        Ok(Self { client, base_url })
    }

    fn operation_url(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.as_str())
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch(&self, operation: Operation, options: &CatalogOptions) -> Result<Value> {
        let url = self.operation_url(operation);
        let query: Vec<(&str, &str)> = options.iter().collect();

        debug!(operation = %operation, url = %url, options = options.len(), "Calling catalog provider");

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = upstream_message(status, &body);
            warn!(
                operation = %operation,
                status = status.as_u16(),
                message = %message,
                "Catalog provider rejected call"
            );
            return Err(ProviderError::upstream(status.as_u16(), message));
        }

        serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Best message for a failed call: JSON `message`, then body text, then status reason.
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if !text.is_empty() {
        return text;
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
