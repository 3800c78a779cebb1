//! Catalog source backed by a static HTTP file server.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use tracing::instrument;

use ripple_core::error::CatalogError;
use ripple_core::traits::CatalogSource;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches catalog resources relative to a base URL.
///
/// Every request bypasses HTTP caches so a new content version is observed
/// as soon as the server publishes it.
pub struct HttpSource {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{url}{separator}_ts={}", cache_buster())
    }

    fn transport_error(&self, path: &str, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout {
                resource: path.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            CatalogError::Network {
                resource: path.to_string(),
                message: e.to_string(),
            }
        }
    }
}

fn cache_buster() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_json(&self, path: &str) -> Result<Value, CatalogError> {
        let response = self
            .client
            .get(self.url_for(path))
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::warn!(status, "catalog fetch failed");
            return Err(CatalogError::Status {
                resource: path.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(path, e))?;

        serde_json::from_str(&body).map_err(|e| CatalogError::Malformed {
            resource: path.to_string(),
            message: e.to_string(),
        })
    }
}
