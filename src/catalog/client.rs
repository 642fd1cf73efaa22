//! Authenticated HTTP client for the catalog API.
//!
//! Carries the hardening the upstream API asks of well-behaved clients:
//! token-bucket rate limiting at 4 requests / second, automatic retry on
//! HTTP 429 with `Retry-After` header support (max 3 retries), and a
//! 30-second request timeout.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::{Error, Result};

use super::{ItemSummary, MediaKind, TitleDetail};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<ItemSummary>,
}

/// Catalog API client with bearer authentication.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl CatalogClient {
    /// Create a new catalog client from config.
    pub fn new(config: &CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let quota = Quota::per_second(NonZeroU32::new(4).unwrap());
        let rate_limiter = RateLimiter::direct(quota);

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            rate_limiter,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .header("accept", "application/json")
                .bearer_auth(&self.access_token)
                .send()
                .await
                .map_err(|e| Error::transport(format!("catalog request failed: {e}")))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "catalog returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if resp.status() == StatusCode::NOT_FOUND {
                return Err(Error::not_found(format!("catalog returned 404: {url}")));
            }
            if !resp.status().is_success() {
                return Err(Error::transport(format!(
                    "catalog returned {}: {url}",
                    resp.status()
                )));
            }

            return Ok(resp);
        }
    }

    /// Fetch a result list for a bucket endpoint path.
    ///
    /// A missing `results` field parses as an empty list.
    pub async fn list(&self, path: &str) -> Result<Vec<ItemSummary>> {
        let url = self.url(path);
        debug!(url = %url, "catalog list");

        let body: ListResponse = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("failed to parse catalog list: {e}")))?;

        Ok(body.results)
    }

    /// Fetch the detail payload for a single title.
    pub async fn detail(&self, id: u64, kind: MediaKind) -> Result<TitleDetail> {
        let url = self.url(&format!("/{}/{}", kind.as_str(), id));
        debug!(url = %url, "catalog detail");

        self.get(&url)
            .await?
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("failed to parse catalog detail: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            access_token: "test-token".to_string(),
            account_id: None,
            base_url: base_url.to_string(),
            cache_ttl_secs: 60,
        })
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = client_for("https://api.example.com/3/");
        assert_eq!(
            client.url("/movie/popular"),
            "https://api.example.com/3/movie/popular"
        );
    }

    #[test]
    fn list_response_defaults_missing_results() {
        let body: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(body.results.is_empty());
    }
}
