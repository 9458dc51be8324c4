//! HTTP transport shared by the provider clients.
//!
//! Every network wrapper (weather, transit, menus) goes through a single
//! [`Fetcher`] so timeouts, the user agent, status handling and body size
//! limits are applied uniformly. Nothing is cached: each briefing is
//! computed from fresh responses.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum response size to accept (default 5MB)
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_content_size: 5 * 1024 * 1024, // 5MB
            timeout: Duration::from_secs(30),
            user_agent: format!("campus-briefing/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP fetcher returning decoded JSON bodies.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("campus-briefing")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }

    /// GET a URL and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        info!("Fetching {}", redact(url));
        let response = self.client.get(url.as_str()).send().await?;
        let body = self.read_body(url, response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a GraphQL query document (`application/graphql`) and decode the JSON response.
    pub async fn post_graphql<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &str,
        extra_headers: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        info!("Posting GraphQL query to {}", url);
        let mut request = self
            .client
            .post(url.as_str())
            .header(CONTENT_TYPE, "application/graphql")
            .body(query.to_string());

        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::InvalidUrl(format!("Bad header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::InvalidUrl(format!("Bad header value: {}", e)))?;
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let body = self.read_body(url, response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Check status and size, then return the raw body.
    async fn read_body(
        &self,
        url: &Url,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, FetchError> {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        check_status(
            response.status(),
            retry_after.as_deref(),
            url.host_str().unwrap_or("unknown"),
        )?;

        let content = response.bytes().await?;

        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        debug!("Received {} bytes from {}", content.len(), redact(url));
        Ok(content.to_vec())
    }
}

/// Map a response status to an error, if it is not a success.
fn check_status(
    status: StatusCode,
    retry_after: Option<&str>,
    host: &str,
) -> Result<(), FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = retry_after.and_then(|s| s.parse().ok()).unwrap_or(60);
        return Err(FetchError::RateLimited {
            host: host.to_string(),
            retry_after_secs,
        });
    }

    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    Ok(())
}

/// Strip the query string so API keys never reach the logs.
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.query().is_some() {
        shown.set_query(Some("redacted"));
    }
    shown.to_string()
}
