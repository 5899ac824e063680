//! HTTP transport for the portal backend
//!
//! Wraps reqwest with the behavior every portal request needs:
//! - base-URL joining, so callers pass endpoint paths
//! - automatic retries with configurable backoff
//! - 429 handling that honors the Retry-After header
//! - optional client-side rate limiting

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use bytes::Bytes;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Hosted backend used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://insuredricescanwebapp-backend.onrender.com";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Backend base URL; endpoint paths are joined onto it
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries per request
    pub max_retries: u32,
    /// Initial backoff delay
    pub initial_backoff: Duration,
    /// Backoff ceiling
    pub max_backoff: Duration,
    /// Backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration, None disables limiting
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("ricescan-portal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiClientConfig {
    /// Create a config builder
    pub fn builder() -> ApiClientConfigBuilder {
        ApiClientConfigBuilder::default()
    }
}

/// Builder for [`ApiClientConfig`]
#[derive(Default)]
pub struct ApiClientConfigBuilder {
    config: ApiClientConfig,
}

impl ApiClientConfigBuilder {
    /// Set the backend base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff strategy and bounds
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set the rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ApiClientConfig {
        self.config
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Extra headers
    pub headers: HashMap<String, String>,
    /// JSON body
    pub body: Option<Value>,
    /// Timeout override
    pub timeout: Option<Duration>,
    /// Max retries override
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create an empty request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// HTTP client with retry, backoff and rate limiting
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl ApiClient {
    /// Create a client against the hosted backend with default settings
    pub fn new() -> Self {
        Self::with_config(ApiClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ApiClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("failed to build HTTP client");

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Self {
            client,
            config,
            rate_limiter,
        }
    }

    /// The client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET an endpoint and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::GET, path, RequestConfig::default())
            .await
    }

    /// GET an endpoint with request options and parse the JSON response
    pub async fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.request_json(Method::GET, path, config).await
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::POST, path, RequestConfig::default().json(body))
            .await
    }

    /// PUT a JSON body and parse the JSON response
    pub async fn put_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::PUT, path, RequestConfig::default().json(body))
            .await
    }

    /// PATCH with an optional JSON body and parse the JSON response
    pub async fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let config = match body {
            Some(body) => RequestConfig::default().json(body),
            None => RequestConfig::default(),
        };
        self.request_json(Method::PATCH, path, config).await
    }

    /// DELETE an endpoint and parse the JSON response
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(Method::DELETE, path, RequestConfig::default())
            .await
    }

    /// Download a raw body, e.g. an evidence photo from its CDN URL
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self
            .request(Method::GET, url, RequestConfig::default())
            .await?;
        response.bytes().await.map_err(Error::Http)
    }

    /// Make a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, path, config).await?;
        response.json().await.map_err(Error::Http)
    }

    /// Make a request with retries, returning the raw response
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let url = self.resolve_url(path);
        let max_retries = config.max_retries.unwrap_or(self.config.max_retries);
        let timeout = config.timeout.unwrap_or(self.config.timeout);

        let mut attempt = 0;
        let mut last_error = None;

        loop {
            if attempt > max_retries {
                return Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }));
            }

            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let request = self.assemble(method.clone(), &url, &config, timeout);
            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_seconds(&response);
                        if attempt >= max_retries {
                            return Err(Error::RateLimited {
                                retry_after_seconds: retry_after,
                            });
                        }
                        warn!(
                            "{} {} rate limited, waiting {}s (attempt {}/{})",
                            method,
                            url,
                            retry_after,
                            attempt + 1,
                            max_retries + 1
                        );
                        last_error = Some(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                        tokio::time::sleep(Duration::from_secs(retry_after)).await;
                    } else if status.is_server_error() && attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            "{} {} returned {}, retrying in {:?} (attempt {}/{})",
                            method,
                            url,
                            status.as_u16(),
                            delay,
                            attempt + 1,
                            max_retries + 1
                        );
                        last_error = Some(Error::HttpStatus {
                            status: status.as_u16(),
                            body: String::new(),
                        });
                        tokio::time::sleep(delay).await;
                    } else if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::HttpStatus {
                            status: status.as_u16(),
                            body,
                        });
                    } else {
                        debug!("{} {} -> {}", method, url, status.as_u16());
                        return Ok(response);
                    }
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < max_retries => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "{} {} failed ({}), retrying in {:?} (attempt {}/{})",
                        method,
                        url,
                        e,
                        delay,
                        attempt + 1,
                        max_retries + 1
                    );
                    last_error = Some(if e.is_timeout() {
                        Error::Timeout {
                            timeout_ms: timeout.as_millis() as u64,
                        }
                    } else {
                        Error::Http(e)
                    });
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_timeout() => {
                    return Err(Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                Err(e) => return Err(Error::Http(e)),
            }

            attempt += 1;
        }
    }

    /// Backoff delay for a retry attempt, capped at the configured maximum
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => self.config.initial_backoff * 2u32.saturating_pow(attempt),
        };

        delay.min(self.config.max_backoff)
    }

    /// Build the request with defaults, options and body applied
    fn assemble(
        &self,
        method: Method,
        url: &str,
        config: &RequestConfig,
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, url);

        for (key, value) in &self.config.default_headers {
            request = request.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            request = request.query(&config.query);
        }
        if let Some(body) = &config.body {
            request = request.json(body);
        }

        request.timeout(timeout)
    }

    /// Join an endpoint path onto the base URL; absolute URLs pass through
    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Seconds to wait from a 429's Retry-After header, defaulting to 60
fn retry_after_seconds(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
