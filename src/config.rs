//! Portal configuration
//!
//! Loaded from a YAML file in which every field is optional, so a missing
//! or partial file still yields a working setup pointed at the hosted
//! backend. The `RICESCAN_API_URL` environment variable overrides the
//! backend address regardless of what the file says.

use crate::api::{ApiClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::types::BackoffType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding the backend base URL
pub const ENV_API_URL: &str = "RICESCAN_API_URL";

/// Session file used when the config does not name one
static DEFAULT_SESSION_FILE: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ricescan")
        .join("session.json")
});

// ============================================================================
// Top-Level Portal Config
// ============================================================================

/// Complete portal configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Backend base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Where the signed-in session is persisted
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// List pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http: HttpConfig::default(),
            session_file: default_session_file(),
            pagination: PaginationConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_session_file() -> PathBuf {
    DEFAULT_SESSION_FILE.clone()
}

impl PortalConfig {
    /// Load a portal configuration from a YAML file
    ///
    /// Applies the `RICESCAN_API_URL` override and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let mut config: Self = serde_yaml::from_str(&content)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from defaults and the environment alone
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_config(
                "base_url",
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_config(
                "http.timeout_seconds",
                "must be positive",
            ));
        }

        if self.http.rate_limit.enabled && self.http.rate_limit.requests_per_second == 0 {
            return Err(Error::invalid_config(
                "http.rate_limit.requests_per_second",
                "must be positive when rate limiting is enabled",
            ));
        }

        if self.pagination.page_size_options.is_empty() {
            return Err(Error::invalid_config(
                "pagination.page_size_options",
                "must not be empty",
            ));
        }

        if !self
            .pagination
            .page_size_options
            .contains(&self.pagination.page_size)
        {
            return Err(Error::invalid_config(
                "pagination.page_size",
                format!(
                    "{} is not one of the offered sizes {:?}",
                    self.pagination.page_size, self.pagination.page_size_options
                ),
            ));
        }

        Ok(())
    }

    /// Derive the API client configuration
    pub fn client_config(&self) -> ApiClientConfig {
        let rate_limit = self.http.rate_limit.enabled.then(|| {
            RateLimiterConfig::new(
                self.http.rate_limit.requests_per_second,
                self.http.rate_limit.burst_size,
            )
        });

        ApiClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.http.timeout_seconds),
            max_retries: self.http.max_retries,
            initial_backoff: Duration::from_millis(self.http.retry_backoff.initial_ms),
            max_backoff: Duration::from_millis(self.http.retry_backoff.max_ms),
            backoff_type: self.http.retry_backoff.backoff_type,
            rate_limit,
            ..ApiClientConfig::default()
        }
    }

    fn apply_env(&mut self) {
        self.apply_base_url_override(std::env::var(ENV_API_URL).ok());
    }

    fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(value) = value {
            if !value.trim().is_empty() {
                self.base_url = value;
            }
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff: BackoffConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether client-side rate limiting is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Sustained requests per second
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Burst allowance
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rps() -> u32 {
    10
}

fn default_burst() -> u32 {
    10
}

// ============================================================================
// Pagination Config
// ============================================================================

/// List pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes offered by the size selector
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    PAGE_SIZE_OPTIONS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.http.max_retries, 3);
        assert!(config.http.rate_limit.enabled);
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.pagination.page_size_options, vec![5, 10, 25, 50, 100]);
        assert!(config.session_file.ends_with(".ricescan/session.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
base_url: "http://localhost:4000"
"#;

        let config: PortalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.pagination.page_size, 10);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
base_url: "https://staging.example.com"
http:
  timeout_seconds: 10
  max_retries: 2
  retry_backoff:
    type: linear
    initial_ms: 50
    max_ms: 5000
  rate_limit:
    enabled: false
session_file: "/tmp/ricescan/session.json"
pagination:
  page_size: 25
"#;

        let config: PortalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.http.max_retries, 2);
        assert!(matches!(
            config.http.retry_backoff.backoff_type,
            BackoffType::Linear
        ));
        assert_eq!(config.http.retry_backoff.initial_ms, 50);
        assert!(!config.http.rate_limit.enabled);
        assert_eq!(
            config.session_file,
            PathBuf::from("/tmp/ricescan/session.json")
        );
        assert_eq!(config.pagination.page_size, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = PortalConfig::default();

        config.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidUrl(_))
        ));

        config.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { field, .. }) if field == "base_url"
        ));
    }

    #[test]
    fn test_validate_rejects_page_size_outside_options() {
        let mut config = PortalConfig::default();
        config.pagination.page_size = 7;

        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { field, .. }) if field == "pagination.page_size"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = PortalConfig::default();
        config.http.timeout_seconds = 0;

        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { field, .. }) if field == "http.timeout_seconds"
        ));
    }

    #[test]
    fn test_base_url_override() {
        let mut config = PortalConfig::default();

        config.apply_base_url_override(None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        config.apply_base_url_override(Some("   ".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        config.apply_base_url_override(Some("http://localhost:9000".to_string()));
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_load_from_file_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.yaml");
        fs::write(
            &path,
            "base_url: \"http://localhost:4000\"\npagination:\n  page_size: 50\n",
        )
        .unwrap();

        std::env::remove_var(ENV_API_URL);
        let config = PortalConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(config.pagination.page_size, 50);

        std::env::set_var(ENV_API_URL, "http://localhost:9999");
        let config = PortalConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:9999");
        std::env::remove_var(ENV_API_URL);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PortalConfig::load("/nonexistent/portal.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_client_config_conversion() {
        let mut config = PortalConfig::default();
        config.base_url = "http://localhost:4000".to_string();
        config.http.timeout_seconds = 5;
        config.http.retry_backoff.backoff_type = BackoffType::Constant;
        config.http.rate_limit.enabled = false;

        let client_config = config.client_config();
        assert_eq!(client_config.base_url, "http://localhost:4000");
        assert_eq!(client_config.timeout, Duration::from_secs(5));
        assert!(matches!(client_config.backoff_type, BackoffType::Constant));
        assert!(client_config.rate_limit.is_none());

        config.http.rate_limit.enabled = true;
        config.http.rate_limit.requests_per_second = 3;
        let client_config = config.client_config();
        assert_eq!(
            client_config.rate_limit.map(|r| r.requests_per_second),
            Some(3)
        );
    }
}
