//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and harvesting behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Retry and backoff settings
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.page_size == 0 {
            return Err(AppError::validation("crawler.page_size must be > 0"));
        }
        url::Url::parse(&self.crawler.search_url)
            .map_err(|e| AppError::validation(format!("crawler.search_url is invalid: {e}")))?;
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// HTTP client and harvesting behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Issue search endpoint URL
    #[serde(default = "defaults::search_url")]
    pub search_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Issues requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::search_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_size: defaults::page_size(),
        }
    }
}

/// Retry and backoff settings for the search transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum transport-level attempts per request
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Base backoff between transport attempts in milliseconds (doubles per attempt)
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_ms: u64,

    /// Wait applied to rate-limited responses without a Retry-After header, in milliseconds
    #[serde(default = "defaults::rate_limit_wait")]
    pub rate_limit_wait_ms: u64,

    /// Wait applied before retrying a server error, in milliseconds
    #[serde(default = "defaults::server_error_wait")]
    pub server_error_wait_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            backoff_base_ms: defaults::backoff_base(),
            rate_limit_wait_ms: defaults::rate_limit_wait(),
            server_error_wait_ms: defaults::server_error_wait(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn search_url() -> String {
        "https://issues.apache.org/jira/rest/api/2/search".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jira-harvester/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_size() -> u32 {
        50
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        5
    }
    pub fn backoff_base() -> u64 {
        1_000
    }
    pub fn rate_limit_wait() -> u64 {
        60_000
    }
    pub fn server_error_wait() -> u64 {
        5_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.crawler.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_search_url() {
        let mut config = Config::default();
        config.crawler.search_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("[crawler]\npage_size = 100\n").unwrap();
        assert_eq!(config.crawler.page_size, 100);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 5);
    }
}
