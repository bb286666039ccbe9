//! Configuration for the product lookup client
//!
//! Built from the `[api]` section of `labelcheck.toml` (environment
//! overrides already applied) or with the builder methods.

use crate::error::{ApiError, ApiResult};
use labelcheck_core::config::{ApiConfig, Environment};
use labelcheck_core::rate_limit::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default User-Agent; Open Food Facts asks every client to identify itself
pub const DEFAULT_USER_AGENT: &str = concat!(
    "labelcheck/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/labelcheck/labelcheck)"
);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root, e.g. `https://world.openfoodfacts.org`
    pub base_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Client-side rate limit
    pub rate_limit: RateLimitConfig,
    /// Deployment the base URL was derived from
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

impl ClientConfig {
    /// Defaults for a deployment
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            base_url: environment.base_url().to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: RateLimitConfig::per_minute(100),
            environment,
        }
    }

    /// Build from the `[api]` configuration section
    #[must_use]
    pub fn from_api_config(api: &ApiConfig) -> Self {
        Self {
            base_url: api.resolved_base_url(),
            user_agent: api
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(api.timeout_secs),
            rate_limit: RateLimitConfig::per_minute(api.requests_per_minute),
            environment: api.environment,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the User-Agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user_agent cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ApiError::config("requests_per_minute must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://world.openfoodfacts.org");
        assert!(config.user_agent.starts_with("labelcheck/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_staging_config() {
        let config = ClientConfig::for_environment(Environment::Staging);
        assert!(config.base_url.ends_with("openfoodfacts.net"));
    }

    #[test]
    fn test_from_api_config() {
        let api = ApiConfig {
            base_url: Some("http://127.0.0.1:9000".to_string()),
            timeout_secs: 3,
            user_agent: Some("test-agent/1.0".to_string()),
            requests_per_minute: 10,
            ..ApiConfig::default()
        };
        let config = ClientConfig::from_api_config(&api);

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.rate_limit.max_requests, 10);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("https://world.openfoodfacts.net")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "https://world.openfoodfacts.net");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default().with_base_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_user_agent(" ").validate().is_err());
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_rate_limit(RateLimitConfig::per_minute(0))
            .validate()
            .is_err());
    }
}
