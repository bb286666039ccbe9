//! HTTP client for the Open Food Facts API

use crate::config::ClientConfig;
use crate::endpoints::ProductsApi;
use crate::error::{ApiError, ApiResult};
use labelcheck_core::rate_limit::RateLimiter;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Open Food Facts client
///
/// Wraps `reqwest` and adds:
/// - a client-side rate limit per host
/// - request correlation IDs for tracing
///
/// Each call issues exactly one request; nothing is retried or cached.
#[derive(Clone)]
pub struct OpenFoodFactsClient {
    inner: Client,
    config: Arc<ClientConfig>,
    base_url: Url,
    rate_limiter: Arc<RateLimiter>,
}

impl OpenFoodFactsClient {
    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| ApiError::config("user_agent contains invalid characters"))?,
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            base_url,
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Access product endpoints
    #[must_use]
    pub fn products(&self) -> ProductsApi {
        ProductsApi::new(self.clone())
    }

    /// Build an absolute URL for a path relative to the service root
    pub fn url(&self, path: &str) -> ApiResult<Url> {
        let root = format!("{}/", self.config.base_url.trim_end_matches('/'));
        Url::parse(&root)
            .and_then(|u| u.join(path.trim_start_matches('/')))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Perform a single GET and return status and body without interpreting them
    #[instrument(skip(self), fields(request_id))]
    pub async fn get_raw(&self, path: &str) -> ApiResult<RawResponse> {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let rate_limit_key = self.base_url.host_str().unwrap_or("default");
        if let Err(retry_after) = self.rate_limiter.try_acquire(rate_limit_key) {
            warn!(
                request_id = %request_id,
                url = %url,
                retry_after_ms = retry_after.as_millis(),
                "Rate limited"
            );
            return Err(ApiError::RateLimited { retry_after });
        }

        let start = Instant::now();
        let response = self
            .inner
            .get(url.clone())
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            request_id = %request_id,
            url = %url,
            status = status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Request completed"
        );

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenFoodFactsClient::with_config(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let config = ClientConfig::default().with_user_agent("bad\nagent");
        assert!(OpenFoodFactsClient::with_config(config).is_err());
    }

    #[test]
    fn test_url_join() {
        let client = OpenFoodFactsClient::with_config(
            ClientConfig::default().with_base_url("http://localhost:8080/"),
        )
        .unwrap();

        assert_eq!(
            client.url("/api/v2/product/123?fields=code").unwrap().as_str(),
            "http://localhost:8080/api/v2/product/123?fields=code"
        );
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let client = OpenFoodFactsClient::with_config(
            ClientConfig::default().with_base_url("http://localhost:8080/mirror"),
        )
        .unwrap();

        assert_eq!(
            client.url("api/v2/product/1").unwrap().as_str(),
            "http://localhost:8080/mirror/api/v2/product/1"
        );
    }

    #[test]
    fn test_malformed_barcode_needs_no_network() {
        // Port 9 (discard) would refuse; validation must short-circuit first
        let client = OpenFoodFactsClient::with_config(
            ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();

        let result = tokio_test::block_on(client.products().fetch_by_barcode("12 34"));
        assert_eq!(result, Err(labelcheck_core::LookupError::NotFound));
    }

    #[test]
    fn test_raw_response_success() {
        let ok = RawResponse { status: 200, body: String::new() };
        let err = RawResponse { status: 500, body: String::new() };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }
}
