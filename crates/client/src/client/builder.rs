//! Client builder for constructing [`PolarisClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Converting config crate accounts into token sources
//! - Normalizing the API URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification, user agent)
//!
//! # What this module does NOT handle:
//! - Actual GraphQL calls (handled by [`PolarisClient`] methods)
//! - Token caching (handled by [`AuthenticatingTransport`])
//!
//! # Invariants
//! - `api_url` and a token source (explicit or derived from an account) are
//!   required before calling `build()`
//! - The API URL is always normalized to have no trailing slashes
//! - Token sources derived from an account share the client's connection pool

use std::sync::Arc;
use std::time::Duration;

use polaris_config::{
    Account, Config,
    constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS},
};

use crate::auth::{LocalUserSource, ServiceAccountSource, TokenSource};
use crate::client::PolarisClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::transport::AuthenticatingTransport;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("polaris-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Builder for creating a new [`PolarisClient`].
///
/// # Example
///
/// ```rust,ignore
/// use polaris_client::{PolarisClient, ServiceAccountSource};
/// use std::sync::Arc;
///
/// let client = PolarisClient::builder()
///     .api_url("https://acme.my.rubrik.com/api".to_string())
///     .token_source(Arc::new(source))
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// ```
pub struct PolarisClientBuilder {
    api_url: Option<String>,
    token_source: Option<Arc<dyn TokenSource>>,
    account: Option<Account>,
    skip_verify: bool,
    timeout: Duration,
    metrics: Option<MetricsCollector>,
}

impl Default for PolarisClientBuilder {
    fn default() -> Self {
        Self {
            api_url: None,
            token_source: None,
            account: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            metrics: None,
        }
    }
}

impl PolarisClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API URL, e.g. `https://acme.my.rubrik.com/api`.
    ///
    /// Trailing slashes will be automatically removed.
    pub fn api_url(mut self, url: String) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Set the token source. Takes precedence over an account set by
    /// [`Self::from_config`].
    pub fn token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this against test deployments with self-signed certificates.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the timeout for GraphQL requests.
    ///
    /// Token requests use their own per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable metrics collection.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    ///
    /// The token source matching the configured account is created at
    /// `build()` time so it shares the client's HTTP settings.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.api_url = Some(config.account.api_url());
        self.account = Some(config.account.clone());
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self
    }

    fn normalize_api_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`PolarisClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `api_url` was not provided or is not a URL.
    /// Returns [`ClientError::AuthFailed`] if no token source or account was provided.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<PolarisClient> {
        let api_url = self
            .api_url
            .ok_or_else(|| ClientError::InvalidUrl("api_url is required".to_string()))?;
        let api_url = Self::normalize_api_url(api_url);
        url::Url::parse(&api_url).map_err(|e| ClientError::InvalidUrl(format!("{api_url}: {e}")))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if api_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        let source: Arc<dyn TokenSource> = match (self.token_source, &self.account) {
            (Some(source), _) => source,
            (None, Some(Account::LocalUser(account))) => {
                Arc::new(LocalUserSource::from_account(http.clone(), account))
            }
            (None, Some(Account::ServiceAccount(account))) => {
                Arc::new(ServiceAccountSource::from_account(http.clone(), account))
            }
            (None, None) => {
                return Err(ClientError::AuthFailed(
                    "a token source or account is required".to_string(),
                ));
            }
        };

        let mut transport = AuthenticatingTransport::new(http.clone(), source);
        if let Some(metrics) = &self.metrics {
            transport = transport.with_metrics(metrics.clone());
        }

        Ok(PolarisClient {
            graphql_url: format!("{api_url}/graphql"),
            http,
            api_url,
            transport,
            metrics: self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingTokenSource;
    use polaris_config::{ConnectionConfig, ServiceAccount, UserAccount};
    use secrecy::SecretString;

    fn service_account_config() -> Config {
        Config {
            account: Account::ServiceAccount(ServiceAccount {
                name: "automation".to_string(),
                client_id: "client|abc".to_string(),
                client_secret: SecretString::new("s3cr3t".to_string().into()),
                access_token_uri: "https://acme.my.rubrik.com/api/client_token".to_string(),
            }),
            connection: ConnectionConfig {
                timeout: Duration::from_secs(90),
                skip_verify: true,
            },
        }
    }

    #[test]
    fn test_from_config_with_service_account() {
        let client = PolarisClient::builder()
            .from_config(&service_account_config())
            .build()
            .unwrap();
        assert_eq!(client.api_url(), "https://acme.my.rubrik.com/api");
        assert!(format!("{:?}", client.token_source()).contains("ServiceAccountSource"));
    }

    #[test]
    fn test_from_config_with_user_account() {
        let config = Config {
            account: Account::LocalUser(UserAccount {
                name: "acme".to_string(),
                username: "admin@acme.com".to_string(),
                password: SecretString::new("pw".to_string().into()),
                url: None,
            }),
            connection: ConnectionConfig::default(),
        };
        let client = PolarisClient::builder().from_config(&config).build().unwrap();
        assert_eq!(client.graphql_url(), "https://acme.my.rubrik.com/api/graphql");
        assert!(format!("{:?}", client.token_source()).contains("LocalUserSource"));
    }

    #[test]
    fn test_explicit_token_source_wins() {
        let client = PolarisClient::builder()
            .from_config(&service_account_config())
            .token_source(Arc::new(CountingTokenSource::valid_for(3600)))
            .build()
            .unwrap();
        assert!(format!("{:?}", client.token_source()).contains("CountingTokenSource"));
    }

    #[test]
    fn test_missing_api_url() {
        let err = PolarisClient::builder()
            .token_source(Arc::new(CountingTokenSource::valid_for(3600)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_invalid_api_url() {
        let err = PolarisClient::builder()
            .api_url("not a url".to_string())
            .token_source(Arc::new(CountingTokenSource::valid_for(3600)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_missing_token_source() {
        let err = PolarisClient::builder()
            .api_url("https://acme.my.rubrik.com/api".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::AuthFailed(_)));
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(
            PolarisClientBuilder::normalize_api_url("https://acme.my.rubrik.com/api//".to_string()),
            "https://acme.my.rubrik.com/api"
        );
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("polaris-sdk-rust/"));
    }
}
