//! Authenticating HTTP transport.
//!
//! Responsibilities:
//! - Keep one cached [`Token`] per client and refresh it when expired.
//! - Attach the token to every outgoing request before forwarding it.
//!
//! Does NOT handle:
//! - Response classification (see `response`).
//! - Retrying requests.
//!
//! Invariants:
//! - The token lock is held only while checking, refreshing and attaching the
//!   token, never across the forwarded round trip.
//! - Concurrent callers that find the cache expired trigger exactly one
//!   refresh; callers queued behind it reuse the fresh token.
//! - When no token can be acquired the request is dropped unsent.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::{Token, TokenSource};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Sends a prepared request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn round_trip(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        Ok(self.execute(request).await?)
    }
}

/// Transport decorator injecting a bearer token into each request.
pub struct AuthenticatingTransport<T = reqwest::Client> {
    inner: T,
    source: Arc<dyn TokenSource>,
    token: Mutex<Option<Token>>,
    metrics: MetricsCollector,
}

impl<T> fmt::Debug for AuthenticatingTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatingTransport")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> AuthenticatingTransport<T> {
    /// Wrap `inner`, acquiring tokens from `source`.
    pub fn new(inner: T, source: Arc<dyn TokenSource>) -> Self {
        Self {
            inner,
            source,
            token: Mutex::new(None),
            metrics: MetricsCollector::disabled(),
        }
    }

    /// Record token refreshes with the given collector.
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    /// The token source used for refreshes.
    pub fn token_source(&self) -> &Arc<dyn TokenSource> {
        &self.source
    }

    /// Attach a valid token to `request`, refreshing the cache if needed.
    async fn authorize(&self, request: &mut reqwest::Request) -> Result<()> {
        let mut cached = self.token.lock().await;

        let token = match cached.take() {
            Some(token) if !token.is_expired() => token,
            _ => {
                debug!("Cached token missing or expired, refreshing");
                match self.source.token().await {
                    Ok(token) => {
                        self.metrics.record_token_refresh(true);
                        token
                    }
                    Err(e) => {
                        self.metrics.record_token_refresh(false);
                        return Err(ClientError::Token(Box::new(e)));
                    }
                }
            }
        };

        token.apply(request)?;
        *cached = Some(token);
        Ok(())
    }

    /// Forget the cached token so the next request acquires a new one.
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthenticatingTransport<T> {
    async fn round_trip(&self, mut request: reqwest::Request) -> Result<reqwest::Response> {
        self.authorize(&mut request).await?;
        self.inner.round_trip(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingTokenSource;
    use std::time::Duration;
    use wiremock::matchers::{header_exists, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        server
    }

    fn request(server: &MockServer) -> reqwest::Request {
        reqwest::Request::new(
            reqwest::Method::POST,
            format!("{}/graphql", server.uri()).parse().unwrap(),
        )
    }

    async fn authorization_headers(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.headers.get("authorization"))
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_token_cached_between_requests() {
        let server = server().await;
        let source = Arc::new(CountingTokenSource::valid_for(3600));
        let transport = AuthenticatingTransport::new(reqwest::Client::new(), source.clone());

        transport.round_trip(request(&server)).await.unwrap();
        transport.round_trip(request(&server)).await.unwrap();

        assert_eq!(source.calls(), 1);
        let seen = authorization_headers(&server).await;
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("Bearer "));
        assert_eq!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn test_expired_token_refreshed_each_time() {
        let server = server().await;
        let source = Arc::new(CountingTokenSource::valid_for(30));
        let transport = AuthenticatingTransport::new(reqwest::Client::new(), source.clone());

        transport.round_trip(request(&server)).await.unwrap();
        transport.round_trip(request(&server)).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_does_not_send() {
        let server = server().await;
        let source = Arc::new(CountingTokenSource::new(|| {
            Err(ClientError::AuthFailed("bad credentials".to_string()))
        }));
        let transport = AuthenticatingTransport::new(reqwest::Client::new(), source.clone());

        let err = transport.round_trip(request(&server)).await.unwrap_err();
        assert!(matches!(err, ClientError::Token(_)));
        assert!(err.is_auth_error());
        assert!(
            server
                .received_requests()
                .await
                .unwrap_or_default()
                .is_empty()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_refresh_once() {
        let server = server().await;
        let source = Arc::new(
            CountingTokenSource::valid_for(3600).with_latency(Duration::from_millis(50)),
        );
        let transport = Arc::new(AuthenticatingTransport::new(
            reqwest::Client::new(),
            source.clone(),
        ));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let transport = transport.clone();
                let request = request(&server);
                tokio::spawn(async move { transport.round_trip(request).await.map(|_| ()) })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(source.calls(), 1);
        assert_eq!(authorization_headers(&server).await.len(), 16);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let server = server().await;
        let source = Arc::new(CountingTokenSource::valid_for(3600));
        let transport = AuthenticatingTransport::new(reqwest::Client::new(), source.clone());

        transport.round_trip(request(&server)).await.unwrap();
        transport.invalidate().await;
        transport.round_trip(request(&server)).await.unwrap();

        assert_eq!(source.calls(), 2);
    }
}
