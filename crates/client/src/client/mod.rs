//! Polaris GraphQL client.
//!
//! This module provides [`PolarisClient`], which sends GraphQL requests through
//! an [`AuthenticatingTransport`] and classifies the responses.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `deployment`: Deployment version query
//! - `features`: Enabled feature queries
//! - `pagination`: Relay connection pagination
//! - `task_chain`: Task chain status and polling
//!
//! # What this module does NOT handle:
//! - Token acquisition (delegated to [`crate::auth`])
//! - Response classification rules (delegated to `crate::response`)
//!
//! # Invariants
//! - Every GraphQL request is a POST of a JSON envelope to `<api_url>/graphql`
//!   with `Content-Type` and `Accept` set to `application/json`.
//! - GraphQL requests are never retried automatically.
//! - Errors are wrapped with the operation name while keeping the structured
//!   error reachable through [`ClientError::graphql_error`].

pub mod builder;
mod deployment;
mod features;
mod pagination;
mod task_chain;

pub use task_chain::TASK_CHAIN_STATUS_QUERY;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::auth::TokenSource;
use crate::error::{ClientError, Result};
use crate::graphql::{DataEnvelope, RequestEnvelope};
use crate::metrics::MetricsCollector;
use crate::response::{RawResponse, classify_graphql};
use crate::transport::{AuthenticatingTransport, Transport};

/// Label used for requests without an operation name.
const ANONYMOUS_OPERATION: &str = "anonymous";

/// Polaris GraphQL client.
///
/// One client owns one HTTP connection pool and one token cache; it is safe to
/// share between tasks behind an `Arc`.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use polaris_client::PolarisClient;
/// use polaris_config::ConfigLoader;
///
/// let config = ConfigLoader::new().load_dotenv()?.from_env()?.build()?;
/// let client = PolarisClient::builder().from_config(&config).build()?;
/// let version = client.deployment_version().await?;
/// ```
#[derive(Debug)]
pub struct PolarisClient {
    pub(crate) http: reqwest::Client,
    pub(crate) api_url: String,
    pub(crate) graphql_url: String,
    pub(crate) transport: AuthenticatingTransport,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl PolarisClient {
    /// Create a new client builder.
    pub fn builder() -> builder::PolarisClientBuilder {
        builder::PolarisClientBuilder::new()
    }

    /// API URL, without trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// URL of the GraphQL endpoint.
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// The token source backing this client.
    pub fn token_source(&self) -> &Arc<dyn TokenSource> {
        self.transport.token_source()
    }

    /// Send a GraphQL request and return the raw response body.
    ///
    /// The body is returned unmodified when the response carries neither a
    /// plain JSON error nor a GraphQL error list and the status is 200.
    pub async fn request<V>(&self, query: &str, variables: &V) -> Result<Vec<u8>>
    where
        V: Serialize + ?Sized,
    {
        let variables = serde_json::to_value(variables)
            .map_err(|e| ClientError::InvalidRequest(format!("failed to encode variables: {e}")))?;
        let envelope = RequestEnvelope::new(query, variables);
        let operation = if envelope.operation_name.is_empty() {
            ANONYMOUS_OPERATION.to_string()
        } else {
            envelope.operation_name.clone()
        };

        debug!(operation = %operation, url = %self.graphql_url, "Sending GraphQL request");

        let request = self
            .http
            .post(&self.graphql_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&envelope)
            .build()?;

        let start = Instant::now();
        let (status, result) = match self.transport.round_trip(request).await {
            Ok(response) => {
                let status = response.status().as_u16();
                let result = match RawResponse::read(response).await {
                    Ok(raw) => classify_graphql(raw),
                    Err(e) => Err(e),
                };
                (Some(status), result)
            }
            Err(e) => (None, Err(e)),
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_request(&operation);
            metrics.record_request_duration(&operation, start.elapsed(), status);
            if let Err(e) = &result {
                metrics.record_client_error(&operation, e);
            }
        }

        match result {
            Ok(body) => {
                debug!(operation = %operation, bytes = body.len(), "GraphQL request succeeded");
                Ok(body)
            }
            Err(e) => {
                debug!(operation = %operation, error = %e, "GraphQL request failed");
                Err(e.context(format!("graphql request {operation} failed")))
            }
        }
    }

    /// Send a GraphQL request and decode the `data` member of the response.
    pub async fn query<T, V>(&self, query: &str, variables: &V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize + ?Sized,
    {
        let body = self.request(query, variables).await?;
        let envelope: DataEnvelope<T> = serde_json::from_slice(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("failed to decode response data: {e}"))
        })?;
        Ok(envelope.data)
    }
}
