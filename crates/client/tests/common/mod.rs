//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the Polaris client. All integration tests should use
//! these utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Mock servers serve the API under `/api`, so GraphQL lives at `/api/graphql`
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)
//! - Test-specific assertions or test logic

use std::sync::Arc;

#[allow(unused_imports)]
pub use polaris_client::testing::{CountingTokenSource, load_fixture, unsigned_jwt};

#[allow(unused_imports)]
pub use polaris_client::{CancellationToken, ClientError, PolarisClient};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the GraphQL endpoint on the mock server.
#[allow(dead_code)]
pub const GRAPHQL_PATH: &str = "/api/graphql";

/// API URL of a mock server.
#[allow(dead_code)]
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Client against `server` whose token source always returns a valid token.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> PolarisClient {
    client_with_source(server, Arc::new(CountingTokenSource::valid_for(3600)))
}

/// Client against `server` using the given token source.
#[allow(dead_code)]
pub fn client_with_source(
    server: &MockServer,
    source: Arc<dyn polaris_client::TokenSource>,
) -> PolarisClient {
    PolarisClient::builder()
        .api_url(api_url(server))
        .token_source(source)
        .build()
        .expect("client should build")
}

/// JSON response template with the given status and body.
#[allow(dead_code)]
pub fn json_response(status: u16, body: &serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
