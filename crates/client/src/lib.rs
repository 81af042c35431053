//! Polaris GraphQL client.
//!
//! This crate provides a typed client for the Rubrik Polaris GraphQL API. It
//! authenticates with local user or service account credentials, keeps a
//! bearer token fresh under concurrent use, classifies the error envelopes
//! Polaris returns, and polls long-running task chains.

pub mod auth;
pub mod cancellation;
pub mod client;
pub mod error;
pub mod graphql;
pub mod metrics;
pub mod models;
mod response;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{LocalUserSource, ServiceAccountSource, Token, TokenSource};
pub use cancellation::CancellationToken;
pub use client::PolarisClient;
pub use client::builder::PolarisClientBuilder;
pub use error::{ClientError, GqlError, GqlErrorEntry, JsonError, Result, ResultExt};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{Feature, PermissionGroup, TaskChain, TaskChainState, Version};
pub use transport::{AuthenticatingTransport, Transport};
