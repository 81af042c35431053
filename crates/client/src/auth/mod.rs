//! Token acquisition.
//!
//! Responsibilities:
//! - Model a bearer [`Token`] and its expiry.
//! - Define the [`TokenSource`] capability and its two implementations:
//!   [`LocalUserSource`] (username/password) and [`ServiceAccountSource`]
//!   (client credentials, plus appliance token exchange).
//!
//! Does NOT handle:
//! - Caching tokens or attaching them to requests (see `transport`).
//!
//! Invariants:
//! - Token requests time out per attempt and are retried only on timeout.
//! - Secrets are held in `SecretString` and never logged.

mod http;
mod local_user;
mod service_account;
mod token;

pub use local_user::LocalUserSource;
pub use service_account::ServiceAccountSource;
pub use token::{Claims, Token, decode_claims};

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;

/// Produces fresh tokens from long-lived credentials.
#[async_trait]
pub trait TokenSource: Send + Sync + Debug {
    /// Acquire a new token.
    async fn token(&self) -> Result<Token>;
}

#[async_trait]
impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    async fn token(&self) -> Result<Token> {
        (**self).token().await
    }
}
