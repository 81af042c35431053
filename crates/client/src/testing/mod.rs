//! Testing utilities for Polaris client tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use polaris_client::testing::{load_fixture, unsigned_jwt};
//!
//! let status = load_fixture("task_chain/succeeded.json");
//! let token = unsigned_jwt(chrono::Utc::now().timestamp() + 3600);
//! ```

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::auth::{Token, TokenSource};
use crate::error::Result;

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// Build an unsigned JWT whose `exp` claim is `exp` (seconds since the epoch).
pub fn unsigned_jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = serde_json::json!({
        "exp": exp,
        "iat": exp - 3600,
        "sub": "test-user",
        "iss": "polaris-test",
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.unsigned")
}

/// Token source that counts acquisitions and optionally delays each one.
pub struct CountingTokenSource {
    make: Box<dyn Fn() -> Result<Token> + Send + Sync>,
    latency: Duration,
    calls: AtomicUsize,
}

impl CountingTokenSource {
    /// Create a source producing tokens with `make`.
    pub fn new<F>(make: F) -> Self
    where
        F: Fn() -> Result<Token> + Send + Sync + 'static,
    {
        Self {
            make: Box::new(make),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Source that always returns a token valid for `secs` seconds from the
    /// time of acquisition.
    pub fn valid_for(secs: i64) -> Self {
        Self::new(move || {
            Ok(Token::from_jwt(unsigned_jwt(
                chrono::Utc::now().timestamp() + secs,
            )))
        })
    }

    /// Delay every acquisition by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of acquisitions started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CountingTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingTokenSource")
            .field("latency", &self.latency)
            .field("calls", &self.calls())
            .finish()
    }
}

#[async_trait]
impl TokenSource for CountingTokenSource {
    async fn token(&self) -> Result<Token> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.make)()
    }
}
