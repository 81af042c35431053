//! Error types for the Polaris client.
//!
//! The taxonomy is closed: every failure surfaced by the client is one of the
//! [`ClientError`] variants. Remote errors keep their structured form
//! ([`JsonError`], [`GqlError`]) so callers can inspect extension codes
//! instead of matching on message text.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Plain JSON error envelope, returned by the session and authorization layer.
///
/// Wire shape: `{"code": 16, "message": "...", "trace_id": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JsonError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "traceId")]
    pub trace_id: String,
}

impl JsonError {
    /// Whether the envelope carries an error at all.
    pub fn is_error(&self) -> bool {
        self.code != 0 || !self.message.is_empty()
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trace_id.is_empty() {
            write!(f, "{} (code: {})", self.message, self.code)
        } else {
            write!(
                f,
                "{} (code: {}, traceId: {})",
                self.message, self.code, self.trace_id
            )
        }
    }
}

impl std::error::Error for JsonError {}

/// Location of a GraphQL error within the query text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GqlErrorLocation {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

/// One segment of the response path a GraphQL error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GqlPathSegment {
    Field(String),
    Index(i64),
    Other(serde_json::Value),
}

/// Trace information attached to a GraphQL error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlErrorTrace {
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub trace_id: String,
    #[serde(default)]
    pub span_id: String,
}

/// The `extensions` member of a GraphQL error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GqlErrorExtensions {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub trace: Option<GqlErrorTrace>,
}

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GqlErrorEntry {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: Vec<GqlPathSegment>,
    #[serde(default)]
    pub locations: Vec<GqlErrorLocation>,
    #[serde(default)]
    pub extensions: Option<GqlErrorExtensions>,
}

impl GqlErrorEntry {
    /// Extension code, or 0 when the entry has none.
    pub fn code(&self) -> i64 {
        self.extensions.as_ref().map_or(0, |ext| ext.code)
    }

    /// Trace ID, or an empty string when the entry has none.
    pub fn trace_id(&self) -> &str {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.trace.as_ref())
            .map_or("", |trace| trace.trace_id.as_str())
    }
}

/// GraphQL error envelope, returned by the GraphQL execution layer.
///
/// Displays the first entry; the full list stays available in `errors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GqlError {
    pub errors: Vec<GqlErrorEntry>,
}

impl GqlError {
    /// First error of the list.
    pub fn first(&self) -> Option<&GqlErrorEntry> {
        self.errors.first()
    }

    /// Whether any entry carries the given extension code.
    pub fn has_code(&self, code: i64) -> bool {
        self.errors.iter().any(|entry| entry.code() == code)
    }
}

impl fmt::Display for GqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.first() else {
            return write!(f, "empty GraphQL error list");
        };
        let trace_id = first.trace_id();
        if trace_id.is_empty() {
            write!(f, "{} (code: {})", first.message, first.code())
        } else {
            write!(
                f,
                "{} (code: {}, traceId: {})",
                first.message,
                first.code(),
                trace_id
            )
        }
    }
}

impl std::error::Error for GqlError {}

/// Errors that can occur during Polaris client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport level failure (connection, DNS, TLS, timeout).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Every attempt of a retried request timed out.
    #[error("Request timed out after {attempts} attempts")]
    Timeout { attempts: usize },

    /// The response had no body.
    #[error("No body in response (status code {status})")]
    NoBody { status: u16 },

    /// The response body was not JSON.
    #[error("Wrong content type {content_type:?} (status code {status}): {snippet}")]
    WrongContentType {
        content_type: String,
        status: u16,
        snippet: String,
    },

    /// Plain JSON error envelope.
    #[error(transparent)]
    Json(#[from] JsonError),

    /// GraphQL error envelope.
    #[error(transparent)]
    GraphQl(#[from] GqlError),

    /// Non-success HTTP status without a recognized error envelope.
    #[error("HTTP status {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response could not be interpreted.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The remote accepted the request but the credentials check failed locally.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// A fresh token could not be acquired; the request was not sent.
    #[error("Failed to acquire access token: {0}")]
    Token(#[source] Box<ClientError>),

    /// A lookup by ID or name found nothing.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be built, e.g. variables failed to serialize.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An inner error annotated with the operation that failed.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Wrap the error with a description of the failing operation.
    pub fn context(self, context: impl Into<String>) -> Self {
        ClientError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping context wrappers.
    pub fn root(&self) -> &ClientError {
        match self {
            ClientError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// The GraphQL error envelope carried by this error, if any.
    pub fn graphql_error(&self) -> Option<&GqlError> {
        match self.root() {
            ClientError::GraphQl(err) => Some(err),
            _ => None,
        }
    }

    /// The plain JSON error envelope carried by this error, if any.
    pub fn json_error(&self) -> Option<&JsonError> {
        match self.root() {
            ClientError::Json(err) => Some(err),
            _ => None,
        }
    }

    /// Check if this error means the looked-up resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), ClientError::NotFound(_))
    }

    /// Check if this error was caused by caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), ClientError::Cancelled)
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        match self.root() {
            ClientError::Timeout { .. } => true,
            ClientError::HttpError(e) => e.is_timeout(),
            ClientError::Token(inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// Check if this error indicates an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        match self.root() {
            ClientError::AuthFailed(_) | ClientError::Token(_) => true,
            ClientError::Status { status, .. } => *status == 401,
            ClientError::Json(err) => err.code == 16,
            _ => false,
        }
    }
}

/// Extension trait adding context to client results.
pub trait ResultExt<T> {
    /// Wrap the error with a lazily built context string.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
