//! Metrics collection for Polaris GraphQL calls.
//!
//! This module records:
//! - Request latency histograms, labeled by GraphQL operation name
//! - Request and error counters
//! - Token refreshes performed by the authenticating transport
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (the CLI installs `metrics-exporter-prometheus`)
//! - Persistent storage of metrics
//!
//! # Invariants
//! - All metrics use consistent label names: `operation`, `status`, `error_category`
//! - Metric recording is infallible
//! - Zero-cost when no metrics recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for GraphQL request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "polaris_graphql_request_duration_seconds";

/// Metric name for total GraphQL request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "polaris_graphql_requests_total";

/// Metric name for GraphQL error counter.
pub const METRIC_ERRORS_TOTAL: &str = "polaris_graphql_errors_total";

/// Metric name for token refresh counter.
pub const METRIC_TOKEN_REFRESHES_TOTAL: &str = "polaris_token_refreshes_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level errors (connection refused, DNS, TLS)
    Transport,
    /// Request or token timeout
    Timeout,
    /// Token acquisition or credential failures
    Auth,
    /// GraphQL error list in the response body
    GraphQl,
    /// Plain JSON error in the response body
    Api,
    /// Non-success HTTP status without an error body
    Http,
    /// Missing, mistyped or malformed response body
    Response,
    /// Caller cancellation
    Cancelled,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Auth => "auth",
            ErrorCategory::GraphQl => "graphql",
            ErrorCategory::Api => "api",
            ErrorCategory::Http => "http",
            ErrorCategory::Response => "response",
            ErrorCategory::Cancelled => "cancelled",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::HttpError(e) if e.is_timeout() => ErrorCategory::Timeout,
            ClientError::HttpError(_) => ErrorCategory::Transport,
            ClientError::Timeout { .. } => ErrorCategory::Timeout,
            ClientError::Token(_) | ClientError::AuthFailed(_) => ErrorCategory::Auth,
            ClientError::GraphQl(_) => ErrorCategory::GraphQl,
            ClientError::Json(_) => ErrorCategory::Api,
            ClientError::Status { .. } => ErrorCategory::Http,
            ClientError::NoBody { .. }
            | ClientError::WrongContentType { .. }
            | ClientError::InvalidResponse(_) => ErrorCategory::Response,
            ClientError::Cancelled => ErrorCategory::Cancelled,
            ClientError::Context { source, .. } => ErrorCategory::from(source.as_ref()),
            ClientError::NotFound(_)
            | ClientError::InvalidUrl(_)
            | ClientError::InvalidRequest(_) => ErrorCategory::Unknown,
        }
    }
}

/// Metrics collector for Polaris GraphQL calls.
///
/// Thin wrapper around the `metrics` crate macros so every call site uses the
/// same metric names and labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled metrics collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if metrics collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of a GraphQL request.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn record_request_duration(
        &self,
        operation: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "operation" => operation.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a GraphQL request attempt.
    pub fn record_request(&self, operation: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "operation" => operation.to_string(),
        )
        .increment(1);
    }

    /// Record an error.
    pub fn record_error(&self, operation: &str, category: ErrorCategory) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "operation" => operation.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record an error from a ClientError, categorizing it automatically.
    pub fn record_client_error(&self, operation: &str, error: &ClientError) {
        self.record_error(operation, ErrorCategory::from(error));
    }

    /// Record a token refresh.
    pub fn record_token_refresh(&self, success: bool) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_TOKEN_REFRESHES_TOTAL,
            "outcome" => if success { "success" } else { "failure" },
        )
        .increment(1);
    }
}
