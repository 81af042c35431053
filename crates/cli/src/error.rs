//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ClientError` and `ConfigError` values to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see main.rs for the Ctrl+C listener).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).
//! - Context wrappers never change the exit code of the error they wrap.

use polaris_client::ClientError;
use polaris_config::ConfigError;

/// Structured exit codes for polaris.
///
/// These codes enable scripts to distinguish between different failure modes
/// and take appropriate action (retry, refresh credentials, fail fast, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - invalid credentials or rejected token.
    ///
    /// Scripts should refresh credentials or fix the account configuration.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, or DNS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Resource not found - feature, task chain, etc.
    NotFound = 4,

    /// Validation error - bad query, bad variables, or unexpected response shape.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Permission denied - insufficient privileges.
    PermissionDenied = 6,

    /// Service unavailable - HTTP 502, 503 or 504, maintenance pages.
    ///
    /// Scripts should back off and retry later.
    ServiceUnavailable = 8,

    /// Configuration error - missing or invalid account configuration.
    ConfigurationError = 9,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

fn from_status(status: u16) -> ExitCode {
    match status {
        400 => ExitCode::ValidationError,
        401 => ExitCode::AuthenticationFailed,
        403 => ExitCode::PermissionDenied,
        404 => ExitCode::NotFound,
        502..=504 => ExitCode::ServiceUnavailable,
        _ => ExitCode::GeneralError,
    }
}

impl From<&ClientError> for ExitCode {
    /// Map ClientError variants to structured exit codes.
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Context { source, .. } => Self::from(source.as_ref()),

            ClientError::Cancelled => ExitCode::Interrupted,

            // Connection errors (exit code 3)
            ClientError::Timeout { .. } => ExitCode::ConnectionError,
            ClientError::InvalidUrl(_) => ExitCode::ConnectionError,
            ClientError::HttpError(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }

            ClientError::NotFound(_) => ExitCode::NotFound,

            ClientError::InvalidRequest(_) => ExitCode::ValidationError,
            ClientError::InvalidResponse(_) => ExitCode::ValidationError,

            ClientError::Status { status, .. } => from_status(*status),
            ClientError::NoBody { status } => from_status(*status),
            ClientError::WrongContentType { status, .. } => from_status(*status),
            ClientError::GraphQl(err) => err
                .first()
                .and_then(|entry| u16::try_from(entry.code()).ok())
                .map(from_status)
                .unwrap_or(ExitCode::GeneralError),

            ClientError::Json(_) if err.is_auth_error() => ExitCode::AuthenticationFailed,
            ClientError::Json(_) => ExitCode::GeneralError,

            // Token endpoint unreachable is a connection problem, anything else
            // means the credentials were not accepted.
            ClientError::AuthFailed(_) => ExitCode::AuthenticationFailed,
            ClientError::Token(inner) => match Self::from(inner.as_ref()) {
                code @ (ExitCode::ConnectionError | ExitCode::ServiceUnavailable) => code,
                _ => ExitCode::AuthenticationFailed,
            },
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::MissingAuth => ExitCode::AuthenticationFailed,
            _ => ExitCode::ConfigurationError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if the chain holds no known error type.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(config_err);
            }
        }
        ExitCode::GeneralError
    }
}
