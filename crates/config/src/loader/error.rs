//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Errors never include secret values or raw file contents.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error(
        "Account configuration is required (set RUBRIK_POLARIS_SERVICEACCOUNT_FILE or RUBRIK_POLARIS_ACCOUNT_NAME)"
    )]
    MissingAuth,

    #[error("Missing required account field: {0}")]
    MissingField(&'static str),

    #[error("Unable to determine home directory")]
    HomeDirUnavailable,

    #[error("Failed to read account file at {path}: {kind}")]
    AccountFileRead { path: PathBuf, kind: ErrorKind },

    #[error("Failed to parse account file at {path}: {message}")]
    AccountFileParse { path: PathBuf, message: String },

    #[error("Account '{0}' not found in accounts file")]
    AccountNotFound(String),

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
