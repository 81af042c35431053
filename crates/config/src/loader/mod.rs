//! Configuration loader for environment variables and account files.
//!
//! Responsibilities:
//! - Load account credentials from `.env` files, environment variables and JSON account files.
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Token acquisition or any network access (see the client crate).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over account file values.
//! - Builder methods take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;
mod files;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;

#[cfg(test)]
mod tests;
