//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse the `RUBRIK_POLARIS_*` and `POLARIS_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Loading account files (see files.rs).
//! - `.env` file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric or boolean values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

pub const ENV_SERVICE_ACCOUNT_FILE: &str = "RUBRIK_POLARIS_SERVICEACCOUNT_FILE";
pub const ENV_SERVICE_ACCOUNT_NAME: &str = "RUBRIK_POLARIS_SERVICEACCOUNT_NAME";
pub const ENV_SERVICE_ACCOUNT_CLIENT_ID: &str = "RUBRIK_POLARIS_SERVICEACCOUNT_CLIENTID";
pub const ENV_SERVICE_ACCOUNT_CLIENT_SECRET: &str = "RUBRIK_POLARIS_SERVICEACCOUNT_CLIENTSECRET";
pub const ENV_SERVICE_ACCOUNT_ACCESS_TOKEN_URI: &str =
    "RUBRIK_POLARIS_SERVICEACCOUNT_ACCESSTOKENURI";

pub const ENV_ACCOUNT_FILE: &str = "RUBRIK_POLARIS_ACCOUNT_FILE";
pub const ENV_ACCOUNT_NAME: &str = "RUBRIK_POLARIS_ACCOUNT_NAME";
pub const ENV_ACCOUNT_USERNAME: &str = "RUBRIK_POLARIS_ACCOUNT_USERNAME";
pub const ENV_ACCOUNT_PASSWORD: &str = "RUBRIK_POLARIS_ACCOUNT_PASSWORD";
pub const ENV_ACCOUNT_URL: &str = "RUBRIK_POLARIS_ACCOUNT_URL";

pub const ENV_TIMEOUT: &str = "POLARIS_TIMEOUT";
pub const ENV_SKIP_VERIFY: &str = "POLARIS_SKIP_VERIFY";

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn secret_var(key: &str) -> Option<SecretString> {
    env_var_or_none(key).map(|s| SecretString::new(s.into()))
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(path) = env_var_or_none(ENV_SERVICE_ACCOUNT_FILE) {
        loader.set_service_account_file(Some(PathBuf::from(path)));
    }
    if let Some(name) = env_var_or_none(ENV_SERVICE_ACCOUNT_NAME) {
        loader.set_service_account_name(Some(name));
    }
    if let Some(client_id) = env_var_or_none(ENV_SERVICE_ACCOUNT_CLIENT_ID) {
        loader.set_client_id(Some(client_id));
    }
    if let Some(secret) = secret_var(ENV_SERVICE_ACCOUNT_CLIENT_SECRET) {
        loader.set_client_secret(Some(secret));
    }
    if let Some(uri) = env_var_or_none(ENV_SERVICE_ACCOUNT_ACCESS_TOKEN_URI) {
        loader.set_access_token_uri(Some(uri));
    }

    if let Some(path) = env_var_or_none(ENV_ACCOUNT_FILE) {
        loader.set_accounts_file(Some(PathBuf::from(path)));
    }
    if let Some(name) = env_var_or_none(ENV_ACCOUNT_NAME) {
        loader.set_account_name(Some(name));
    }
    if let Some(username) = env_var_or_none(ENV_ACCOUNT_USERNAME) {
        loader.set_username(Some(username));
    }
    if let Some(password) = secret_var(ENV_ACCOUNT_PASSWORD) {
        loader.set_password(Some(password));
    }
    if let Some(url) = env_var_or_none(ENV_ACCOUNT_URL) {
        loader.set_account_url(Some(url));
    }

    if let Some(timeout) = env_var_or_none(ENV_TIMEOUT) {
        let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_TIMEOUT.to_string(),
            message: "must be a number".to_string(),
        })?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(skip) = env_var_or_none(ENV_SKIP_VERIFY) {
        loader.set_skip_verify(Some(skip.parse().map_err(|_| {
            ConfigError::InvalidValue {
                var: ENV_SKIP_VERIFY.to_string(),
                message: "must be true or false".to_string(),
            }
        })?));
    }

    Ok(())
}
