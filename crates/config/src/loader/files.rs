//! Account file parsing.
//!
//! Responsibilities:
//! - Parse service account JSON files (as downloaded from the Polaris UI).
//! - Parse local user accounts files mapping account names to credentials.
//! - Resolve the default accounts file location under the home directory.
//!
//! Does NOT handle:
//! - Environment variable overrides (see env.rs).
//! - Deciding which account kind to build (see builder.rs).

use secrecy::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use crate::constants::DEFAULT_ACCOUNTS_FILE;
use crate::types::secret_string;

/// Service account file contents. Every field is optional so that
/// environment variables can fill in whatever the file lacks.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServiceAccountFile {
    pub name: Option<String>,
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "optional_secret")]
    pub client_secret: Option<SecretString>,
    pub access_token_uri: Option<String>,
}

/// One entry of the local user accounts file.
#[derive(Debug, Deserialize)]
pub(crate) struct UserAccountEntry {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "optional_secret")]
    pub password: Option<SecretString>,
    pub url: Option<String>,
}

fn optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    secret_string::deserialize(deserializer).map(Some)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    tracing::debug!(path = %path.display(), "Reading account file");
    std::fs::read_to_string(path).map_err(|e| ConfigError::AccountFileRead {
        path: path.to_path_buf(),
        kind: e.kind(),
    })
}

fn parse_error(path: &Path, err: serde_json::Error) -> ConfigError {
    ConfigError::AccountFileParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Read a service account file.
pub(crate) fn read_service_account_file(path: &Path) -> Result<ServiceAccountFile, ConfigError> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|e| parse_error(path, e))
}

/// Read the entry for `name` from a local user accounts file.
pub(crate) fn read_user_account_entry(
    path: &Path,
    name: &str,
) -> Result<UserAccountEntry, ConfigError> {
    let contents = read_file(path)?;
    let mut accounts: BTreeMap<String, UserAccountEntry> =
        serde_json::from_str(&contents).map_err(|e| parse_error(path, e))?;
    accounts
        .remove(name)
        .ok_or_else(|| ConfigError::AccountNotFound(name.to_string()))
}

/// Default location of the local user accounts file.
pub(crate) fn default_accounts_path() -> Result<PathBuf, ConfigError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_ACCOUNTS_FILE))
        .ok_or(ConfigError::HomeDirUnavailable)
}
