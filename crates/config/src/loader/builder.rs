//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Decide between service account and local user account configuration.
//! - Build the final `Config` from loaded values.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Account file parsing (delegated to files.rs).
//!
//! Invariants / Assumptions:
//! - Later calls override earlier ones: `from_env()` followed by `with_*` lets
//!   explicit values win over the environment.
//! - Account files only fill in fields that are still unset at `build()` time.
//! - Any service account setting selects the service account flow; local user
//!   settings are only consulted when no service account setting is present.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use super::files::{default_accounts_path, read_service_account_file, read_user_account_entry};
use crate::constants::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::types::{Account, Config, ConnectionConfig, ServiceAccount, UserAccount};

/// Configuration loader that builds config from environment variables and account files.
#[derive(Default)]
pub struct ConfigLoader {
    service_account_file: Option<PathBuf>,
    service_account_name: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    access_token_uri: Option<String>,
    accounts_file: Option<PathBuf>,
    account_name: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    account_url: Option<String>,
    timeout: Option<Duration>,
    skip_verify: Option<bool>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Use the service account file at `path`.
    pub fn with_service_account_file(mut self, path: PathBuf) -> Self {
        self.service_account_file = Some(path);
        self
    }

    /// Set the service account client ID.
    pub fn with_client_id(mut self, client_id: String) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Set the service account client secret.
    pub fn with_client_secret(mut self, secret: String) -> Self {
        self.client_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Set the service account access token URI.
    pub fn with_access_token_uri(mut self, uri: String) -> Self {
        self.access_token_uri = Some(uri);
        self
    }

    /// Use the local user accounts file at `path`.
    pub fn with_accounts_file(mut self, path: PathBuf) -> Self {
        self.accounts_file = Some(path);
        self
    }

    /// Set the local user account name.
    pub fn with_account_name(mut self, name: String) -> Self {
        self.account_name = Some(name);
        self
    }

    /// Set the local user username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the local user password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set an explicit API URL for the local user account.
    pub fn with_account_url(mut self, url: String) -> Self {
        self.account_url = Some(url);
        self
    }

    /// Set the GraphQL request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    fn has_service_account_settings(&self) -> bool {
        self.service_account_file.is_some()
            || self.service_account_name.is_some()
            || self.client_id.is_some()
            || self.client_secret.is_some()
            || self.access_token_uri.is_some()
    }

    fn has_user_account_settings(&self) -> bool {
        self.accounts_file.is_some()
            || self.account_name.is_some()
            || self.username.is_some()
            || self.password.is_some()
            || self.account_url.is_some()
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let connection = ConnectionConfig {
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            skip_verify: self.skip_verify.unwrap_or(false),
        };
        Self::validate_timeout(&connection)?;

        let account = if self.has_service_account_settings() {
            Account::ServiceAccount(self.build_service_account()?)
        } else if self.has_user_account_settings() {
            Account::LocalUser(self.build_user_account()?)
        } else {
            return Err(ConfigError::MissingAuth);
        };

        Ok(Config {
            account,
            connection,
        })
    }

    fn build_service_account(self) -> Result<ServiceAccount, ConfigError> {
        let file = match &self.service_account_file {
            Some(path) => read_service_account_file(path)?,
            None => Default::default(),
        };

        let access_token_uri = self
            .access_token_uri
            .or(file.access_token_uri)
            .ok_or(ConfigError::MissingField("access_token_uri"))?;
        url::Url::parse(&access_token_uri).map_err(|e| ConfigError::InvalidValue {
            var: "access_token_uri".to_string(),
            message: e.to_string(),
        })?;

        Ok(ServiceAccount {
            name: self
                .service_account_name
                .or(file.name)
                .unwrap_or_default(),
            client_id: self
                .client_id
                .or(file.client_id)
                .ok_or(ConfigError::MissingField("client_id"))?,
            client_secret: self
                .client_secret
                .or(file.client_secret)
                .ok_or(ConfigError::MissingField("client_secret"))?,
            access_token_uri,
        })
    }

    fn build_user_account(self) -> Result<UserAccount, ConfigError> {
        let entry = match (&self.account_name, &self.accounts_file) {
            (Some(name), Some(path)) => Some(read_user_account_entry(path, name)?),
            (Some(name), None) => {
                let path = default_accounts_path()?;
                if path.exists() {
                    Some(read_user_account_entry(&path, name)?)
                } else {
                    None
                }
            }
            (None, _) => None,
        };
        let (file_username, file_password, file_url) = match entry {
            Some(entry) => (entry.username, entry.password, entry.url),
            None => (None, None, None),
        };

        let url = self.account_url.or(file_url);
        if let Some(url) = &url {
            url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                var: "url".to_string(),
                message: e.to_string(),
            })?;
        }
        let name = match (self.account_name, &url) {
            (Some(name), _) => name,
            (None, Some(_)) => String::new(),
            (None, None) => return Err(ConfigError::MissingField("name")),
        };

        Ok(UserAccount {
            name,
            username: self
                .username
                .or(file_username)
                .ok_or(ConfigError::MissingField("username"))?,
            password: self
                .password
                .or(file_password)
                .ok_or(ConfigError::MissingField("password"))?,
            url,
        })
    }

    fn validate_timeout(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }
        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }
        Ok(())
    }

    // Internal setters used by env.rs

    pub(crate) fn set_service_account_file(&mut self, path: Option<PathBuf>) {
        self.service_account_file = path;
    }

    pub(crate) fn set_service_account_name(&mut self, name: Option<String>) {
        self.service_account_name = name;
    }

    pub(crate) fn set_client_id(&mut self, client_id: Option<String>) {
        self.client_id = client_id;
    }

    pub(crate) fn set_client_secret(&mut self, secret: Option<SecretString>) {
        self.client_secret = secret;
    }

    pub(crate) fn set_access_token_uri(&mut self, uri: Option<String>) {
        self.access_token_uri = uri;
    }

    pub(crate) fn set_accounts_file(&mut self, path: Option<PathBuf>) {
        self.accounts_file = path;
    }

    pub(crate) fn set_account_name(&mut self, name: Option<String>) {
        self.account_name = name;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_account_url(&mut self, url: Option<String>) {
        self.account_url = url;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }
}
