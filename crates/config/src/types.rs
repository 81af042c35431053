//! Configuration types for Polaris accounts and connections.

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use crate::constants::{DEFAULT_ACCOUNT_DOMAIN, DEFAULT_TIMEOUT_SECS};

/// Deserialization helper for SecretString fields.
pub(crate) mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Path segment that terminates a service account access token URI.
const CLIENT_TOKEN_SEGMENT: &str = "/client_token";

/// Service account credentials, as downloaded from the Polaris UI.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    /// Display name of the service account.
    #[serde(default)]
    pub name: String,
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    #[serde(deserialize_with = "secret_string::deserialize")]
    pub client_secret: SecretString,
    /// Full URL of the access token endpoint.
    pub access_token_uri: String,
}

impl ServiceAccount {
    /// API URL of the account, derived from the access token URI by dropping
    /// its trailing `/client_token` segment.
    pub fn api_url(&self) -> String {
        let uri = self.access_token_uri.trim_end_matches('/');
        uri.strip_suffix(CLIENT_TOKEN_SEGMENT)
            .unwrap_or(uri)
            .to_string()
    }
}

/// Local user account credentials.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Polaris account name, i.e. the first label of the account's domain.
    pub name: String,
    /// Username of the local user.
    pub username: String,
    /// Password of the local user.
    pub password: SecretString,
    /// Explicit API URL, overriding the one derived from the account name.
    pub url: Option<String>,
}

impl UserAccount {
    /// API URL of the account.
    pub fn api_url(&self) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}/api", self.name, DEFAULT_ACCOUNT_DOMAIN),
        }
    }
}

/// The account a client authenticates as.
#[derive(Debug, Clone)]
pub enum Account {
    /// Username and password against the session endpoint.
    LocalUser(UserAccount),
    /// Client credentials against the access token endpoint.
    ServiceAccount(ServiceAccount),
}

impl Account {
    /// Name of the account.
    pub fn name(&self) -> &str {
        match self {
            Account::LocalUser(account) => &account.name,
            Account::ServiceAccount(account) => &account.name,
        }
    }

    /// API URL of the account, without trailing slash.
    pub fn api_url(&self) -> String {
        match self {
            Account::LocalUser(account) => account.api_url(),
            Account::ServiceAccount(account) => account.api_url(),
        }
    }
}

/// Connection settings shared by all accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Timeout applied to GraphQL requests.
    pub timeout: Duration,
    /// Whether to skip TLS verification (for test deployments with self-signed certificates).
    pub skip_verify: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            skip_verify: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Account to authenticate as.
    pub account: Account,
    /// Connection settings.
    pub connection: ConnectionConfig,
}
