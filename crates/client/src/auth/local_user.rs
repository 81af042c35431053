//! Username and password authentication against the session endpoint.

use async_trait::async_trait;
use polaris_config::UserAccount;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::TokenSource;
use super::http::TokenHttp;
use super::token::Token;
use crate::error::{ClientError, Result};

#[derive(Serialize)]
struct SessionRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(default)]
    access_token: String,
}

/// Token source for local user accounts.
///
/// POSTs `{username, password}` to `<api_url>/session` and reads the
/// `access_token` field of the response.
#[derive(Debug, Clone)]
pub struct LocalUserSource {
    session_url: String,
    username: String,
    password: SecretString,
    http: TokenHttp,
}

impl LocalUserSource {
    /// Create a source for the given API URL and credentials.
    pub fn new(
        client: reqwest::Client,
        api_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            session_url: format!("{}/session", api_url.trim_end_matches('/')),
            username: username.into(),
            password,
            http: TokenHttp::new(client),
        }
    }

    /// Create a source from a configured user account.
    pub fn from_account(client: reqwest::Client, account: &UserAccount) -> Self {
        Self::new(
            client,
            &account.api_url(),
            account.username.clone(),
            account.password.clone(),
        )
    }

    /// Override the per-attempt timeout of the session request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http.set_attempt_timeout(timeout);
        self
    }

    /// URL of the session endpoint.
    pub fn session_url(&self) -> &str {
        &self.session_url
    }
}

#[async_trait]
impl TokenSource for LocalUserSource {
    async fn token(&self) -> Result<Token> {
        debug!(username = %self.username, "Requesting local user session token");

        let request = SessionRequest {
            username: &self.username,
            password: self.password.expose_secret(),
        };
        let response: SessionResponse = self.http.post_json(&self.session_url, &request).await?;
        if response.access_token.is_empty() {
            return Err(ClientError::AuthFailed(
                "session response did not contain an access token".to_string(),
            ));
        }

        Ok(Token::from_jwt(response.access_token))
    }
}
