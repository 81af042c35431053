//! Client credentials authentication for service accounts.

use async_trait::async_trait;
use polaris_config::ServiceAccount;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::TokenSource;
use super::http::TokenHttp;
use super::token::Token;
use crate::error::{ClientError, Result};

/// Last path segment of the appliance token endpoint.
const APPLIANCE_TOKEN_SEGMENT: &str = "cdm_client_token";

#[derive(Serialize)]
struct ClientCredentialsRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_uuid: Option<Uuid>,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    access_token: String,
}

#[derive(Deserialize)]
struct ApplianceTokenResponse {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    token: String,
}

/// Token source for service accounts.
///
/// POSTs `{grant_type: "client_credentials", client_id, client_secret}` to the
/// access token URI and checks that the response echoes the same client ID.
#[derive(Debug, Clone)]
pub struct ServiceAccountSource {
    access_token_uri: String,
    client_id: String,
    client_secret: SecretString,
    http: TokenHttp,
}

impl ServiceAccountSource {
    /// Create a source for the given access token URI and credentials.
    pub fn new(
        client: reqwest::Client,
        access_token_uri: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            access_token_uri: access_token_uri.into(),
            client_id: client_id.into(),
            client_secret,
            http: TokenHttp::new(client),
        }
    }

    /// Create a source from a configured service account.
    pub fn from_account(client: reqwest::Client, account: &ServiceAccount) -> Self {
        Self::new(
            client,
            account.access_token_uri.clone(),
            account.client_id.clone(),
            account.client_secret.clone(),
        )
    }

    /// Override the per-attempt timeout of token requests.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http.set_attempt_timeout(timeout);
        self
    }

    /// URL of the access token endpoint.
    pub fn access_token_uri(&self) -> &str {
        &self.access_token_uri
    }

    /// URL of the appliance token endpoint, a sibling of the access token URI.
    pub fn appliance_token_uri(&self) -> Result<String> {
        sibling_url(&self.access_token_uri, APPLIANCE_TOKEN_SEGMENT)
    }

    fn credentials(&self, cluster_uuid: Option<Uuid>) -> ClientCredentialsRequest<'_> {
        ClientCredentialsRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: self.client_secret.expose_secret(),
            cluster_uuid,
        }
    }

    fn check_client_id(&self, echoed: &str) -> Result<()> {
        if echoed != self.client_id {
            return Err(ClientError::AuthFailed(format!(
                "token response client id {echoed:?} does not match {:?}",
                self.client_id
            )));
        }
        Ok(())
    }

    /// Exchange the service account credentials for a token scoped to the
    /// Rubrik cluster identified by `cluster_uuid`.
    pub async fn appliance_token(&self, cluster_uuid: Uuid) -> Result<Token> {
        let url = self.appliance_token_uri()?;
        debug!(client_id = %self.client_id, %cluster_uuid, "Requesting appliance token");

        let response: ApplianceTokenResponse = self
            .http
            .post_json(&url, &self.credentials(Some(cluster_uuid)))
            .await?;
        if let Some(echoed) = &response.client_id {
            self.check_client_id(echoed)?;
        }
        if response.token.is_empty() {
            return Err(ClientError::AuthFailed(
                "appliance token response did not contain a token".to_string(),
            ));
        }

        Ok(Token::from_jwt(response.token))
    }
}

#[async_trait]
impl TokenSource for ServiceAccountSource {
    async fn token(&self) -> Result<Token> {
        debug!(client_id = %self.client_id, "Requesting service account token");

        let response: AccessTokenResponse = self
            .http
            .post_json(&self.access_token_uri, &self.credentials(None))
            .await?;
        self.check_client_id(&response.client_id)?;
        if response.access_token.is_empty() {
            return Err(ClientError::AuthFailed(
                "token response did not contain an access token".to_string(),
            ));
        }

        Ok(Token::from_jwt(response.access_token))
    }
}

/// Replace the last path segment of `uri` with `segment`.
fn sibling_url(uri: &str, segment: &str) -> Result<String> {
    let mut url = Url::parse(uri).map_err(|e| ClientError::InvalidUrl(format!("{uri}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(format!("{uri}: URL cannot have a path")))?
        .pop_if_empty()
        .pop()
        .push(segment);
    Ok(url.to_string())
}
