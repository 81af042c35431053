//! HTTP round trip shared by the token sources.

use polaris_config::constants::{TOKEN_REQUEST_ATTEMPTS, TOKEN_REQUEST_TIMEOUT_SECS};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::response::{RawResponse, classify_token};

/// HTTP client used only for token acquisition.
///
/// Each attempt is bounded by its own timeout; attempts that time out are
/// retried, every other failure is returned immediately.
#[derive(Debug, Clone)]
pub(crate) struct TokenHttp {
    client: reqwest::Client,
    attempt_timeout: Duration,
    attempts: usize,
}

impl TokenHttp {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            attempt_timeout: Duration::from_secs(TOKEN_REQUEST_TIMEOUT_SECS),
            attempts: TOKEN_REQUEST_ATTEMPTS,
        }
    }

    pub fn set_attempt_timeout(&mut self, timeout: Duration) {
        self.attempt_timeout = timeout;
    }

    /// One bounded attempt: send the request and buffer the whole response.
    async fn attempt<B>(&self, url: &str, body: &B) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.attempt_timeout)
            .json(body)
            .send()
            .await?;
        RawResponse::read(response).await
    }

    /// POST `body` as JSON to `url` and classify the response into `T`.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        for attempt in 1..=self.attempts {
            match self.attempt(url, body).await {
                Ok(response) => return classify_token(response),
                Err(ClientError::HttpError(e)) if e.is_timeout() => {
                    debug!(
                        attempt,
                        max_attempts = self.attempts,
                        "Token request timed out"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(ClientError::Timeout {
            attempts: self.attempts,
        })
    }
}
