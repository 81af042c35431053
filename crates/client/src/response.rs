//! Classification of HTTP responses returned by Polaris.
//!
//! Responsibilities:
//! - Buffer a response into a [`RawResponse`] (status, content type, body).
//! - Classify GraphQL responses into success bytes or a [`ClientError`].
//! - Classify token endpoint responses into a typed payload or a [`ClientError`].
//!
//! Does NOT handle:
//! - Sending requests or attaching credentials (see `transport`).
//! - Interpreting the `data` member of a successful GraphQL payload.
//!
//! Invariants:
//! - An unrecognized body is always an error, never an empty success.
//! - Error snippets never exceed `MAX_ERROR_SNIPPET_BYTES` bytes of the body.
//! - The plain JSON error shape is probed before the GraphQL error list, and
//!   both are probed before the HTTP status is considered.

use polaris_config::constants::MAX_ERROR_SNIPPET_BYTES;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, GqlError, GqlErrorEntry, JsonError, Result};

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Buffer the response body.
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(is_json_content_type)
    }

    fn wrong_content_type(&self) -> ClientError {
        ClientError::WrongContentType {
            content_type: self.content_type.clone().unwrap_or_default(),
            status: self.status.as_u16(),
            snippet: body_snippet(&self.body),
        }
    }
}

/// Whether a `Content-Type` header value denotes JSON.
pub(crate) fn is_json_content_type(value: &str) -> bool {
    value
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("application/json")
}

/// Lossy UTF-8 rendering of at most `MAX_ERROR_SNIPPET_BYTES` bytes of `body`.
pub(crate) fn body_snippet(body: &[u8]) -> String {
    let end = body.len().min(MAX_ERROR_SNIPPET_BYTES);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

/// Generic error for a status code without a recognized error body.
pub(crate) fn status_error(status: StatusCode) -> ClientError {
    ClientError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
    }
}

fn plain_json_error(value: &Value) -> Option<JsonError> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<JsonError>(value.clone())
        .ok()
        .filter(JsonError::is_error)
}

fn graphql_error(value: &Value) -> Result<Option<GqlError>> {
    let Some(errors) = value.get("errors") else {
        return Ok(None);
    };
    if errors.is_null() {
        return Ok(None);
    }
    let errors: Vec<GqlErrorEntry> = serde_json::from_value(errors.clone())
        .map_err(|e| ClientError::InvalidResponse(format!("malformed GraphQL error list: {e}")))?;
    if errors.is_empty() {
        return Ok(None);
    }
    Ok(Some(GqlError { errors }))
}

/// Classify a GraphQL endpoint response.
///
/// On success the body is returned unmodified.
pub(crate) fn classify_graphql(response: RawResponse) -> Result<Vec<u8>> {
    if response.body.is_empty() {
        return Err(ClientError::NoBody {
            status: response.status.as_u16(),
        });
    }
    if !response.is_json() {
        return Err(response.wrong_content_type());
    }

    let value: Value = serde_json::from_slice(&response.body).map_err(|e| {
        ClientError::InvalidResponse(format!(
            "failed to parse JSON body (status code {}): {e}",
            response.status.as_u16()
        ))
    })?;
    if !value.is_object() {
        return Err(ClientError::InvalidResponse(format!(
            "expected a JSON object (status code {})",
            response.status.as_u16()
        )));
    }

    if let Some(err) = plain_json_error(&value) {
        return Err(ClientError::Json(err));
    }
    if let Some(err) = graphql_error(&value)? {
        return Err(ClientError::GraphQl(err));
    }
    if response.status != StatusCode::OK {
        return Err(status_error(response.status));
    }

    Ok(response.body)
}

/// Classify a token endpoint response and deserialize its payload.
pub(crate) fn classify_token<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    if response.body.is_empty() {
        return Err(if response.status == StatusCode::OK {
            ClientError::NoBody {
                status: response.status.as_u16(),
            }
        } else {
            status_error(response.status)
        });
    }
    if !response.is_json() {
        return Err(response.wrong_content_type());
    }

    let value: Value = serde_json::from_slice(&response.body).map_err(|e| {
        ClientError::InvalidResponse(format!("failed to parse token response: {e}"))
    })?;
    if let Some(err) = plain_json_error(&value) {
        return Err(ClientError::Json(err));
    }
    if !response.status.is_success() {
        return Err(status_error(response.status));
    }

    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("unexpected token response: {e}")))
}
