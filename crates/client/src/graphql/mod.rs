//! GraphQL wire envelopes.

mod operation;

pub use operation::operation_name;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body posted to the GraphQL endpoint.
///
/// Wire shape: `{"query": ..., "variables": ..., "operationName": ...}` with
/// `variables` omitted when null and `operationName` omitted when empty.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub variables: Value,
    #[serde(rename = "operationName", skip_serializing_if = "String::is_empty")]
    pub operation_name: String,
}

impl<'a> RequestEnvelope<'a> {
    /// Build an envelope, extracting the operation name from `query`.
    pub fn new(query: &'a str, variables: Value) -> Self {
        Self {
            query,
            variables,
            operation_name: operation_name(query),
        }
    }
}

/// Successful response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
