//! Relay connection pagination.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::PolarisClient;
use crate::error::{ClientError, Result, ResultExt};
use crate::models::Connection;

/// Walk `path` from the `data` member of a response.
fn connection_at<'a>(data: &'a Value, path: &[&str]) -> Result<&'a Value> {
    path.iter().try_fold(data, |value, key| {
        value.get(*key).ok_or_else(|| {
            ClientError::InvalidResponse(format!("missing field {key:?} in {path:?}"))
        })
    })
}

impl PolarisClient {
    /// Collect every node of a Relay connection.
    ///
    /// The query must accept an `$after: String` variable and select
    /// `edges { node { ... } } pageInfo { endCursor hasNextPage }` on the
    /// connection found at `path` below `data`. Pages are requested until the
    /// connection reports no next page or `limit` nodes have been collected;
    /// the result is truncated to `limit`. A next page whose cursor equals the
    /// one just requested is an [`ClientError::InvalidResponse`].
    pub async fn paginate<T>(
        &self,
        query: &str,
        mut variables: Map<String, Value>,
        path: &[&str],
        limit: Option<usize>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut nodes = Vec::new();
        let mut page_count = 0usize;

        loop {
            let data: Value = self
                .query(query, &variables)
                .await
                .with_context(|| {
                    format!("failed to fetch page {} of {}", page_count + 1, path.join("."))
                })?;
            page_count += 1;

            let page: Connection<T> = serde_json::from_value(connection_at(&data, path)?.clone())
                .map_err(|e| ClientError::InvalidResponse(format!("invalid connection page: {e}")))?;
            let next_cursor = page.next_cursor().map(str::to_string);
            nodes.extend(page.into_nodes());

            if let Some(limit) = limit
                && nodes.len() >= limit
            {
                nodes.truncate(limit);
                break;
            }
            match next_cursor {
                Some(cursor)
                    if variables.get("after").and_then(Value::as_str) == Some(cursor.as_str()) =>
                {
                    return Err(ClientError::InvalidResponse(format!(
                        "cursor {cursor:?} of {} did not advance after page {page_count}",
                        path.join(".")
                    )));
                }
                Some(cursor) => {
                    variables.insert("after".to_string(), Value::String(cursor));
                }
                None => break,
            }
        }

        debug!(pages = page_count, items = nodes.len(), "Pagination complete");
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connection_at() {
        let data = json!({"allAwsCloudAccounts": {"edges": []}});
        let value = connection_at(&data, &["allAwsCloudAccounts"]).unwrap();
        assert!(value.get("edges").is_some());
        assert_eq!(connection_at(&data, &[]).unwrap(), &data);
    }

    #[test]
    fn test_connection_at_missing() {
        let data = json!({"other": {}});
        let err = connection_at(&data, &["allAwsCloudAccounts", "edges"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
