//! Task chain status queries and polling.
//!
//! Responsibilities:
//! - Query the status of a task chain.
//! - Poll a task chain until it reaches a terminal state.
//!
//! Does NOT handle:
//! - Starting task chains; the operations that start them return the ID.
//!
//! Invariants:
//! - Every request and every sleep races against the cancellation token.
//! - GraphQL errors with extension code 403 or 500 are RBAC propagation lag
//!   and are retried; any other error ends the wait immediately.
//! - RBAC lag is retried at most `TASK_CHAIN_RBAC_RETRY_LIMIT` times by
//!   `wait_for_task_chain`. The feature disable variant consults its
//!   predicate instead of counting.

use polaris_config::constants::TASK_CHAIN_RBAC_RETRY_LIMIT;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cancellation::CancellationToken;
use crate::client::PolarisClient;
use crate::error::{ClientError, Result, ResultExt};
use crate::models::{TaskChain, TaskChainState};

/// Query returning the status of a task chain.
pub const TASK_CHAIN_STATUS_QUERY: &str = r#"query RubrikPolarisSDKRequest($taskchainId: String!) {
    getKorgTaskchainStatus(taskchainId: $taskchainId) {
        taskchain {
            id
            state
            taskchainUuid
        }
    }
}"#;

#[derive(Deserialize)]
struct StatusData {
    #[serde(rename = "getKorgTaskchainStatus")]
    status: StatusPayload,
}

#[derive(Deserialize)]
struct StatusPayload {
    taskchain: TaskChain,
}

/// Whether the error is RBAC metadata lagging behind task chain creation.
fn is_rbac_lag(err: &ClientError) -> bool {
    err.graphql_error()
        .is_some_and(|gql| gql.has_code(403) || gql.has_code(500))
}

/// Sleep for `duration` unless the token is cancelled first.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

impl PolarisClient {
    /// Get the status of the task chain with the given ID.
    pub async fn task_chain_status(&self, task_chain_id: Uuid) -> Result<TaskChain> {
        let variables = serde_json::json!({ "taskchainId": task_chain_id.to_string() });
        let data: StatusData = self
            .query(TASK_CHAIN_STATUS_QUERY, &variables)
            .await
            .with_context(|| format!("failed to get status of task chain {task_chain_id}"))?;
        Ok(data.status.taskchain)
    }

    async fn poll_status(
        &self,
        task_chain_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<TaskChain> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            status = self.task_chain_status(task_chain_id) => status,
        }
    }

    /// Poll the task chain every `poll_interval` until it reaches a terminal
    /// state, and return that state.
    ///
    /// Returns [`ClientError::Cancelled`] as soon as `cancel` is cancelled.
    pub async fn wait_for_task_chain(
        &self,
        task_chain_id: Uuid,
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<TaskChainState> {
        let mut rbac_retries = 0usize;

        loop {
            match self.poll_status(task_chain_id, cancel).await {
                Ok(chain) => {
                    if chain.state.is_terminal() {
                        debug!(%task_chain_id, state = %chain.state, "Task chain finished");
                        return Ok(chain.state);
                    }
                    debug!(%task_chain_id, state = %chain.state, "Waiting for task chain");
                }
                Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
                Err(e) if is_rbac_lag(&e) => {
                    if rbac_retries >= TASK_CHAIN_RBAC_RETRY_LIMIT {
                        return Err(e.context(format!(
                            "task chain {task_chain_id} not accessible after {rbac_retries} retries"
                        )));
                    }
                    rbac_retries += 1;
                    warn!(
                        %task_chain_id,
                        attempt = rbac_retries,
                        max_attempts = TASK_CHAIN_RBAC_RETRY_LIMIT,
                        error = %e,
                        "Task chain status not yet accessible, retrying"
                    );
                }
                Err(e) => {
                    return Err(e.context(format!("failed to wait for task chain {task_chain_id}")));
                }
            }

            sleep_or_cancel(poll_interval, cancel).await?;
        }
    }

    /// Poll a feature disable task chain until it reaches a terminal state.
    ///
    /// Works like [`Self::wait_for_task_chain`], except that on RBAC lag
    /// `is_disabled` is asked whether the feature is already gone. When it
    /// answers `true` the chain is reported as [`TaskChainState::Succeeded`];
    /// otherwise polling continues without counting the attempt.
    pub async fn wait_for_feature_disable_task_chain<F, Fut>(
        &self,
        task_chain_id: Uuid,
        poll_interval: Duration,
        cancel: &CancellationToken,
        mut is_disabled: F,
    ) -> Result<TaskChainState>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        loop {
            match self.poll_status(task_chain_id, cancel).await {
                Ok(chain) => {
                    if chain.state.is_terminal() {
                        debug!(%task_chain_id, state = %chain.state, "Feature disable task chain finished");
                        return Ok(chain.state);
                    }
                    debug!(%task_chain_id, state = %chain.state, "Waiting for feature disable task chain");
                }
                Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
                Err(e) if is_rbac_lag(&e) => {
                    let disabled = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                        disabled = is_disabled() => disabled.with_context(|| {
                            format!("failed to check feature status for task chain {task_chain_id}")
                        })?,
                    };
                    if disabled {
                        debug!(%task_chain_id, "Feature reported disabled while task chain status is not accessible");
                        return Ok(TaskChainState::Succeeded);
                    }
                    warn!(
                        %task_chain_id,
                        error = %e,
                        "Task chain status not yet accessible and feature still enabled, retrying"
                    );
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "failed to wait for feature disable task chain {task_chain_id}"
                    )));
                }
            }

            sleep_or_cancel(poll_interval, cancel).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GqlError, GqlErrorEntry, GqlErrorExtensions};

    fn gql(code: i64) -> ClientError {
        ClientError::GraphQl(GqlError {
            errors: vec![GqlErrorEntry {
                message: "denied".to_string(),
                path: vec![],
                locations: vec![],
                extensions: Some(GqlErrorExtensions { code, trace: None }),
            }],
        })
    }

    #[test]
    fn test_rbac_lag_codes() {
        assert!(is_rbac_lag(&gql(403)));
        assert!(is_rbac_lag(&gql(500)));
        assert!(is_rbac_lag(&gql(403).context("failed to get status")));
        assert!(!is_rbac_lag(&gql(400)));
        assert!(!is_rbac_lag(&ClientError::Status {
            status: 403,
            reason: "Forbidden".to_string()
        }));
    }

    #[test]
    fn test_status_query_operation_name() {
        assert_eq!(
            crate::graphql::operation_name(TASK_CHAIN_STATUS_QUERY),
            "RubrikPolarisSDKRequest"
        );
    }

    #[tokio::test]
    async fn test_sleep_or_cancel() {
        let cancel = CancellationToken::new();
        assert!(sleep_or_cancel(Duration::from_millis(1), &cancel).await.is_ok());
        cancel.cancel();
        let err = sleep_or_cancel(Duration::from_secs(3600), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
