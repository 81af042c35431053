//! CLI command implementations.

pub mod features;
pub mod request;
pub mod task_chain;
pub mod version;

use std::future::Future;

use polaris_client::{CancellationToken, ClientError, MetricsCollector, PolarisClient};
use polaris_config::Config;

/// Build a client for the configured account with metrics enabled.
pub fn build_client_from_config(config: &Config) -> Result<PolarisClient, ClientError> {
    PolarisClient::builder()
        .from_config(config)
        .metrics(MetricsCollector::new())
        .build()
}

/// Run a one-shot client call, dropping it when `cancel` fires.
pub async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let cancel = CancellationToken::new();
        let value = cancellable(&cancel, async { Ok::<_, ClientError>(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_cancellable_drops_call_on_cancel() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = cancellable(&cancel, std::future::pending::<Result<(), ClientError>>())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
