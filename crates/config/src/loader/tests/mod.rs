//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` and `env_lock()` to prevent environment variable pollution.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;

pub mod file_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Every variable the loader reads, all unset. Tests start from this list so
/// the host environment cannot leak into assertions.
pub fn cleared_env() -> Vec<(&'static str, Option<&'static str>)> {
    use crate::loader::env::*;
    vec![
        (ENV_SERVICE_ACCOUNT_FILE, None),
        (ENV_SERVICE_ACCOUNT_NAME, None),
        (ENV_SERVICE_ACCOUNT_CLIENT_ID, None),
        (ENV_SERVICE_ACCOUNT_CLIENT_SECRET, None),
        (ENV_SERVICE_ACCOUNT_ACCESS_TOKEN_URI, None),
        (ENV_ACCOUNT_FILE, None),
        (ENV_ACCOUNT_NAME, None),
        (ENV_ACCOUNT_USERNAME, None),
        (ENV_ACCOUNT_PASSWORD, None),
        (ENV_ACCOUNT_URL, None),
        (ENV_TIMEOUT, None),
        (ENV_SKIP_VERIFY, None),
    ]
}

/// Replace entries of the cleared environment with the given values.
pub fn env_with(
    vars: &[(&'static str, &'static str)],
) -> Vec<(&'static str, Option<&'static str>)> {
    let mut env = cleared_env();
    for (key, value) in vars {
        if let Some(entry) = env.iter_mut().find(|(k, _)| k == key) {
            entry.1 = Some(value);
        }
    }
    env
}
