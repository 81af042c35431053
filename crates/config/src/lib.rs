//! Configuration management for the Polaris SDK.
//!
//! This crate provides types and loaders for Polaris account credentials
//! (service accounts and local user accounts) from JSON files, environment
//! variables and `.env` files, plus the constants shared across crates.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{Account, Config, ConnectionConfig, ServiceAccount, UserAccount};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
