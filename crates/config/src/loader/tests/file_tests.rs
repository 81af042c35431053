//! Account file loading tests.

use secrecy::ExposeSecret;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::Account;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn service_account_json() -> &'static str {
    r#"{
        "client_id": "client|from-file",
        "client_secret": "file-secret",
        "name": "automation",
        "access_token_uri": "https://acme.my.rubrik.com/api/client_token"
    }"#
}

fn accounts_json() -> &'static str {
    r#"{
        "acme": {
            "username": "admin@acme.com",
            "password": "file-password"
        },
        "staging": {
            "username": "ops@acme.com",
            "password": "staging-password",
            "url": "https://staging.polaris.local/api"
        }
    }"#
}

#[test]
fn test_service_account_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "sa.json", service_account_json());

    let config = ConfigLoader::new()
        .with_service_account_file(path)
        .build()
        .unwrap();

    match config.account {
        Account::ServiceAccount(account) => {
            assert_eq!(account.name, "automation");
            assert_eq!(account.client_id, "client|from-file");
            assert_eq!(account.client_secret.expose_secret(), "file-secret");
        }
        other => panic!("Expected service account, got {:?}", other),
    }
}

#[test]
fn test_builder_values_override_service_account_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "sa.json", service_account_json());

    let config = ConfigLoader::new()
        .with_service_account_file(path)
        .with_client_id("client|override".to_string())
        .build()
        .unwrap();

    match config.account {
        Account::ServiceAccount(account) => {
            assert_eq!(account.client_id, "client|override");
            assert_eq!(account.client_secret.expose_secret(), "file-secret");
        }
        other => panic!("Expected service account, got {:?}", other),
    }
}

#[test]
fn test_missing_service_account_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .with_service_account_file(temp_dir.path().join("missing.json"))
        .build();
    assert!(matches!(result, Err(ConfigError::AccountFileRead { .. })));
}

#[test]
fn test_malformed_service_account_file_does_not_leak_contents() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        temp_dir.path(),
        "sa.json",
        r#"{"client_secret": "leaky-secret", "client_id": "#,
    );

    let err = ConfigLoader::new()
        .with_service_account_file(path)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::AccountFileParse { .. }));
    assert!(!err.to_string().contains("leaky-secret"));
}

#[test]
fn test_user_account_from_accounts_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "accounts.json", accounts_json());

    let config = ConfigLoader::new()
        .with_accounts_file(path)
        .with_account_name("acme".to_string())
        .build()
        .unwrap();

    match &config.account {
        Account::LocalUser(account) => {
            assert_eq!(account.username, "admin@acme.com");
            assert_eq!(account.password.expose_secret(), "file-password");
            assert_eq!(account.url, None);
        }
        other => panic!("Expected local user, got {:?}", other),
    }
    assert_eq!(config.account.api_url(), "https://acme.my.rubrik.com/api");
}

#[test]
fn test_user_account_url_from_accounts_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "accounts.json", accounts_json());

    let config = ConfigLoader::new()
        .with_accounts_file(path)
        .with_account_name("staging".to_string())
        .build()
        .unwrap();

    assert_eq!(config.account.api_url(), "https://staging.polaris.local/api");
}

#[test]
fn test_user_account_not_in_accounts_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "accounts.json", accounts_json());

    let result = ConfigLoader::new()
        .with_accounts_file(path)
        .with_account_name("unknown".to_string())
        .build();
    assert!(matches!(result, Err(ConfigError::AccountNotFound(name)) if name == "unknown"));
}
