//! Shared test utilities for polaris CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point the CLI at a wiremock server with a local user account.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - No `RUBRIK_POLARIS_*` variable from the host leaks into the command.

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNT_VARS: &[&str] = &[
    "RUBRIK_POLARIS_SERVICEACCOUNT_FILE",
    "RUBRIK_POLARIS_SERVICEACCOUNT_NAME",
    "RUBRIK_POLARIS_SERVICEACCOUNT_CLIENTID",
    "RUBRIK_POLARIS_SERVICEACCOUNT_CLIENTSECRET",
    "RUBRIK_POLARIS_SERVICEACCOUNT_ACCESSTOKENURI",
    "RUBRIK_POLARIS_ACCOUNT_FILE",
    "RUBRIK_POLARIS_ACCOUNT_NAME",
    "RUBRIK_POLARIS_ACCOUNT_USERNAME",
    "RUBRIK_POLARIS_ACCOUNT_PASSWORD",
    "RUBRIK_POLARIS_ACCOUNT_URL",
    "POLARIS_TIMEOUT",
    "POLARIS_SKIP_VERIFY",
    "RUST_LOG",
];

/// Returns a hermetic `polaris` command without any account configured.
pub fn polaris_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("polaris");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    for var in ACCOUNT_VARS {
        cmd.env_remove(var);
    }

    cmd
}

/// Returns a hermetic `polaris` command authenticating as a local user
/// against `server`.
#[allow(dead_code)]
pub fn polaris_cmd_for(server: &MockServer) -> Command {
    let mut cmd = polaris_cmd();
    cmd.env("RUBRIK_POLARIS_ACCOUNT_USERNAME", "admin@acme.com")
        .env("RUBRIK_POLARIS_ACCOUNT_PASSWORD", "hunter2")
        .env("RUBRIK_POLARIS_ACCOUNT_URL", format!("{}/api", server.uri()));
    cmd
}

/// Mount a session endpoint handing out a token valid for an hour.
#[allow(dead_code)]
pub async fn mount_session(server: &MockServer) {
    let jwt = polaris_client::testing::unsigned_jwt(unix_now() + 3600);
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": jwt })))
        .mount(server)
        .await;
}

/// Mount a GraphQL endpoint answering every request with `body`.
#[allow(dead_code)]
pub async fn mount_graphql(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
