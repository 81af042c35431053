//! Centralized constants for the Polaris SDK workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout for GraphQL calls in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Token Acquisition
// =============================================================================

/// Per-attempt timeout for token requests in seconds.
pub const TOKEN_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Number of attempts made for a token request when attempts time out.
pub const TOKEN_REQUEST_ATTEMPTS: usize = 3;

/// Tokens expiring within this many seconds are treated as already expired.
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

// =============================================================================
// Task Chain Polling
// =============================================================================

/// Default interval between task chain status polls in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Maximum number of status queries retried while RBAC metadata propagates.
pub const TASK_CHAIN_RBAC_RETRY_LIMIT: usize = 50;

// =============================================================================
// Response Handling
// =============================================================================

/// Maximum number of body bytes carried in a content type error.
pub const MAX_ERROR_SNIPPET_BYTES: usize = 512;

// =============================================================================
// Account Discovery
// =============================================================================

/// Default location of the local user accounts file, relative to the home directory.
pub const DEFAULT_ACCOUNTS_FILE: &str = ".rubrik/polaris-accounts.json";

/// Domain used to derive the API URL of a local user account without an explicit URL.
pub const DEFAULT_ACCOUNT_DOMAIN: &str = "my.rubrik.com";
