//! Polaris deployment versions.

use serde::{Deserialize, Serialize};
use std::fmt;

const LATEST: &str = "latest";

/// Deployment version string, e.g. `master-47837` or `v20210727-7`.
///
/// Only two formats are ordered: build-counter versions (`master-<n>`) and
/// dated releases (`v<yyyymmdd>-<n>`). Versions of the same format compare
/// lexicographically; versions of different formats are never ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Master,
    Dated,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn format_of(version: &str) -> Option<Format> {
    if let Some(counter) = version.strip_prefix("master-") {
        return all_digits(counter).then_some(Format::Master);
    }
    let (date, build) = version.strip_prefix('v')?.split_once('-')?;
    (date.len() == 8 && all_digits(date) && all_digits(build)).then_some(Format::Dated)
}

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the rolling `latest` deployment.
    pub fn is_latest(&self) -> bool {
        self.0 == LATEST
    }

    /// Whether this version is older than `other`.
    ///
    /// `latest` is never older than anything. Versions of unrecognized or
    /// mismatched formats are never older.
    pub fn before(&self, other: &str) -> bool {
        if self.is_latest() {
            return false;
        }
        match (format_of(&self.0), format_of(other)) {
            (Some(a), Some(b)) if a == b => self.0.as_str() < other,
            _ => false,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_master_versions() {
        assert!(Version::from("master-47837").before("master-47838"));
        assert!(!Version::from("master-47838").before("master-47837"));
        assert!(!Version::from("master-47837").before("master-47837"));
    }

    #[test]
    fn test_dated_versions() {
        assert!(Version::from("v20210727-7").before("v20210727-8"));
        assert!(Version::from("v20210727-7").before("v20210801-1"));
        assert!(!Version::from("v20210801-1").before("v20210727-7"));
    }

    #[test]
    fn test_latest_is_never_before() {
        let latest = Version::from("latest");
        assert!(latest.is_latest());
        assert!(!latest.before("master-1"));
        assert!(!latest.before("v20990101-1"));
        assert!(!latest.before("latest"));
    }

    #[test]
    fn test_mixed_formats_never_ordered() {
        assert!(!Version::from("master-47837").before("v20210727-8"));
        assert!(!Version::from("v20210727-8").before("master-47837"));
        assert!(!Version::from("master-1").before("latest"));
    }

    #[test]
    fn test_unrecognized_formats_never_ordered() {
        assert!(!Version::from("1.2.3").before("1.2.4"));
        assert!(!Version::from("master-").before("master-1"));
        assert!(!Version::from("v2021-1").before("v2022-1"));
    }

    #[test]
    fn test_lexicographic_counter_comparison() {
        // Build counters of different widths compare as text.
        assert!(!Version::from("master-9").before("master-10"));
    }

    #[test]
    fn test_serde_transparent() {
        let version: Version = serde_json::from_str(r#""v20230101-1""#).unwrap();
        assert_eq!(version.as_str(), "v20230101-1");
        assert_eq!(serde_json::to_string(&version).unwrap(), r#""v20230101-1""#);
    }

    proptest! {
        #[test]
        fn prop_latest_never_before(other in "\\PC{0,20}") {
            prop_assert!(!Version::from("latest").before(&other));
        }

        #[test]
        fn prop_master_matches_counter_order(a in 10000u32..99999, b in 10000u32..99999) {
            let v = Version::new(format!("master-{a}"));
            prop_assert_eq!(v.before(&format!("master-{b}")), a < b);
        }

        #[test]
        fn prop_before_is_irreflexive(v in "(master-[0-9]{1,6}|v[0-9]{8}-[0-9]{1,3})") {
            prop_assert!(!Version::new(v.clone()).before(&v));
        }

        #[test]
        fn prop_mixed_never_ordered(a in 0u32..100000, date in 19700101u32..20991231, build in 0u32..100) {
            let master = format!("master-{a}");
            let dated = format!("v{date}-{build}");
            prop_assert!(!Version::new(master.clone()).before(&dated));
            prop_assert!(!Version::new(dated).before(&master));
        }
    }
}
