//! Polaris features and their permission groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A permission group of a feature, e.g. `BASIC` or `EXPORTABLE`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionGroup(pub String);

impl From<&str> for PermissionGroup {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PermissionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Polaris feature, e.g. `CLOUD_NATIVE_PROTECTION`, with the permission
/// groups enabled for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "featureName")]
    pub name: String,
    #[serde(rename = "permissionGroups", default)]
    pub permission_groups: BTreeSet<PermissionGroup>,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permission_groups: BTreeSet::new(),
        }
    }

    /// Copy of the feature with the given permission groups added.
    pub fn with_permission_groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<PermissionGroup>,
    {
        self.permission_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Whether the feature has every one of `groups`.
    pub fn has_permission_groups<'a, I>(&self, groups: I) -> bool
    where
        I: IntoIterator<Item = &'a PermissionGroup>,
    {
        groups
            .into_iter()
            .all(|group| self.permission_groups.contains(group))
    }

    /// Whether `other` refers to the same feature, ignoring permission groups.
    pub fn same_name(&self, other: &Feature) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.permission_groups.is_empty() {
            return f.write_str(&self.name);
        }
        let groups: Vec<&str> = self.permission_groups.iter().map(|g| g.0.as_str()).collect();
        write!(f, "{} ({})", self.name, groups.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_feature() {
        let feature: Feature = serde_json::from_value(serde_json::json!({
            "featureName": "CLOUD_NATIVE_PROTECTION",
            "permissionGroups": ["BASIC", "EXPORTABLE", "BASIC"]
        }))
        .unwrap();
        assert_eq!(feature.name, "CLOUD_NATIVE_PROTECTION");
        assert_eq!(feature.permission_groups.len(), 2);
    }

    #[test]
    fn test_deserialize_feature_without_groups() {
        let feature: Feature =
            serde_json::from_value(serde_json::json!({"featureName": "EXOCOMPUTE"})).unwrap();
        assert!(feature.permission_groups.is_empty());
    }

    #[test]
    fn test_has_permission_groups() {
        let feature = Feature::new("CLOUD_NATIVE_PROTECTION")
            .with_permission_groups(["BASIC", "EXPORTABLE"]);
        let basic = PermissionGroup::from("BASIC");
        let recovery = PermissionGroup::from("FILE_LEVEL_RECOVERY");
        assert!(feature.has_permission_groups([&basic]));
        assert!(!feature.has_permission_groups([&basic, &recovery]));
        assert!(feature.has_permission_groups(std::iter::empty()));
    }

    #[test]
    fn test_same_name_ignores_groups() {
        let a = Feature::new("EXOCOMPUTE");
        let b = Feature::new("EXOCOMPUTE").with_permission_groups(["BASIC"]);
        assert!(a.same_name(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let feature =
            Feature::new("EXOCOMPUTE").with_permission_groups(["RSC_MANAGED_CLUSTER", "BASIC"]);
        assert_eq!(feature.to_string(), "EXOCOMPUTE (BASIC, RSC_MANAGED_CLUSTER)");
        assert_eq!(Feature::new("EXOCOMPUTE").to_string(), "EXOCOMPUTE");
    }
}
