//! Enabled feature queries.

use serde::Deserialize;

use crate::client::PolarisClient;
use crate::error::{ClientError, Result, ResultExt};
use crate::models::Feature;

const ENABLED_FEATURES_QUERY: &str = r#"query RubrikPolarisSDKRequest {
    enabledFeaturesForAccount {
        features {
            featureName
            permissionGroups
        }
    }
}"#;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnabledFeaturesData {
    enabled_features_for_account: FeatureList,
}

#[derive(Deserialize)]
struct FeatureList {
    #[serde(default)]
    features: Vec<Feature>,
}

impl PolarisClient {
    /// List the features enabled for the account.
    pub async fn enabled_features(&self) -> Result<Vec<Feature>> {
        let data: EnabledFeaturesData = self
            .query(ENABLED_FEATURES_QUERY, &())
            .await
            .with_context(|| "failed to get enabled features")?;
        Ok(data.enabled_features_for_account.features)
    }

    /// Look up an enabled feature by name.
    ///
    /// Returns [`ClientError::NotFound`] when the feature is not enabled.
    pub async fn feature(&self, name: &str) -> Result<Feature> {
        self.enabled_features()
            .await?
            .into_iter()
            .find(|feature| feature.name == name)
            .ok_or_else(|| ClientError::NotFound(format!("feature {name}")))
    }
}
