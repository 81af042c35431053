//! Deployment version query.

use serde::Deserialize;

use crate::client::PolarisClient;
use crate::error::{Result, ResultExt};
use crate::models::Version;

const DEPLOYMENT_VERSION_QUERY: &str = "query RubrikPolarisSDKRequest { deploymentVersion }";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentVersionData {
    deployment_version: Version,
}

impl PolarisClient {
    /// Get the version of the Polaris deployment.
    pub async fn deployment_version(&self) -> Result<Version> {
        let data: DeploymentVersionData = self
            .query(DEPLOYMENT_VERSION_QUERY, &())
            .await
            .with_context(|| "failed to get deployment version")?;
        Ok(data.deployment_version)
    }
}
