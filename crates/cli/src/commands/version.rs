//! Version command implementation.

use anyhow::Result;
use polaris_client::CancellationToken;
use polaris_config::Config;
use tracing::info;

use crate::args::OutputFormat;
use crate::commands::{build_client_from_config, cancellable};
use crate::output::print_json;

pub async fn run(config: Config, format: OutputFormat, cancel: &CancellationToken) -> Result<()> {
    let client = build_client_from_config(&config)?;
    info!("Connecting to {}", client.api_url());

    let version = cancellable(cancel, client.deployment_version()).await?;

    match format {
        OutputFormat::Text => println!("{}", version),
        OutputFormat::Json => print_json(&serde_json::json!({ "deploymentVersion": version }))?,
    }
    Ok(())
}
