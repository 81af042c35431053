//! Features command implementation.

use anyhow::Result;
use polaris_client::{CancellationToken, Feature};
use polaris_config::Config;

use crate::args::OutputFormat;
use crate::commands::{build_client_from_config, cancellable};
use crate::output::print_json;

pub async fn run(
    config: Config,
    name: Option<&str>,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = build_client_from_config(&config)?;

    let features: Vec<Feature> = match name {
        Some(name) => vec![cancellable(cancel, client.feature(name)).await?],
        None => cancellable(cancel, client.enabled_features()).await?,
    };

    match format {
        OutputFormat::Text => {
            for feature in &features {
                println!("{}", feature);
            }
        }
        OutputFormat::Json => print_json(&features)?,
    }
    Ok(())
}
