//! Task chain commands.

use anyhow::{Result, bail};
use clap::Subcommand;
use polaris_client::{CancellationToken, TaskChainState};
use polaris_config::Config;
use polaris_config::constants::DEFAULT_POLL_INTERVAL_SECS;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::args::OutputFormat;
use crate::commands::{build_client_from_config, cancellable};
use crate::output::print_json;

#[derive(Subcommand)]
pub enum TaskChainCommand {
    /// Show the current state of a task chain
    Status {
        /// Task chain ID
        id: Uuid,
    },

    /// Wait for a task chain to finish and print its final state
    Wait {
        /// Task chain ID
        id: Uuid,

        /// Seconds between status queries
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,
    },
}

pub async fn run(
    config: Config,
    command: TaskChainCommand,
    format: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = build_client_from_config(&config)?;

    match command {
        TaskChainCommand::Status { id } => {
            let chain = cancellable(cancel, client.task_chain_status(id)).await?;
            match format {
                OutputFormat::Text => println!("{}", chain.state),
                OutputFormat::Json => print_json(&chain)?,
            }
        }
        TaskChainCommand::Wait { id, interval } => {
            info!(%id, interval, "Waiting for task chain");
            let state = client
                .wait_for_task_chain(id, Duration::from_secs(interval), cancel)
                .await?;
            match format {
                OutputFormat::Text => println!("{}", state),
                OutputFormat::Json => print_json(&serde_json::json!({
                    "taskchainUuid": id,
                    "state": state,
                }))?,
            }
            if state != TaskChainState::Succeeded {
                bail!("task chain {id} finished in state {state}");
            }
        }
    }
    Ok(())
}
