//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//! - Pass the shared cancellation token to every handler.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).

use anyhow::Result;
use polaris_client::CancellationToken;
use polaris_config::Config;

use crate::args::{Cli, Commands};
use crate::commands;

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(
    cli: Cli,
    config: Config,
    cancel_token: &CancellationToken,
) -> Result<()> {
    let format = cli.output;

    match cli.command {
        Commands::Version => {
            commands::version::run(config, format, cancel_token).await?;
        }
        Commands::Request { file, variables } => {
            commands::request::run(config, &file, variables.as_deref(), format, cancel_token)
                .await?;
        }
        Commands::TaskChain { command } => {
            commands::task_chain::run(config, command, format, cancel_token).await?;
        }
        Commands::Features { name } => {
            commands::features::run(config, name.as_deref(), format, cancel_token).await?;
        }
    }

    Ok(())
}
