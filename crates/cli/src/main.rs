//! Polaris CLI - Command-line interface for Rubrik Security Cloud.
//!
//! Responsibilities:
//! - Parse command-line arguments and load account configuration.
//! - Execute GraphQL operations via the shared client library.
//! - Map failures to structured exit codes.
//!
//! Does NOT handle:
//! - GraphQL transport, authentication or polling (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values are visible to `from_env()`.
//! - Command-line flags override environment variables, which override account files.
//! - Ctrl+C cancels the running command and exits with code 130.

mod args;
mod commands;
mod dispatch;
mod error;
mod metrics_exporter;
mod output;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use metrics_exporter::MetricsExporter;
use polaris_client::CancellationToken;
use polaris_config::{Config, ConfigError, ConfigLoader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Build the configuration from account files, environment and CLI overrides.
fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut loader = ConfigLoader::new().from_env()?;

    if let Some(path) = &cli.service_account_file {
        loader = loader.with_service_account_file(path.clone());
    }
    if let Some(path) = &cli.accounts_file {
        loader = loader.with_accounts_file(path.clone());
    }
    if let Some(name) = &cli.account {
        loader = loader.with_account_name(name.clone());
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(std::time::Duration::from_secs(timeout_secs));
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }

    loader.build()
}

fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::ConfigurationError.as_i32());
    }

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let _metrics_exporter = if let Some(ref bind_addr) = cli.metrics_bind {
        match MetricsExporter::install(bind_addr) {
            Ok(exporter) => {
                tracing::debug!(addr = %exporter.bind_addr(), "Metrics exporter installed");
                Some(exporter)
            }
            Err(e) => {
                eprintln!("Failed to start metrics exporter: {}", e);
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        }
    } else {
        None
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(ExitCode::from(&e).as_i32());
        }
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, config, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) => match e.exit_code() {
            ExitCode::Interrupted => {
                print_cancelled_message();
                ExitCode::Interrupted
            }
            code => {
                eprintln!("{:#}", e);
                code
            }
        },
    };

    std::process::exit(exit_code.as_i32());
}
