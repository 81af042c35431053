//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments that override environment configuration.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read `RUBRIK_POLARIS_*` variables; `ConfigLoader::from_env()` does.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "polaris")]
#[command(about = "Polaris CLI - Query Rubrik Security Cloud from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  polaris version\n  polaris features --name CLOUD_NATIVE_PROTECTION\n  polaris request query.graphql --variables '{\"first\": 10}'\n  polaris task-chain wait 5f3d1a8e-2c4b-4e8f-9a7d-6b1c0e9f8a21 --interval 5\n"
)]
pub struct Cli {
    /// Service account credentials file, as downloaded from the Polaris UI
    #[arg(long, global = true, value_name = "FILE")]
    pub service_account_file: Option<PathBuf>,

    /// Local user accounts file (defaults to ~/.rubrik/polaris-accounts.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub accounts_file: Option<PathBuf>,

    /// Local user account name
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// GraphQL request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true)]
    pub skip_verify: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v for debug, -vv for trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable text
    Text,
    /// Pretty printed JSON
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the deployment version of the Polaris platform
    Version,

    /// Send a raw GraphQL request and print the response payload
    Request {
        /// File containing the GraphQL query ("-" reads standard input)
        file: PathBuf,

        /// Query variables as a JSON object
        #[arg(long, value_name = "JSON")]
        variables: Option<String>,
    },

    /// Inspect and wait for task chains
    TaskChain {
        #[command(subcommand)]
        command: commands::task_chain::TaskChainCommand,
    },

    /// List the features enabled for the account
    Features {
        /// Show a single feature, failing when it is not enabled
        #[arg(long)]
        name: Option<String>,
    },
}

impl Cli {
    /// Default log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_chain_wait() {
        let cli = Cli::try_parse_from([
            "polaris",
            "task-chain",
            "wait",
            "5f3d1a8e-2c4b-4e8f-9a7d-6b1c0e9f8a21",
            "--interval",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::TaskChain {
                command: commands::task_chain::TaskChainCommand::Wait { interval, .. },
            } => assert_eq!(interval, 2),
            _ => panic!("Expected task-chain wait"),
        }
    }

    #[test]
    fn test_parse_invalid_uuid() {
        let result = Cli::try_parse_from(["polaris", "task-chain", "status", "not-a-uuid"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["polaris", "version"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
        let cli = Cli::try_parse_from(["polaris", "-vv", "version"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn test_output_format_json() {
        let cli = Cli::try_parse_from(["polaris", "features", "--output", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
