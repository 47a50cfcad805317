//! CLI module for devcamp
//!
//! Provides command-line interface for:
//! - serve: Load configuration (and optional seed data), then serve the API
//! - check-config: Validate configuration and print it

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, Overrides};
pub use commands::{check_config, resolve_config, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command).await
}
