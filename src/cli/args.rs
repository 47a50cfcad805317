//! CLI argument definitions using clap
//!
//! Commands:
//! - devcamp serve [--config <path>] [--host] [--port] [--seed <dir>]
//! - devcamp check-config [--config <path>]
//!
//! Every override flag can also come from a `DEVCAMP_*` environment variable.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// devcamp - bootcamp and course directory API
#[derive(Parser, Debug)]
#[command(name = "devcamp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Path to configuration file (defaults apply when absent)
        #[arg(long, env = "DEVCAMP_CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,

        /// Directory holding bootcamps.json / courses.json to load first
        #[arg(long, env = "DEVCAMP_SEED")]
        seed: Option<PathBuf>,
    },

    /// Validate the configuration and print the resolved result
    CheckConfig {
        /// Path to configuration file (defaults apply when absent)
        #[arg(long, env = "DEVCAMP_CONFIG")]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Settings that win over the config file
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Host to bind to
    #[arg(long, env = "DEVCAMP_HOST")]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long, env = "DEVCAMP_PORT")]
    pub port: Option<u16>,

    /// Path prefix of the resource routes
    #[arg(long, env = "DEVCAMP_API_PREFIX")]
    pub api_prefix: Option<String>,

    /// MapQuest API key
    #[arg(long, env = "DEVCAMP_GEOCODER_API_KEY", hide_env_values = true)]
    pub geocoder_api_key: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "DEVCAMP_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
