//! CLI command implementations

use std::path::{Path, PathBuf};

use crate::api::AppState;
use crate::config::AppConfig;
use crate::geocoder;
use crate::http_server::HttpServer;
use crate::seed::load_seed;
use crate::telemetry::init_tracing;

use super::args::{Command, Overrides};
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            config,
            overrides,
            seed,
        } => serve(config.as_deref(), &overrides, seed).await,
        Command::CheckConfig { config, overrides } => check_config(config.as_deref(), &overrides),
    }
}

/// Config file (or defaults) with CLI / environment overrides applied, validated
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> CliResult<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path).map_err(|e| CliError::config_error(e.to_string()))?,
        None => AppConfig::default(),
    };

    if let Some(host) = &overrides.host {
        config.http.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.http.port = port;
    }
    if let Some(prefix) = &overrides.api_prefix {
        config.http.api_prefix = prefix.clone();
    }
    if let Some(key) = &overrides.geocoder_api_key {
        config.geocoder.api_key = Some(key.clone());
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }

    config
        .validate()
        .map_err(|e| CliError::config_error(e.to_string()))?;
    Ok(config)
}

/// Start the API, optionally loading seed data first
pub async fn serve(path: Option<&Path>, overrides: &Overrides, seed: Option<PathBuf>) -> CliResult<()> {
    let config = resolve_config(path, overrides)?;
    init_tracing(&config.logging).map_err(CliError::telemetry_error)?;

    let geocoder = geocoder::from_config(&config.geocoder).map_err(|e| CliError::config_error(e.to_string()))?;
    let state = AppState::in_memory(geocoder);
    tracing::info!(provider = ?config.geocoder.provider, "geocoder ready");

    if let Some(dir) = seed {
        load_seed(&state, &dir)
            .await
            .map_err(|e| CliError::seed_error(e.to_string()))?;
    }

    HttpServer::new(config.http, state)
        .start()
        .await
        .map_err(|e| CliError::serve_error(e.to_string()))
}

/// Print the resolved configuration, secrets masked
pub fn check_config(path: Option<&Path>, overrides: &Overrides) -> CliResult<()> {
    let mut config = resolve_config(path, overrides)?;
    if config.geocoder.api_key.is_some() {
        config.geocoder.api_key = Some("********".to_string());
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
