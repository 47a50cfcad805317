//! CLI-specific error types
//!
//! Every CLI error is fatal: `main` prints it and exits non-zero.

use thiserror::Error;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration missing, malformed or invalid
    ConfigError,
    /// Logging could not be set up
    TelemetryError,
    /// Seed data could not be loaded
    SeedError,
    /// Server failed to bind or crashed
    ServeError,
    /// Output could not be produced
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DEVCAMP_CLI_CONFIG_ERROR",
            Self::TelemetryError => "DEVCAMP_CLI_TELEMETRY_ERROR",
            Self::SeedError => "DEVCAMP_CLI_SEED_ERROR",
            Self::ServeError => "DEVCAMP_CLI_SERVE_ERROR",
            Self::IoError => "DEVCAMP_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{}: {message}", .code.code())]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn telemetry_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::TelemetryError, msg)
    }

    pub fn seed_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SeedError, msg)
    }

    pub fn serve_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("http.port missing");
        assert_eq!(err.to_string(), "DEVCAMP_CLI_CONFIG_ERROR: http.port missing");
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert_eq!(err.message(), "http.port missing");
    }
}
