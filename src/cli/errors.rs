//! CLI-specific error types
//!
//! Every CLI error is fatal: `main` prints it and exits non-zero.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to create tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Failed to issue token: {0}")]
    Token(#[from] AuthError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "FOODLOVERS_CLI_CONFIG_ERROR",
            CliError::Logging(_) => "FOODLOVERS_CLI_LOGGING_ERROR",
            CliError::Runtime(_) | CliError::Serve(_) => "FOODLOVERS_CLI_SERVE_FAILED",
            CliError::Token(_) => "FOODLOVERS_CLI_TOKEN_ERROR",
            CliError::Io(_) => "FOODLOVERS_CLI_IO_ERROR",
        }
    }
}
