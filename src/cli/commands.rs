//! CLI command implementations

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::api::{AppState, HttpServer};
use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::logging;
use crate::store::Database;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Name of the process-wide database
pub const DATABASE_NAME: &str = "foodlovers";

/// Output of the `token` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenOutput {
    pub email: String,
    pub token: String,
    pub expires_in: i64,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Token { email, config } => token(&email, config.as_deref()),
    }
}

/// Boot the store and serve HTTP until a shutdown signal arrives
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    logging::init(&config.logging).map_err(|e| CliError::Logging(e.to_string()))?;

    let db = Database::open(DATABASE_NAME);
    let state = AppState::new(
        Coordinator::new(db),
        JwtVerifier::new(config.jwt_config()),
    );
    let server = HttpServer::new(config.server.clone(), state);
    info!(addr = %server.socket_addr(), "starting foodlovers server");

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    rt.block_on(server.start()).map_err(CliError::Serve)
}

/// Print a bearer token for `email` signed with the configured secret
pub fn token(email: &str, config_path: Option<&Path>) -> CliResult<()> {
    let output = issue(email, &Config::load(config_path)?)?;
    write_json(&output)
}

fn issue(email: &str, config: &Config) -> CliResult<TokenOutput> {
    let verifier = JwtVerifier::new(config.jwt_config());
    Ok(TokenOutput {
        email: email.to_string(),
        token: verifier.issue_token(email)?,
        expires_in: config.auth.token_ttl_secs,
    })
}
