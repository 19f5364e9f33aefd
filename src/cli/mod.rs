//! CLI module for foodlovers
//!
//! Provides command-line interface for:
//! - serve: Open the store and serve the HTTP API
//! - token: Mint a development bearer token

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, run_command, serve, token, TokenOutput, DATABASE_NAME};
pub use errors::{CliError, CliResult};
