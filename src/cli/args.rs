//! CLI argument definitions using clap
//!
//! Commands:
//! - foodlovers serve [--config <path>] [--port <n>]
//! - foodlovers token --email <email> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Local Food Lovers review and favorites service
#[derive(Parser, Debug)]
#[command(name = "foodlovers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Mint a development bearer token for an email
    Token {
        /// Email claim of the token
        #[arg(long)]
        email: String,

        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
