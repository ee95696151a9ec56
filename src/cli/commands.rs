//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RocketReserver command-line client
#[derive(Parser, Debug)]
#[command(name = "rocket-reserver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint (overrides the config file)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Session token from a previous login
    #[arg(long, global = true, env = "ROCKET_RESERVER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List launches, following pages until the end
    Launches {
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Show one launch
    Details {
        /// Launch id
        id: String,
    },

    /// Log in and print the session token
    Login {
        /// Email address
        email: String,
    },

    /// Book a seat on a launch (requires --token)
    Book {
        /// Launch id
        id: String,
    },

    /// Cancel a booking (requires --token)
    Cancel {
        /// Launch id
        id: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
