//! CLI module
//!
//! Command-line interface for the RocketReserver API.
//!
//! # Commands
//!
//! - `launches` - List launches page by page
//! - `details` - Show one launch
//! - `login` - Obtain a session token
//! - `book` / `cancel` - Change a booking

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
