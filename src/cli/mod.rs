//! CLI module for querycost
//!
//! Provides command-line interface for:
//! - score: Print the complexity score of a search body
//! - explain: Print the score breakdown of a search body

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{handle_request, run, run_command, run_command_to, Config, ResponseMode};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_json_to};
