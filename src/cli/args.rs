//! CLI argument definitions using clap
//!
//! Commands:
//! - querycost score [--config <path>] [--input <path>]
//! - querycost explain [--config <path>] [--input <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// querycost - estimate the cost of a search request before running it
#[derive(Parser, Debug)]
#[command(name = "querycost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the complexity score of a search body
    Score {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read the search body from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Show where the score of a search body comes from
    Explain {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read the search body from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
