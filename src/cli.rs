//! Command-line interface built on clap.
//!
//! Defines [`Cli`] with the [`Command`] subcommands (run, once, check) and the
//! global flags (--config, --log-file, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Watches homework review status and reports changes to Telegram.
#[derive(Debug, Parser)]
#[command(name = "review-watch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log everything, including state transitions.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Poll forever (the default).
    Run {
        /// Unix timestamp to start from instead of now.
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Poll exactly once and print the outcome.
    Once {
        /// Unix timestamp to start from instead of now.
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Validate the configuration and exit.
    Check,
}

impl Cli {
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run { from_date: None })
    }
}
