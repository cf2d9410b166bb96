//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// weekgrid - your calendar week laid out as a grid
#[derive(Debug, Parser)]
#[command(name = "weekgrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "WEEKGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Week selection ---
    /// Show the week containing this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Shift the shown week by N weeks (negative for past weeks)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub week_offset: i64,

    /// Override the configured timezone (IANA name)
    #[arg(long)]
    pub timezone: Option<String>,

    // --- Input ---
    /// Read events from a JSON file instead of Google Calendar
    #[arg(long)]
    pub events_file: Option<PathBuf>,

    // --- Output ---
    /// Output the computed layout as JSON
    #[arg(long)]
    pub json: bool,

    /// Hide days without events and pixel placement
    #[arg(long)]
    pub compact: bool,

    /// Maximum title length (truncated with ellipsis)
    #[arg(long)]
    pub max_title_length: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration file
    Validate,

    /// Show configuration file path
    Path,
}
