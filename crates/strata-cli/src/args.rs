//! Command-line argument definitions for the Strata CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the layout
//! orientation, configuration file selection, and logging verbosity.

use clap::Parser;

use strata::Orientation;

/// Command-line arguments for the Strata layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON snapshot
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output layout JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Flow direction (tb, lr); overrides the configuration file
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
