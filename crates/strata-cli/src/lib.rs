//! CLI logic for the Strata layout tool.
//!
//! This module contains the core CLI logic: load configuration, read a JSON
//! snapshot, lay it out and write the layout as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use strata::{LayoutBuilder, StrataError};

/// Run the Strata CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StrataError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed snapshots
/// - Invalid graphs (duplicate ids, dangling connections)
pub fn run(args: &Args) -> Result<(), StrataError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing snapshot"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let orientation = args
        .orientation
        .unwrap_or_else(|| app_config.layout().orientation());

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    let builder = LayoutBuilder::new(app_config);
    let snapshot = builder.parse(&source)?;
    let layout = builder.layout(&snapshot, orientation)?;
    builder.write_json(&layout, &args.output)?;

    info!(output_file = args.output, nodes = layout.nodes().len(); "Layout exported successfully");

    Ok(())
}
