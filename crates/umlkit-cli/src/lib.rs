//! umlkit CLI library
//!
//! This module contains the core CLI logic: replaying a session script on the
//! reference canvas and exporting the resulting diagram.

pub mod error_adapter;
pub mod session;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::fs;

use log::info;

use umlkit::{UmlError, UmlModeler, canvas::Canvas};

use session::{Replay, Session};

/// Run the umlkit CLI application
///
/// Replays the session script on a fresh canvas with the UML extension
/// installed and writes the resulting diagram as SVG to the output file.
///
/// # Errors
///
/// Returns `UmlError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed session scripts or failing steps
pub fn run(args: &Args) -> Result<(), UmlError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Replaying session"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;
    let session = Session::parse(&source)?;

    let modeler = UmlModeler::new(app_config)?;
    let mut canvas = Canvas::new();
    modeler.install(&mut canvas);

    Replay::new(&mut canvas).run(&session)?;

    modeler.export_svg(canvas.elements(), &args.output)?;
    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
