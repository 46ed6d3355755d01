use std::io::Write;

use colored::Colorize;

use crate::cli::{write_json, wprintln};
use crate::forensic::inspector::FileInspector;
use crate::HexdetError;

/// Options for the `hexdet analyze` subcommand.
pub struct AnalyzeOptions {
    /// Path to the evidence file.
    pub file: String,
    /// Emit output as JSON.
    pub json: bool,
}

/// Load one file, detect its type and print the analysis report.
pub fn execute(opts: &AnalyzeOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let mut inspector = FileInspector::new();
    let loaded = inspector.load(&opts.file)?;
    let detected = inspector.detect_type();

    if opts.json {
        return write_json(writer, &inspector.summary());
    }

    wprintln!(writer, "Loaded {} bytes from {}", loaded, opts.file)?;
    if detected.is_unknown() {
        wprintln!(writer, "{}", "No known signature matched.".yellow())?;
    }
    inspector.report(writer)
}
