use std::io::Write;

use colored::Colorize;

use crate::cli::{write_json, wprintln};
use crate::forensic::repair::{CorruptionReport, HeaderRepairEngine};
use crate::util::hex::format_spaced;
use crate::HexdetError;

/// Options for the `hexdet diagnose` subcommand.
pub struct DiagnoseOptions {
    /// Path to the evidence file.
    pub file: String,
    /// Expected type name.
    pub file_type: String,
    /// Emit output as JSON.
    pub json: bool,
}

/// Print a corruption report in the per-byte text layout.
pub(crate) fn print_report(
    report: &CorruptionReport,
    writer: &mut dyn Write,
) -> Result<(), HexdetError> {
    wprintln!(writer, "Diagnosis for {}:", report.file_type)?;
    wprintln!(writer, "  Expected: {}", format_spaced(&report.expected))?;
    wprintln!(writer, "  Actual:   {}", format_spaced(&report.actual))?;
    wprintln!(writer)?;

    if report.is_clean() {
        wprintln!(writer, "  {}", "No corruption detected in header!".green())?;
        return Ok(());
    }

    for m in &report.mismatches {
        let actual = match m.actual {
            Some(b) => format!("{:02x}", b),
            None => "N/A".to_string(),
        };
        wprintln!(
            writer,
            "  Byte {}: {} should be {:02x}",
            m.offset,
            actual.red(),
            m.expected
        )?;
    }
    wprintln!(
        writer,
        "  {} of {} header bytes corrupted",
        report.mismatches.len(),
        report.expected.len()
    )?;
    Ok(())
}

/// Compare a file's header against the canonical signature for a type.
pub fn execute(opts: &DiagnoseOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let mut engine = HeaderRepairEngine::open(&opts.file);
    if let Some(e) = engine.take_load_error() {
        return Err(e);
    }

    let report = engine.diagnose(&opts.file_type)?;

    if opts.json {
        return write_json(writer, &report);
    }
    print_report(&report, writer)
}
