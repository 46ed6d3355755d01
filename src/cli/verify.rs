//! CLI implementation for the `hexdet verify` subcommand.
//!
//! Reads the first 16 bytes of a file and reports which canonical repair
//! signature (PNG, JPEG, GIF, PDF, ZIP) they start with. Unlike `analyze`,
//! only the strict repair table is consulted.

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{write_json, wprintln};
use crate::forensic::buffer;
use crate::forensic::repair::VERIFY_READ_LEN;
use crate::forensic::signature::FileType;
use crate::util::hex::format_spaced;
use crate::HexdetError;

/// Options for the `hexdet verify` subcommand.
pub struct VerifyOptions {
    /// Path to the file to verify.
    pub file: String,
    /// Emit output as JSON.
    pub json: bool,
}

#[derive(Serialize)]
struct VerifyReport {
    file: String,
    header: String,
    file_type: String,
    valid: bool,
}

/// Report which canonical signature a file starts with.
pub fn execute(opts: &VerifyOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let header = buffer::read_prefix(Path::new(&opts.file), VERIFY_READ_LEN)?;
    let verified = FileType::from_header(&header);

    let report = VerifyReport {
        file: opts.file.clone(),
        header: format_spaced(&header),
        file_type: verified.map_or("Unknown", |t| t.name()).to_string(),
        valid: verified.is_some(),
    };

    if opts.json {
        return write_json(writer, &report);
    }

    wprintln!(writer, "Verification: {}", report.file)?;
    wprintln!(writer, "  Header: {}", report.header)?;
    if report.valid {
        wprintln!(writer, "  Type:   {}", report.file_type.green())?;
    } else {
        wprintln!(writer, "  Type:   {}", report.file_type.yellow())?;
    }
    Ok(())
}
