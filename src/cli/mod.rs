//! CLI subcommand implementations for the `hexdet` binary.
//!
//! CLI argument parsing uses clap derive macros, with the top-level
//! [`app::Cli`] struct and [`app::Commands`] enum defined in [`app`] and
//! shared between `main.rs` and `build.rs` (for man page generation) via
//! `include!()`.
//!
//! Each subcommand module follows the same pattern: an `Options` struct
//! holding the parsed arguments and a
//! `pub fn execute(opts, writer) -> Result<(), HexdetError>` entry point. The
//! `writer: &mut dyn Write` parameter lets tests capture output and lets the
//! global `--output` flag redirect it to a file.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `hexdet analyze` | [`analyze`] | Type detection plus the full analysis report |
//! | `hexdet scan` | [`scan`] | Parallel analysis of an evidence directory with a summary table |
//! | `hexdet strings` | [`strings`] | Printable string extraction with keyword highlighting |
//! | `hexdet dump` | [`dump`] | Hex dump of a byte range |
//! | `hexdet diagnose` | [`diagnose`] | Per-byte comparison against a canonical header |
//! | `hexdet repair` | [`repair`] | Header repair, auto-repair and post-repair verification |
//! | `hexdet verify` | [`verify`] | Identify the canonical header a file starts with |
//! | `hexdet corrupt` | [`corrupt`] | Damage header bytes to build test evidence |
//!
//! Progress bars (via [`indicatif`]) are displayed while `scan` works through
//! a directory. The `wprintln!` macro wraps `writeln!` to convert
//! `io::Error` into `HexdetError`.

pub mod analyze;
pub mod app;
pub mod corrupt;
pub mod diagnose;
pub mod dump;
pub mod repair;
pub mod scan;
pub mod strings;
pub mod verify;

/// Write a line to the given writer, converting io::Error to HexdetError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::HexdetError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::HexdetError::Io(e.to_string()))
    };
}

pub(crate) use wprintln;

use std::io::Write;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::HexdetError;

/// Create a styled progress bar for iterating over files.
pub(crate) fn create_progress_bar(count: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(count);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{eta}})",
            unit
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Serialize `value` as pretty JSON and write it as one block.
pub(crate) fn write_json<T: Serialize>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), HexdetError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HexdetError::Parse(format!("JSON serialization error: {}", e)))?;
    wprintln!(writer, "{}", json)
}
