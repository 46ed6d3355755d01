//! Binary file forensics toolkit.
//!
//! The `hex-detective` crate (library name `hexdet`) identifies the true type
//! of a file from its magic bytes, pulls printable strings out of binary
//! data, renders byte-exact hex dumps, and repairs files whose header bytes
//! have been damaged so that standard tools recognize them again.
//!
//! # CLI Reference
//!
//! Install the `hexdet` binary and use its subcommands on evidence files.
//!
//! ```text
//! cargo install hex-detective
//! ```
//!
//! ## Subcommands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`hexdet analyze`](cli::app::Commands::Analyze) | Detect the file type and print a full analysis report |
//! | [`hexdet scan`](cli::app::Commands::Scan) | Analyze every file in a directory and print a summary table |
//! | [`hexdet strings`](cli::app::Commands::Strings) | Extract printable strings, optionally highlighting keywords |
//! | [`hexdet dump`](cli::app::Commands::Dump) | Hex dump of a byte range |
//! | [`hexdet diagnose`](cli::app::Commands::Diagnose) | Compare the header against a canonical signature |
//! | [`hexdet repair`](cli::app::Commands::Repair) | Patch the header with a canonical signature (or pick one automatically) |
//! | [`hexdet verify`](cli::app::Commands::Verify) | Check which canonical signature a file starts with |
//! | [`hexdet corrupt`](cli::app::Commands::Corrupt) | Damage header bytes to produce test evidence |
//!
//! ## Global options
//!
//! All subcommands accept `--color <auto|always|never>`, `--output <file>`,
//! `--threads <n>` and `--audit-log <file>`. Reporting subcommands also
//! accept `--json`.
//!
//! # Library API
//!
//! ```no_run
//! use hexdet::forensic::inspector::FileInspector;
//! use hexdet::forensic::repair::HeaderRepairEngine;
//!
//! let mut inspector = FileInspector::new();
//! inspector.load("unknown_a.bin").unwrap();
//! println!("Detected: {}", inspector.detect_type());
//!
//! let mut engine = HeaderRepairEngine::open("corrupted.png");
//! let report = engine.diagnose("PNG").unwrap();
//! if !report.is_clean() {
//!     let outcome = engine.repair("PNG", None).unwrap();
//!     println!("Wrote {}", outcome.output_path.display());
//! }
//! ```
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`forensic::signature`] | Detection catalog (longest match) and the canonical repair table |
//! | [`forensic::text`] | Printable-byte predicates and the plain-text heuristic |
//! | [`forensic::strings`] | Printable string extraction |
//! | [`forensic::buffer`] | Whole-file and prefix loading with error classification |
//! | [`forensic::inspector`] | Read-only analysis and reporting |
//! | [`forensic::repair`] | Header diagnosis, repair, verification and auto-repair |
//! | [`util::hex`] | Hex dump and hex string formatting |
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | on | Builds the `hexdet` binary, audit logging and batch scanning. |

#[cfg(feature = "cli")]
pub mod cli;
pub mod forensic;
pub mod util;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

use thiserror::Error;

/// Errors returned by `hexdet` operations.
#[derive(Error, Debug)]
pub enum HexdetError {
    /// An I/O error other than a missing file or a permission problem.
    #[error("I/O error: {0}")]
    Io(String),

    /// The path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The path exists but cannot be read or written.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A diagnose or repair was requested for a type outside the repair table.
    #[error(
        "Unknown file type: {0} (supported: {supported})",
        supported = crate::forensic::signature::FileType::supported_names()
    )]
    UnsupportedType(String),

    /// A repair was attempted with no loaded data.
    #[error("No data loaded to repair")]
    EmptyBuffer,

    /// Auto-repair found no evidence pointing at any supported type.
    #[error("Could not auto-detect file type")]
    Undetected,

    /// An invalid argument was supplied (bad offset, conflicting options, etc.).
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Serialization or parsing failed.
    #[error("Parse error: {0}")]
    Parse(String),
}
