use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;

use crate::cli::diagnose::print_report;
use crate::cli::{write_json, wprintln};
use crate::forensic::repair::{BytePatch, CorruptionReport, HeaderRepairEngine};
use crate::forensic::signature::FileType;
use crate::util::audit::AuditLogger;
use crate::HexdetError;

/// Options for the `hexdet repair` subcommand.
pub struct RepairOptions {
    /// Path to the corrupted file.
    pub file: String,
    /// Explicit target type.
    pub file_type: Option<String>,
    /// Pick the target type from evidence in the file.
    pub auto: bool,
    /// Destination; defaults to `<name>_repaired.<ext>` next to the input.
    pub out: Option<String>,
    /// Diagnose only.
    pub dry_run: bool,
    /// Verify the written file.
    pub verify: bool,
    /// Emit output as JSON.
    pub json: bool,
    /// Audit logger for recording write operations.
    pub audit_logger: Option<Arc<AuditLogger>>,
}

#[derive(Serialize)]
struct RepairReport {
    file: String,
    file_type: FileType,
    auto_detected: bool,
    dry_run: bool,
    diagnosis: CorruptionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
    patches: Vec<BytePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes_written: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified_type: Option<String>,
}

/// Diagnose, repair and optionally verify a file header.
pub fn execute(opts: &RepairOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    match (&opts.file_type, opts.auto) {
        (Some(_), true) => {
            return Err(HexdetError::Argument(
                "--type and --auto are mutually exclusive".to_string(),
            ));
        }
        (None, false) => {
            return Err(HexdetError::Argument(
                "Either --type or --auto is required".to_string(),
            ));
        }
        _ => {}
    }

    let mut engine = HeaderRepairEngine::open(&opts.file);
    if let Some(e) = engine.take_load_error() {
        return Err(e);
    }
    if !opts.json {
        wprintln!(writer, "Loaded {} bytes from {}", engine.len(), opts.file)?;
    }

    let file_type = match opts.file_type {
        Some(ref name) => name.parse::<FileType>()?,
        None => match engine.guess_type() {
            Some(t) => {
                if !opts.json {
                    wprintln!(writer, "Detected likely {} structure", t)?;
                }
                t
            }
            None => {
                if !opts.json {
                    wprintln!(writer, "{}", "Could not auto-detect file type".yellow())?;
                }
                return Err(HexdetError::Undetected);
            }
        },
    };

    let diagnosis = engine.diagnose_type(file_type);
    if !opts.json {
        wprintln!(writer)?;
        wprintln!(writer, "--- Phase 1: Diagnosis ---")?;
        print_report(&diagnosis, writer)?;
    }

    let mut report = RepairReport {
        file: opts.file.clone(),
        file_type,
        auto_detected: opts.auto,
        dry_run: opts.dry_run,
        diagnosis,
        output_path: None,
        patches: Vec::new(),
        bytes_written: None,
        verified_type: None,
    };

    if report.diagnosis.is_clean() || opts.dry_run {
        if opts.json {
            return write_json(writer, &report);
        }
        wprintln!(writer)?;
        if report.diagnosis.is_clean() {
            wprintln!(writer, "No corruption found - file may already be valid.")?;
        } else {
            wprintln!(
                writer,
                "Dry run: would patch {} header bytes with the {} signature.",
                report.diagnosis.mismatches.len(),
                file_type
            )?;
        }
        return Ok(());
    }

    let out = opts.out.as_deref().map(Path::new);
    let outcome = if opts.auto {
        engine.auto_repair(out)?
    } else {
        engine.repair_type(file_type, out)?
    };
    let output_display = outcome.output_path.display().to_string();

    if let Some(ref logger) = opts.audit_logger {
        let operation = if opts.auto { "auto_repair" } else { "repair" };
        let _ = logger.log_patches(&opts.file, operation, &outcome.patches);
        let _ = logger.log_file_write(
            &output_display,
            operation,
            outcome.bytes_written as u64,
            Some(file_type.name()),
        );
    }

    if !opts.json {
        wprintln!(writer)?;
        wprintln!(writer, "--- Phase 2: Repair ---")?;
        wprintln!(writer, "Patching header with {} signature...", file_type)?;
        for p in &outcome.patches {
            wprintln!(writer, "  Byte {}: {:02x} -> {:02x}", p.offset, p.old, p.new)?;
        }
        wprintln!(writer)?;
        wprintln!(writer, "Repaired file written to: {}", output_display)?;
    }

    report.output_path = Some(output_display);
    report.bytes_written = Some(outcome.bytes_written);
    report.patches = outcome.patches;

    if opts.verify {
        let verified = HeaderRepairEngine::verify(&outcome.output_path)?;
        let label = verified.map_or("Unknown", FileType::name);
        report.verified_type = Some(label.to_string());

        if !opts.json {
            wprintln!(writer)?;
            wprintln!(writer, "--- Phase 3: Verification ---")?;
            wprintln!(writer, "Repaired file type detection: {}", label)?;
            if verified == Some(file_type) {
                wprintln!(
                    writer,
                    "{}",
                    "[SUCCESS] File repair completed successfully!".green()
                )?;
            } else {
                wprintln!(writer, "{}", "[WARNING] Repair may be incomplete".yellow())?;
            }
        }
    }

    if opts.json {
        write_json(writer, &report)?;
    }

    Ok(())
}
