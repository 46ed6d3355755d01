use std::io::Write;
use std::path::Path;

use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::{create_progress_bar, write_json, wprintln};
use crate::forensic::inspector::FileInspector;
use crate::forensic::signature::{TEXT_LABEL, UNKNOWN_LABEL};
use crate::util::fs::find_evidence_files;
use crate::HexdetError;

/// Options for the `hexdet scan` subcommand.
pub struct ScanOptions {
    /// Evidence directory.
    pub dir: String,
    /// Extension filter; empty means every file.
    pub extensions: Vec<String>,
    /// Print the full report for each file.
    pub verbose: bool,
    /// Emit output as JSON.
    pub json: bool,
}

#[derive(Serialize)]
struct ScanReport {
    dir: String,
    files: Vec<FileScanResult>,
    summary: ScanSummary,
}

#[derive(Serialize, Clone)]
struct FileScanResult {
    file: String,
    size: usize,
    detected_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    report: Option<String>,
}

#[derive(Serialize)]
struct ScanSummary {
    total_files: usize,
    identified: usize,
    text: usize,
    unknown: usize,
    errors: usize,
}

fn display_path(path: &Path, dir: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Analyze one file; load failures are captured rather than returned so the
/// batch keeps going.
fn scan_file(path: &Path, dir: &Path, verbose: bool) -> FileScanResult {
    let display = display_path(path, dir);

    let mut inspector = FileInspector::new();
    if let Err(e) = inspector.load(path) {
        return FileScanResult {
            file: display,
            size: 0,
            detected_type: inspector.detected().label().to_string(),
            error: Some(e.to_string()),
            report: None,
        };
    }
    let detected = inspector.detect_type();

    let report = verbose.then(|| inspector.report_text());

    FileScanResult {
        file: display,
        size: inspector.len(),
        detected_type: detected.label().to_string(),
        error: None,
        report,
    }
}

/// Analyze every evidence file in a directory and print a summary table.
pub fn execute(opts: &ScanOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let dir = Path::new(&opts.dir);
    if !dir.is_dir() {
        return Err(HexdetError::Argument(format!(
            "Evidence directory does not exist: {}",
            opts.dir
        )));
    }

    let extensions: Vec<&str> = opts.extensions.iter().map(String::as_str).collect();
    let listing = find_evidence_files(dir, &extensions)?;
    let files = listing.files;

    let pb = if !opts.json && files.len() > 1 {
        Some(create_progress_bar(files.len() as u64, "files"))
    } else {
        None
    };

    let mut results: Vec<FileScanResult> = files
        .par_iter()
        .map(|path| {
            let r = scan_file(path, dir, opts.verbose && !opts.json);
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            r
        })
        .collect();

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    results.extend(listing.skipped.into_iter().map(|(path, e)| FileScanResult {
        file: display_path(&path, dir),
        size: 0,
        detected_type: UNKNOWN_LABEL.to_string(),
        error: Some(e.to_string()),
        report: None,
    }));

    results.sort_by(|a, b| a.file.cmp(&b.file));

    let errors = results.iter().filter(|r| r.error.is_some()).count();
    let text = results
        .iter()
        .filter(|r| r.error.is_none() && r.detected_type == TEXT_LABEL)
        .count();
    let unknown = results
        .iter()
        .filter(|r| r.error.is_none() && r.detected_type == UNKNOWN_LABEL)
        .count();
    let summary = ScanSummary {
        total_files: results.len(),
        identified: results.len() - errors - text - unknown,
        text,
        unknown,
        errors,
    };

    if opts.json {
        return write_json(
            writer,
            &ScanReport {
                dir: opts.dir.clone(),
                files: results,
                summary,
            },
        );
    }

    if results.is_empty() {
        wprintln!(writer, "No evidence files found in {}", opts.dir)?;
        return Ok(());
    }

    if opts.verbose {
        for r in &results {
            if let Some(ref report) = r.report {
                wprintln!(writer, "{}", "─".repeat(70))?;
                wprintln!(writer, "{}", report.trim_end())?;
            }
        }
        wprintln!(writer)?;
    }

    wprintln!(writer, "{}", "=".repeat(70))?;
    wprintln!(writer, " Evidence Summary: {}", opts.dir)?;
    wprintln!(writer, "{}", "=".repeat(70))?;
    wprintln!(writer)?;
    wprintln!(writer, "{:<25} {:>10} {:<20}", "File", "Size", "Detected Type")?;
    wprintln!(writer, "{}", "-".repeat(60))?;
    for r in &results {
        match r.error {
            Some(ref e) => {
                wprintln!(writer, "{:<25} {:>10} {}", r.file, "-", e.yellow())?;
            }
            None => {
                wprintln!(writer, "{:<25} {:>10} {:<20}", r.file, r.size, r.detected_type)?;
            }
        }
    }

    wprintln!(writer)?;
    wprintln!(
        writer,
        "Files: {} ({} identified, {} text, {} unknown{})",
        summary.total_files,
        summary.identified,
        summary.text,
        summary.unknown,
        if summary.errors > 0 {
            format!(
                ", {} error{}",
                summary.errors,
                if summary.errors == 1 { "" } else { "s" }
            )
        } else {
            String::new()
        }
    )?;

    Ok(())
}
