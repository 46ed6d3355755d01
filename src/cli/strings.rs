use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{write_json, wprintln};
use crate::forensic::inspector::FileInspector;
use crate::forensic::strings::scan_strings;
use crate::HexdetError;

/// Keywords highlighted when the caller does not supply any.
pub const DEFAULT_KEYWORDS: &[&str] = &["SECRET", "HIDDEN", "MESSAGE", "FINAL", "PASSWORD"];

/// Options for the `hexdet strings` subcommand.
pub struct StringsOptions {
    /// Path to the evidence file.
    pub file: String,
    /// Minimum run length.
    pub min_length: usize,
    /// Prefix each string with its byte offset.
    pub offsets: bool,
    /// Keywords to highlight; empty selects [`DEFAULT_KEYWORDS`].
    pub highlight: Vec<String>,
    /// Emit output as JSON.
    pub json: bool,
}

#[derive(Serialize)]
struct StringsReport {
    file: String,
    min_length: usize,
    count: usize,
    strings: Vec<StringEntry>,
}

#[derive(Serialize)]
struct StringEntry {
    offset: usize,
    text: String,
    highlighted: bool,
}

/// True when `text` contains any keyword, ignoring case.
pub fn matches_keyword(text: &str, keywords: &[String]) -> bool {
    let upper = text.to_uppercase();
    keywords.iter().any(|k| upper.contains(&k.to_uppercase()))
}

/// Extract printable strings and list them, highlighting keyword matches.
pub fn execute(opts: &StringsOptions, writer: &mut dyn Write) -> Result<(), HexdetError> {
    let mut inspector = FileInspector::new();
    inspector.load(&opts.file)?;

    let keywords: Vec<String> = if opts.highlight.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
    } else {
        opts.highlight.clone()
    };

    let entries: Vec<StringEntry> = scan_strings(inspector.data(), opts.min_length)
        .into_iter()
        .map(|s| StringEntry {
            highlighted: matches_keyword(&s.text, &keywords),
            offset: s.offset,
            text: s.text,
        })
        .collect();

    if opts.json {
        return write_json(
            writer,
            &StringsReport {
                file: opts.file.clone(),
                min_length: opts.min_length,
                count: entries.len(),
                strings: entries,
            },
        );
    }

    wprintln!(
        writer,
        "Extracted {} strings from {}:",
        entries.len(),
        opts.file
    )?;
    wprintln!(writer, "{}", "-".repeat(50))?;

    for (i, entry) in entries.iter().enumerate() {
        let location = if opts.offsets {
            format!("0x{:08x} ", entry.offset)
        } else {
            String::new()
        };
        if entry.highlighted {
            wprintln!(
                writer,
                "  [{}] {}{}",
                i + 1,
                location,
                format!("** {} **", entry.text).red().bold()
            )?;
        } else {
            wprintln!(writer, "  [{}] {}{}", i + 1, location, entry.text)?;
        }
    }

    Ok(())
}
