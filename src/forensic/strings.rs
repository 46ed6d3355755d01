//! Printable string extraction.
//!
//! A single left-to-right pass over the buffer. Consecutive printable bytes
//! (`0x20..=0x7E`) form a run; any other byte ends it. Runs shorter than the
//! minimum length are dropped. Tabs and newlines end a run here even though
//! the text heuristic accepts them.

use serde::Serialize;

use crate::forensic::text::is_printable;

/// Minimum run length used when the caller does not choose one.
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// A printable run and the offset of its first byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundString {
    pub offset: usize,
    pub text: String,
}

/// Extract every printable run of at least `min_length` bytes, with offsets.
pub fn scan_strings(data: &[u8], min_length: usize) -> Vec<FoundString> {
    let mut found = Vec::new();
    let mut start = 0usize;
    let mut run = String::new();

    for (i, &byte) in data.iter().enumerate() {
        if is_printable(byte) {
            if run.is_empty() {
                start = i;
            }
            run.push(byte as char);
        } else {
            flush(&mut found, &mut run, start, min_length);
        }
    }
    flush(&mut found, &mut run, start, min_length);

    found
}

fn flush(found: &mut Vec<FoundString>, run: &mut String, start: usize, min_length: usize) {
    if !run.is_empty() && run.len() >= min_length {
        found.push(FoundString {
            offset: start,
            text: std::mem::take(run),
        });
    } else {
        run.clear();
    }
}

/// Extract every printable run of at least `min_length` bytes.
pub fn extract_strings(data: &[u8], min_length: usize) -> Vec<String> {
    scan_strings(data, min_length)
        .into_iter()
        .map(|s| s.text)
        .collect()
}
