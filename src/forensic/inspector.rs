//! Read-only analysis of a single evidence buffer.
//!
//! [`FileInspector`] owns one buffer, detects its type against the
//! [`CATALOG`](crate::forensic::signature::CATALOG), extracts strings and
//! renders reports. It never mutates the bytes it holds.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::forensic::buffer;
use crate::forensic::signature::{detect, Detection};
use crate::forensic::strings::extract_strings;
use crate::util::hex::{ascii_preview, format_bytes, format_spaced, render};
use crate::HexdetError;

/// Header bytes shown in reports.
pub const REPORT_HEADER_LEN: usize = 16;
/// Minimum string length used by reports.
pub const REPORT_MIN_STRING: usize = 6;
/// Strings listed in reports.
pub const REPORT_STRING_COUNT: usize = 5;
/// Strings longer than this are truncated in reports.
pub const REPORT_STRING_WIDTH: usize = 50;
/// Hex dump length shown in reports.
pub const REPORT_DUMP_LEN: usize = 64;

/// Serializable summary of an inspection, used for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub file: String,
    pub size: usize,
    pub detected_type: String,
    pub sha256: String,
    pub header_hex: String,
    pub header_ascii: String,
    pub string_count: usize,
    pub strings: Vec<String>,
}

/// Read-only forensic view over one loaded buffer.
#[derive(Debug, Default)]
pub struct FileInspector {
    source: Option<PathBuf>,
    data: Vec<u8>,
    detected: Detection,
}

impl FileInspector {
    /// Create an inspector with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inspector over bytes that are already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        FileInspector {
            source: None,
            data,
            detected: Detection::Unknown,
        }
    }

    /// Load the file at `path`, replacing the current buffer.
    ///
    /// On failure the buffer is left empty and the error is returned; the
    /// inspector stays usable. Returns the number of bytes loaded.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, HexdetError> {
        let path = path.as_ref();
        self.source = Some(path.to_path_buf());
        self.detected = Detection::Unknown;
        match buffer::read_all(path) {
            Ok(data) => {
                self.data = data;
                Ok(self.data.len())
            }
            Err(e) => {
                self.data = Vec::new();
                Err(e)
            }
        }
    }

    /// Path of the last load, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Display name used in reports.
    pub fn display_name(&self) -> String {
        match &self.source {
            Some(p) => p.display().to_string(),
            None => "<memory>".to_string(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The first `n` bytes as space-separated hex (fewer if the buffer is short).
    pub fn header(&self, n: usize) -> String {
        format_spaced(&self.data[..n.min(self.data.len())])
    }

    /// Run detection, cache the result and return it.
    pub fn detect_type(&mut self) -> Detection {
        self.detected = detect(&self.data);
        self.detected
    }

    /// The result of the last [`detect_type`](Self::detect_type) call.
    pub fn detected(&self) -> Detection {
        self.detected
    }

    pub fn extract_strings(&self, min_length: usize) -> Vec<String> {
        extract_strings(&self.data, min_length)
    }

    pub fn hexdump(&self, start: usize, length: usize) -> String {
        render(&self.data, start, length)
    }

    /// SHA-256 of the whole buffer as lowercase hex.
    pub fn sha256(&self) -> String {
        format_bytes(&Sha256::digest(&self.data))
    }

    /// Collect the report data without formatting it.
    pub fn summary(&self) -> InspectionReport {
        let strings = self.extract_strings(REPORT_MIN_STRING);
        let head = &self.data[..REPORT_HEADER_LEN.min(self.data.len())];
        InspectionReport {
            file: self.display_name(),
            size: self.data.len(),
            detected_type: self.detected.label().to_string(),
            sha256: self.sha256(),
            header_hex: format_spaced(head),
            header_ascii: ascii_preview(head),
            string_count: strings.len(),
            strings: strings
                .iter()
                .take(REPORT_STRING_COUNT)
                .map(|s| truncate_display(s, REPORT_STRING_WIDTH))
                .collect(),
        }
    }

    /// Write the human-readable analysis report to `writer`.
    ///
    /// Uses the cached detection; call [`detect_type`](Self::detect_type) first.
    pub fn report(&self, writer: &mut dyn Write) -> Result<(), HexdetError> {
        writer
            .write_all(self.report_text().as_bytes())
            .map_err(|e| HexdetError::Io(e.to_string()))
    }

    /// The analysis report as text, as written by [`report`](Self::report).
    pub fn report_text(&self) -> String {
        let summary = self.summary();
        let rule = "=".repeat(60);
        let mut out = String::new();

        line(&mut out, &rule);
        line(&mut out, format!("Binary Analysis Report: {}", summary.file));
        line(&mut out, &rule);
        line(&mut out, "");
        line(&mut out, format!("File Size: {} bytes", summary.size));
        line(&mut out, format!("Detected Type: {}", summary.detected_type));
        line(&mut out, format!("SHA-256: {}", summary.sha256));
        line(&mut out, "");
        line(&mut out, format!("Header (first {} bytes):", REPORT_HEADER_LEN));
        line(&mut out, format!("  Hex: {}", summary.header_hex));
        line(&mut out, format!("  ASCII: {}", summary.header_ascii));
        line(&mut out, "");

        if summary.strings.is_empty() {
            line(&mut out, "No significant strings found.");
        } else {
            line(
                &mut out,
                format!(
                    "Extracted Strings (first {} of {}):",
                    summary.strings.len(),
                    summary.string_count
                ),
            );
            for s in &summary.strings {
                line(&mut out, format!("  - {}", s));
            }
        }

        line(&mut out, "");
        line(&mut out, format!("Hex Dump (first {} bytes):", REPORT_DUMP_LEN));
        line(&mut out, self.hexdump(0, REPORT_DUMP_LEN));
        line(&mut out, "");
        line(&mut out, &rule);
        out
    }
}

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

/// Cut `s` to `width` characters, appending `...` when anything was removed.
pub fn truncate_display(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let mut out: String = s.chars().take(width).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_short_buffer() {
        let insp = FileInspector::from_bytes(vec![0x50, 0x4b]);
        assert_eq!(insp.header(16), "50 4b");
        assert_eq!(insp.header(0), "");
    }

    #[test]
    fn test_detect_caches_result() {
        let mut insp = FileInspector::from_bytes(b"PK\x03\x04rest".to_vec());
        assert!(insp.detected().is_unknown());
        assert_eq!(insp.detect_type().label(), "ZIP");
        assert_eq!(insp.detected().label(), "ZIP");
    }

    #[test]
    fn test_truncate_display() {
        let long = "x".repeat(60);
        let cut = truncate_display(&long, 50);
        assert_eq!(cut.len(), 53);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_display("short", 50), "short");
        assert_eq!(truncate_display(&"y".repeat(50), 50).len(), 50);
    }

    #[test]
    fn test_report_sections() {
        let mut data = b"\x7fELF\x02\x01\x01\x00".to_vec();
        data.extend_from_slice(&[0u8; 8]);
        data.extend_from_slice(b"/lib64/ld-linux-x86-64.so.2\x00");
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice("A".repeat(80).as_bytes());
        let mut insp = FileInspector::from_bytes(data);
        insp.detect_type();

        let mut out = Vec::new();
        insp.report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Detected Type: ELF (Linux Executable)"));
        assert!(text.contains("  Hex: 7f 45 4c 46 02 01 01 00 00 00 00 00 00 00 00 00"));
        assert!(text.contains("  ASCII: .ELF............"));
        assert!(text.contains("Extracted Strings (first 2 of 2):"));
        assert!(text.contains("  - /lib64/ld-linux-x86-64.so.2"));
        assert!(text.contains(&format!("  - {}...", "A".repeat(50))));
        assert!(text.contains("Hex Dump (first 64 bytes):"));
        assert!(text.contains("00000030  "));
    }

    #[test]
    fn test_report_matches_report_text() {
        let mut insp = FileInspector::from_bytes(b"GIF89a hidden message here".to_vec());
        insp.detect_type();
        let mut out = Vec::new();
        insp.report(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), insp.report_text());
        assert!(insp.report_text().ends_with(&format!("{}\n", "=".repeat(60))));
    }

    #[test]
    fn test_report_empty_buffer() {
        let insp = FileInspector::new();
        let mut out = Vec::new();
        insp.report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("File Size: 0 bytes"));
        assert!(text.contains("Detected Type: Unknown"));
        assert!(text.contains("No significant strings found."));
    }

    #[test]
    fn test_summary_limits_strings() {
        let mut data = Vec::new();
        for i in 0..8 {
            data.extend_from_slice(format!("string-number-{}", i).as_bytes());
            data.push(0);
        }
        let insp = FileInspector::from_bytes(data);
        let summary = insp.summary();
        assert_eq!(summary.string_count, 8);
        assert_eq!(summary.strings.len(), 5);
        assert_eq!(summary.strings[0], "string-number-0");
    }

    #[test]
    fn test_sha256_of_empty() {
        let insp = FileInspector::new();
        assert_eq!(
            insp.sha256(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
