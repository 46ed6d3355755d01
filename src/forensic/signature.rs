//! Magic signature tables.
//!
//! Two tables live in this module and are deliberately kept apart:
//!
//! - [`CATALOG`] is the lenient detection catalog. It may hold several
//!   variants per format (GIF87a and GIF89a) and signatures of overlapping
//!   lengths; [`detect`] resolves collisions by longest match.
//! - [`FileType`] is the repair table: exactly one canonical header per
//!   supported format. Repair only ever writes one of these.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::forensic::text::{looks_like_text, DEFAULT_SAMPLE_SIZE};
use crate::HexdetError;

/// A named magic byte pattern, matched as an exact prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub magic: &'static [u8],
    pub label: &'static str,
}

impl Signature {
    pub const fn new(magic: &'static [u8], label: &'static str) -> Self {
        Signature { magic, label }
    }

    /// True when `data` starts with this signature's bytes.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.starts_with(self.magic)
    }
}

/// Detection catalog, in declaration order.
///
/// Equal-length collisions are broken by this order: the earlier entry wins.
pub const CATALOG: &[Signature] = &[
    Signature::new(b"\x89PNG\r\n\x1a\n", "PNG"),
    Signature::new(b"\xff\xd8\xff", "JPEG"),
    Signature::new(b"GIF87a", "GIF"),
    Signature::new(b"GIF89a", "GIF"),
    Signature::new(b"%PDF", "PDF"),
    Signature::new(b"PK\x03\x04", "ZIP"),
    Signature::new(b"\x7fELF", "ELF (Linux Executable)"),
    Signature::new(b"MZ", "PE/EXE (Windows Executable)"),
    Signature::new(b"RIFF", "RIFF (WAV/AVI)"),
    Signature::new(b"ID3", "MP3 (ID3 Tag)"),
    Signature::new(b"\xff\xfb", "MP3 (Frame Sync)"),
    Signature::new(b"SQLite format 3", "SQLite Database"),
    Signature::new(b"<!DOCTYPE", "HTML"),
    Signature::new(b"<?xml", "XML"),
];

/// Label used when the text heuristic accepts the buffer.
pub const TEXT_LABEL: &str = "Text/ASCII";
/// Label used when nothing matches.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Result of running detection over a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detection {
    /// A catalog signature matched.
    Signature(&'static Signature),
    /// No signature matched, but the content looks like printable text.
    Text,
    /// Nothing matched.
    #[default]
    Unknown,
}

impl Detection {
    pub fn label(&self) -> &'static str {
        match self {
            Detection::Signature(sig) => sig.label,
            Detection::Text => TEXT_LABEL,
            Detection::Unknown => UNKNOWN_LABEL,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Detection::Unknown)
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Detection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Find the longest catalog signature that prefixes `data`.
///
/// Ties are won by the entry declared first in [`CATALOG`].
pub fn longest_match(data: &[u8]) -> Option<&'static Signature> {
    let mut best: Option<&'static Signature> = None;
    for sig in CATALOG {
        if !sig.matches(data) {
            continue;
        }
        match best {
            Some(b) if b.magic.len() >= sig.magic.len() => {}
            _ => best = Some(sig),
        }
    }
    best
}

/// Identify `data` by signature, falling back to the text heuristic.
pub fn detect(data: &[u8]) -> Detection {
    if let Some(sig) = longest_match(data) {
        return Detection::Signature(sig);
    }
    if looks_like_text(data, DEFAULT_SAMPLE_SIZE) {
        Detection::Text
    } else {
        Detection::Unknown
    }
}

/// Formats that header repair can restore, each with one canonical signature.
///
/// Variant order is the table order used by verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "JPEG")]
    Jpeg,
    #[serde(rename = "GIF")]
    Gif,
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "ZIP")]
    Zip,
}

impl FileType {
    /// Every repairable type, in table order.
    pub const ALL: [FileType; 5] = [
        FileType::Png,
        FileType::Jpeg,
        FileType::Gif,
        FileType::Pdf,
        FileType::Zip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FileType::Png => "PNG",
            FileType::Jpeg => "JPEG",
            FileType::Gif => "GIF",
            FileType::Pdf => "PDF",
            FileType::Zip => "ZIP",
        }
    }

    /// The header bytes written by repair.
    pub fn signature(self) -> &'static [u8] {
        match self {
            FileType::Png => &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            FileType::Jpeg => &[0xFF, 0xD8, 0xFF, 0xE0],
            FileType::Gif => b"GIF89a",
            FileType::Pdf => b"%PDF-1.4",
            FileType::Zip => &[0x50, 0x4B, 0x03, 0x04],
        }
    }

    /// First type in table order whose canonical signature prefixes `data`.
    pub fn from_header(data: &[u8]) -> Option<FileType> {
        FileType::ALL
            .into_iter()
            .find(|t| data.starts_with(t.signature()))
    }

    /// Comma-separated list of supported names, for messages.
    pub fn supported_names() -> String {
        FileType::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileType {
    type Err = HexdetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PNG" => Ok(FileType::Png),
            "JPEG" | "JPG" => Ok(FileType::Jpeg),
            "GIF" => Ok(FileType::Gif),
            "PDF" => Ok(FileType::Pdf),
            "ZIP" => Ok(FileType::Zip),
            _ => Err(HexdetError::UnsupportedType(s.to_string())),
        }
    }
}
