//! Header diagnosis and repair.
//!
//! [`HeaderRepairEngine`] owns a mutable copy of one file. It compares the
//! leading bytes against a canonical signature from the repair table
//! ([`FileType`]), patches them in place, and writes the full buffer to a
//! new file. The buffer is never grown: on a file shorter than the
//! signature only the positions that exist are written.
//!
//! Auto-repair picks the target type from partial evidence in the buffer.
//! Heuristics are applied in priority order, first match wins:
//!
//! 1. **PNG** -- first byte is `0x89`, or `IHDR` appears anywhere, or `IDAT`
//!    appears in the first 1000 bytes
//! 2. **JPEG** -- the buffer ends with the `FF D9` end-of-image marker
//! 3. **PDF** -- `%%EOF` or `/Type` appears anywhere
//! 4. **ZIP** -- `PK` appears in the first 100 bytes
//!
//! These are pattern matches, not proofs; a text file mentioning `/Type`
//! will be treated as a PDF.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::forensic::buffer;
use crate::forensic::signature::FileType;
use crate::util::hex::format_spaced;
use crate::HexdetError;

/// Bytes read from a file by [`HeaderRepairEngine::verify`].
pub const VERIFY_READ_LEN: usize = 16;

const PNG_IDAT_WINDOW: usize = 1000;
const ZIP_MARKER_WINDOW: usize = 100;
const JPEG_EOI: &[u8] = &[0xFF, 0xD9];

/// One header byte that disagrees with the canonical signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteMismatch {
    pub offset: usize,
    pub expected: u8,
    /// `None` when the buffer ends before this offset.
    pub actual: Option<u8>,
}

/// Result of comparing a buffer's header against one canonical signature.
#[derive(Debug, Clone, Serialize)]
pub struct CorruptionReport {
    pub file_type: FileType,
    #[serde(serialize_with = "serialize_hex")]
    pub expected: Vec<u8>,
    #[serde(serialize_with = "serialize_hex")]
    pub actual: Vec<u8>,
    pub mismatches: Vec<ByteMismatch>,
}

impl CorruptionReport {
    /// True when the header already matches the signature.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// A single byte changed by a repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BytePatch {
    pub offset: usize,
    pub old: u8,
    pub new: u8,
}

/// Result of a successful repair.
#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    pub file_type: FileType,
    pub output_path: PathBuf,
    /// Bytes whose value changed, in offset order.
    pub patches: Vec<BytePatch>,
    /// Size of the written file, always equal to the input size.
    pub bytes_written: usize,
}

fn serialize_hex<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_spaced(bytes))
}

/// Mutable, owned buffer for header repair.
#[derive(Debug)]
pub struct HeaderRepairEngine {
    source: PathBuf,
    data: Vec<u8>,
    load_error: Option<HexdetError>,
}

impl HeaderRepairEngine {
    /// Load `path` eagerly.
    ///
    /// A load failure is not fatal: the engine holds an empty buffer and the
    /// error is available from [`load_error`](Self::load_error).
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let source = path.as_ref().to_path_buf();
        match buffer::read_all(&source) {
            Ok(data) => HeaderRepairEngine {
                source,
                data,
                load_error: None,
            },
            Err(e) => HeaderRepairEngine {
                source,
                data: Vec::new(),
                load_error: Some(e),
            },
        }
    }

    /// Build an engine over bytes already in memory. `source` is only used
    /// to derive default output paths.
    pub fn from_bytes<P: AsRef<Path>>(source: P, data: Vec<u8>) -> Self {
        HeaderRepairEngine {
            source: source.as_ref().to_path_buf(),
            data,
            load_error: None,
        }
    }

    pub fn load_error(&self) -> Option<&HexdetError> {
        self.load_error.as_ref()
    }

    /// Move the load error out, leaving `None` behind.
    pub fn take_load_error(&mut self) -> Option<HexdetError> {
        self.load_error.take()
    }

    pub fn source(&self) -> &Path {
        &self.source
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

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Compare the buffer's leading bytes against the canonical signature
    /// for `type_name`.
    pub fn diagnose(&self, type_name: &str) -> Result<CorruptionReport, HexdetError> {
        let file_type: FileType = type_name.parse()?;
        Ok(self.diagnose_type(file_type))
    }

    /// [`diagnose`](Self::diagnose) for an already-resolved type.
    pub fn diagnose_type(&self, file_type: FileType) -> CorruptionReport {
        let signature = file_type.signature();
        let mismatches = signature
            .iter()
            .enumerate()
            .filter_map(|(offset, &expected)| {
                let actual = self.data.get(offset).copied();
                (actual != Some(expected)).then_some(ByteMismatch {
                    offset,
                    expected,
                    actual,
                })
            })
            .collect();

        CorruptionReport {
            file_type,
            expected: signature.to_vec(),
            actual: self.data[..signature.len().min(self.data.len())].to_vec(),
            mismatches,
        }
    }

    /// Patch the header with the canonical signature for `type_name` and
    /// write the whole buffer to `output_path` (or a derived `_repaired` path).
    pub fn repair(
        &mut self,
        type_name: &str,
        output_path: Option<&Path>,
    ) -> Result<RepairOutcome, HexdetError> {
        let file_type: FileType = type_name.parse()?;
        self.repair_type(file_type, output_path)
    }

    /// [`repair`](Self::repair) for an already-resolved type.
    pub fn repair_type(
        &mut self,
        file_type: FileType,
        output_path: Option<&Path>,
    ) -> Result<RepairOutcome, HexdetError> {
        if self.data.is_empty() {
            return Err(HexdetError::EmptyBuffer);
        }

        let output_path = match output_path {
            Some(p) => p.to_path_buf(),
            None => derive_output_path(&self.source),
        };

        // The buffer only takes the patch once the output is on disk.
        let mut patched = self.data.clone();
        let patches = apply_signature(&mut patched, file_type);
        buffer::write_all(&output_path, &patched)?;
        self.data = patched;

        Ok(RepairOutcome {
            file_type,
            output_path,
            patches,
            bytes_written: self.data.len(),
        })
    }

    /// Overwrite the in-bounds header positions in memory and record what
    /// changed. Nothing is written to disk.
    pub fn patch_header(&mut self, file_type: FileType) -> Vec<BytePatch> {
        apply_signature(&mut self.data, file_type)
    }

    /// Check which canonical signature the file at `path` starts with.
    ///
    /// Reads at most [`VERIFY_READ_LEN`] bytes and walks the repair table in
    /// order. `Ok(None)` means no signature matched.
    pub fn verify<P: AsRef<Path>>(path: P) -> Result<Option<FileType>, HexdetError> {
        let header = buffer::read_prefix(path.as_ref(), VERIFY_READ_LEN)?;
        Ok(FileType::from_header(&header))
    }

    /// Guess the intended type from partial evidence in the buffer.
    pub fn guess_type(&self) -> Option<FileType> {
        let data = &self.data;
        let png_sig = FileType::Png.signature();

        if data.first() == Some(&png_sig[0])
            || contains(data, b"IHDR")
            || contains(&data[..data.len().min(PNG_IDAT_WINDOW)], b"IDAT")
        {
            return Some(FileType::Png);
        }

        if data.ends_with(JPEG_EOI) {
            return Some(FileType::Jpeg);
        }

        if contains(data, b"%%EOF") || contains(data, b"/Type") {
            return Some(FileType::Pdf);
        }

        if contains(&data[..data.len().min(ZIP_MARKER_WINDOW)], b"PK") {
            return Some(FileType::Zip);
        }

        None
    }

    /// Pick a type with [`guess_type`](Self::guess_type) and repair to it.
    ///
    /// Returns [`HexdetError::Undetected`] without touching the buffer when
    /// no heuristic fires.
    pub fn auto_repair(&mut self, output_path: Option<&Path>) -> Result<RepairOutcome, HexdetError> {
        let file_type = self.guess_type().ok_or(HexdetError::Undetected)?;
        self.repair_type(file_type, output_path)
    }
}

/// Write the canonical signature over the in-bounds prefix of `data`,
/// returning the bytes whose value changed.
fn apply_signature(data: &mut [u8], file_type: FileType) -> Vec<BytePatch> {
    let mut patches = Vec::new();
    for (offset, (slot, &new)) in data.iter_mut().zip(file_type.signature()).enumerate() {
        if *slot != new {
            patches.push(BytePatch {
                offset,
                old: *slot,
                new,
            });
        }
        *slot = new;
    }
    patches
}

/// Insert `_repaired` before the extension of `source`.
///
/// `evidence/photo.png` becomes `evidence/photo_repaired.png`; a path with no
/// extension gets the suffix appended to the whole name.
pub fn derive_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{}_repaired.{}", stem, ext.to_string_lossy()),
        None => format!("{}_repaired", stem),
    };
    source.with_file_name(name)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
