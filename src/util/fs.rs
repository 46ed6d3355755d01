//! Filesystem helpers for evidence discovery and backups.
//!
//! Provides [`find_evidence_files`] to collect the files of an evidence
//! directory (used by `scan`) and [`create_backup`] to copy a file aside
//! before it is modified in place (used by `corrupt`).

use std::fs;
use std::path::{Path, PathBuf};

use crate::forensic::buffer::classify_io_error;
use crate::HexdetError;

/// Files collected from an evidence directory.
#[derive(Debug, Default)]
pub struct EvidenceListing {
    /// Matching files, sorted by path.
    pub files: Vec<PathBuf>,
    /// Directories or entries that could not be read, sorted by path.
    pub skipped: Vec<(PathBuf, HexdetError)>,
}

/// Find evidence files in a directory and its immediate subdirectories.
///
/// When `extensions` is empty every regular file is returned; otherwise only
/// files whose extension matches one of the entries (case-insensitive).
/// Only a failure to read `dir` itself is an error; unreadable entries and
/// subdirectories end up in [`EvidenceListing::skipped`].
pub fn find_evidence_files(dir: &Path, extensions: &[&str]) -> Result<EvidenceListing, HexdetError> {
    let mut listing = EvidenceListing::default();

    let entries = fs::read_dir(dir)
        .map_err(|e| HexdetError::Io(format!("Cannot read directory {}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                listing.skipped.push((dir.to_path_buf(), classify_io_error(dir, &e)));
                continue;
            }
        };

        if path.is_dir() {
            collect_subdir(&path, extensions, &mut listing);
        } else if has_matching_extension(&path, extensions) {
            listing.files.push(path);
        }
    }

    listing.files.sort();
    listing.skipped.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(listing)
}

fn collect_subdir(dir: &Path, extensions: &[&str], listing: &mut EvidenceListing) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            listing.skipped.push((dir.to_path_buf(), classify_io_error(dir, &e)));
            return;
        }
    };

    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && has_matching_extension(&path, extensions) {
                    listing.files.push(path);
                }
            }
            Err(e) => listing.skipped.push((dir.to_path_buf(), classify_io_error(dir, &e))),
        }
    }
}

fn has_matching_extension(path: &Path, extensions: &[&str]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy();
        extensions.iter().any(|e| ext.eq_ignore_ascii_case(e))
    })
}

/// Create a backup of a file by copying it to `<path>.bak`.
///
/// If `<path>.bak` already exists, tries `.bak.1`, `.bak.2`, etc.
/// Returns the path of the created backup file.
pub fn create_backup(path: &str) -> Result<PathBuf, HexdetError> {
    let src = Path::new(path);
    if !src.exists() {
        return Err(HexdetError::NotFound(path.to_string()));
    }

    let mut backup_path = PathBuf::from(format!("{}.bak", path));
    let mut counter = 1u32;
    while backup_path.exists() {
        backup_path = PathBuf::from(format!("{}.bak.{}", path, counter));
        counter += 1;
        if counter > 999 {
            return Err(HexdetError::Io(format!("Too many backup files for {}", path)));
        }
    }

    fs::copy(src, &backup_path).map_err(|e| {
        HexdetError::Io(format!(
            "Cannot create backup {}: {}",
            backup_path.display(),
            e
        ))
    })?;

    Ok(backup_path)
}
