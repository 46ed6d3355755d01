//! Raw file loading.
//!
//! Whole-file and prefix reads that classify failures into
//! [`HexdetError::NotFound`], [`HexdetError::PermissionDenied`] or
//! [`HexdetError::Io`]. File handles never outlive the call.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::HexdetError;

/// Map an I/O error on `path` to the matching [`HexdetError`] kind.
pub fn classify_io_error(path: &Path, err: &io::Error) -> HexdetError {
    match err.kind() {
        io::ErrorKind::NotFound => HexdetError::NotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => {
            HexdetError::PermissionDenied(path.display().to_string())
        }
        _ => HexdetError::Io(format!("{}: {}", path.display(), err)),
    }
}

/// Read the whole file at `path` into memory.
pub fn read_all(path: &Path) -> Result<Vec<u8>, HexdetError> {
    fs::read(path).map_err(|e| classify_io_error(path, &e))
}

/// Read at most `limit` bytes from the start of `path`.
pub fn read_prefix(path: &Path, limit: usize) -> Result<Vec<u8>, HexdetError> {
    let file = File::open(path).map_err(|e| classify_io_error(path, &e))?;
    let mut buf = Vec::with_capacity(limit);
    file.take(limit as u64)
        .read_to_end(&mut buf)
        .map_err(|e| classify_io_error(path, &e))?;
    Ok(buf)
}

/// Write `data` to `path`, creating or truncating it.
pub fn write_all(path: &Path, data: &[u8]) -> Result<(), HexdetError> {
    fs::write(path, data).map_err(|e| classify_io_error(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_all(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, HexdetError::NotFound(_)));
    }

    #[test]
    fn test_read_prefix_limits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, (0u8..64).collect::<Vec<_>>()).unwrap();

        assert_eq!(read_prefix(&path, 16).unwrap(), (0u8..16).collect::<Vec<_>>());
        assert_eq!(read_prefix(&path, 1000).unwrap().len(), 64);
    }

    #[test]
    fn test_write_into_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = write_all(&dir.path().join("a/b/out.bin"), b"x").unwrap_err();
        assert!(matches!(err, HexdetError::NotFound(_)));
    }
}
