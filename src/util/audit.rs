//! Audit logging for write operations.
//!
//! Provides [`AuditLogger`] which writes NDJSON events to a log file so that
//! every change made to evidence can be accounted for. Repairs record one
//! `header_patch` event per changed byte, followed by a `file_write` for the
//! output file; `corrupt` records its patches and the backup it took.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::Local;
use fs2::FileExt;
use serde::Serialize;

use crate::forensic::repair::BytePatch;
use crate::HexdetError;

/// A single audit log event, serialized as tagged NDJSON.
#[derive(Serialize)]
#[serde(tag = "event")]
pub enum AuditEvent {
    /// Emitted once at the start of a CLI invocation.
    #[serde(rename = "session_start")]
    SessionStart {
        timestamp: String,
        args: Vec<String>,
        version: String,
    },

    /// Emitted for every header byte whose value was changed.
    #[serde(rename = "header_patch")]
    HeaderPatch {
        timestamp: String,
        file: String,
        operation: String,
        offset: usize,
        old: u8,
        new: u8,
    },

    /// Emitted when a whole file is written (repair output).
    #[serde(rename = "file_write")]
    FileWrite {
        timestamp: String,
        file: String,
        operation: String,
        bytes_written: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_type: Option<String>,
    },

    /// Emitted when a backup file is created.
    #[serde(rename = "backup_created")]
    BackupCreated {
        timestamp: String,
        source: String,
        backup_path: String,
    },

    /// Emitted once at the end of a CLI invocation.
    #[serde(rename = "session_end")]
    SessionEnd {
        timestamp: String,
        duration_ms: u64,
        bytes_patched: u64,
        files_written: u64,
    },
}

struct AuditLoggerInner {
    file: File,
    bytes_patched: u64,
    files_written: u64,
}

/// Thread-safe audit logger that appends NDJSON events to a file.
///
/// File-level locking (via `fs2`) keeps lines intact when several processes
/// share one log.
pub struct AuditLogger {
    inner: Mutex<AuditLoggerInner>,
    start: Instant,
}

impl AuditLogger {
    /// Open (or create) the audit log file in append mode.
    pub fn open(path: &str) -> Result<Self, HexdetError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| HexdetError::Io(format!("Cannot open audit log {}: {}", path, e)))?;

        Ok(Self {
            inner: Mutex::new(AuditLoggerInner {
                file,
                bytes_patched: 0,
                files_written: 0,
            }),
            start: Instant::now(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, AuditLoggerInner>, HexdetError> {
        self.inner
            .lock()
            .map_err(|_| HexdetError::Io("Audit log mutex poisoned".to_string()))
    }

    /// Emit a single audit event as one NDJSON line.
    pub fn emit(&self, event: &AuditEvent) -> Result<(), HexdetError> {
        let line = serde_json::to_string(event)
            .map_err(|e| HexdetError::Parse(format!("Audit JSON error: {}", e)))?;

        let mut inner = self.lock()?;
        inner
            .file
            .lock_exclusive()
            .map_err(|e| HexdetError::Io(format!("Audit log lock error: {}", e)))?;
        writeln!(inner.file, "{}", line)
            .map_err(|e| HexdetError::Io(format!("Audit log write error: {}", e)))?;
        inner
            .file
            .flush()
            .map_err(|e| HexdetError::Io(format!("Audit log flush error: {}", e)))?;
        FileExt::unlock(&inner.file)
            .map_err(|e| HexdetError::Io(format!("Audit log unlock error: {}", e)))?;

        Ok(())
    }

    /// Emit a `session_start` event.
    pub fn start_session(&self, args: Vec<String>) -> Result<(), HexdetError> {
        self.emit(&AuditEvent::SessionStart {
            timestamp: now(),
            args,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Emit a `session_end` event with accumulated counters.
    pub fn end_session(&self) -> Result<(), HexdetError> {
        let inner = self.lock()?;
        let duration_ms = self.start.elapsed().as_millis() as u64;
        let event = AuditEvent::SessionEnd {
            timestamp: now(),
            duration_ms,
            bytes_patched: inner.bytes_patched,
            files_written: inner.files_written,
        };
        drop(inner);
        self.emit(&event)
    }

    /// Log every patched byte of one operation.
    pub fn log_patches(
        &self,
        file: &str,
        operation: &str,
        patches: &[BytePatch],
    ) -> Result<(), HexdetError> {
        for patch in patches {
            self.emit(&AuditEvent::HeaderPatch {
                timestamp: now(),
                file: file.to_string(),
                operation: operation.to_string(),
                offset: patch.offset,
                old: patch.old,
                new: patch.new,
            })?;
            self.lock()?.bytes_patched += 1;
        }
        Ok(())
    }

    /// Log a whole-file write.
    pub fn log_file_write(
        &self,
        file: &str,
        operation: &str,
        bytes_written: u64,
        file_type: Option<&str>,
    ) -> Result<(), HexdetError> {
        self.emit(&AuditEvent::FileWrite {
            timestamp: now(),
            file: file.to_string(),
            operation: operation.to_string(),
            bytes_written,
            file_type: file_type.map(str::to_string),
        })?;
        self.lock()?.files_written += 1;
        Ok(())
    }

    /// Log a backup file creation.
    pub fn log_backup(&self, source: &str, backup_path: &str) -> Result<(), HexdetError> {
        self.emit(&AuditEvent::BackupCreated {
            timestamp: now(),
            source: source.to_string(),
            backup_path: backup_path.to_string(),
        })
    }
}

fn now() -> String {
    Local::now().to_rfc3339()
}
