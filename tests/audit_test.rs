#![cfg(feature = "cli")]
//! Integration tests for `--audit-log` on the write commands.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use hexdet::cli::corrupt::{self, CorruptOptions};
use hexdet::cli::repair::{self, RepairOptions};
use hexdet::util::audit::AuditLogger;

fn read_events(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn png_with_damaged_header() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&[0u8; 48]);
    data[0] = 0x00;
    data[3] = 0x00;
    data
}

fn repair_opts(file: &Path, out: &Path, logger: Arc<AuditLogger>) -> RepairOptions {
    RepairOptions {
        file: file.to_str().unwrap().to_string(),
        file_type: Some("png".to_string()),
        auto: false,
        out: Some(out.to_str().unwrap().to_string()),
        dry_run: false,
        verify: true,
        json: false,
        audit_logger: Some(logger),
    }
}

#[test]
fn test_repair_logs_patches_and_write() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.png");
    let output = dir.path().join("fixed.png");
    let log_path = dir.path().join("audit.ndjson");
    fs::write(&input, png_with_damaged_header()).unwrap();

    let logger = Arc::new(AuditLogger::open(log_path.to_str().unwrap()).unwrap());
    logger.start_session(vec!["hexdet".into(), "repair".into()]).unwrap();

    let mut out = Vec::new();
    repair::execute(&repair_opts(&input, &output, logger.clone()), &mut out).unwrap();
    logger.end_session().unwrap();

    let events = read_events(&log_path);
    let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec!["session_start", "header_patch", "header_patch", "file_write", "session_end"]
    );
    assert_eq!(events[1]["offset"], 0);
    assert_eq!(events[1]["new"], 0x89);
    assert_eq!(events[2]["offset"], 3);
    assert_eq!(events[2]["new"], 0x47);
    assert_eq!(events[3]["file_type"], "PNG");
    assert_eq!(events[3]["operation"], "repair");
    assert_eq!(events[4]["bytes_patched"], 2);
    assert_eq!(events[4]["files_written"], 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("--- Phase 3: Verification ---"));
    assert!(text.contains("Repaired file type detection: PNG"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.png");
    let output = dir.path().join("fixed.png");
    let log_path = dir.path().join("audit.ndjson");
    fs::write(&input, png_with_damaged_header()).unwrap();

    let logger = Arc::new(AuditLogger::open(log_path.to_str().unwrap()).unwrap());
    let mut opts = repair_opts(&input, &output, logger);
    opts.dry_run = true;

    let mut out = Vec::new();
    repair::execute(&opts, &mut out).unwrap();

    assert!(!output.exists());
    assert!(read_events(&log_path).is_empty());
    assert!(String::from_utf8(out).unwrap().contains("Dry run: would patch 2 header bytes"));
}

#[test]
fn test_corrupt_logs_backup_and_patches() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("sample.zip");
    let log_path = dir.path().join("audit.ndjson");
    fs::write(&target, b"PK\x03\x04\x14\x00rest-of-archive").unwrap();

    let logger = Arc::new(AuditLogger::open(log_path.to_str().unwrap()).unwrap());
    let opts = CorruptOptions {
        file: target.to_str().unwrap().to_string(),
        bytes: 4,
        offset: 0,
        zero: true,
        no_backup: false,
        audit_logger: Some(logger),
    };

    let mut out = Vec::new();
    corrupt::execute(&opts, &mut out).unwrap();

    let data = fs::read(&target).unwrap();
    assert_eq!(&data[..4], &[0, 0, 0, 0]);
    let backup = dir.path().join("sample.zip.bak");
    assert_eq!(fs::read(&backup).unwrap()[..2], *b"PK");

    let events = read_events(&log_path);
    let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "backup_created",
            "header_patch",
            "header_patch",
            "header_patch",
            "header_patch",
            "file_write"
        ]
    );
    assert_eq!(events[5]["operation"], "corrupt");
}
