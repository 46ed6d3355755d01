#![cfg(feature = "cli")]
//! Integration tests for the read-only subcommands, driven through their
//! `execute` functions with an in-memory writer.

use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use hexdet::cli::analyze::{self, AnalyzeOptions};
use hexdet::cli::app::{Cli, Commands};
use hexdet::cli::diagnose::{self, DiagnoseOptions};
use hexdet::cli::dump::{self, DumpOptions};
use hexdet::cli::scan::{self, ScanOptions};
use hexdet::cli::strings::{self, StringsOptions};
use hexdet::cli::verify::{self, VerifyOptions};
use hexdet::forensic::strings::DEFAULT_MIN_LENGTH;
use hexdet::HexdetError;

fn path_str(p: &Path) -> String {
    p.to_str().unwrap().to_string()
}

/// Directory with one file per detection outcome.
fn evidence_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend_from_slice(&[0xAA; 40]);
    fs::write(dir.path().join("unknown_a.bin"), &png).unwrap();
    fs::write(dir.path().join("unknown_b.bin"), b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
    fs::write(
        dir.path().join("unknown_c.bin"),
        "INFO service started\nWARN disk at 91%\n".repeat(10),
    )
    .unwrap();
    fs::write(dir.path().join("noise.dat"), [0xF0u8; 64]).unwrap();
    dir
}

fn run_scan(dir: &Path, extensions: Vec<String>, json: bool) -> String {
    let mut out = Vec::new();
    scan::execute(
        &ScanOptions {
            dir: path_str(dir),
            extensions,
            verbose: false,
            json,
        },
        &mut out,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_analyze_json_summary() {
    let dir = evidence_dir();
    let mut out = Vec::new();
    analyze::execute(
        &AnalyzeOptions {
            file: path_str(&dir.path().join("unknown_b.bin")),
            json: true,
        },
        &mut out,
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["detected_type"], "PDF");
    assert_eq!(v["size"], 14);
    assert_eq!(v["sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn test_analyze_missing_file() {
    let mut out = Vec::new();
    let err = analyze::execute(
        &AnalyzeOptions {
            file: "/nonexistent/evidence.bin".to_string(),
            json: false,
        },
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, HexdetError::NotFound(_)));
}

#[test]
fn test_scan_json_classifies_every_file() {
    let dir = evidence_dir();
    let v: serde_json::Value =
        serde_json::from_str(&run_scan(dir.path(), Vec::new(), true)).unwrap();

    let files = v["files"].as_array().unwrap();
    let types: Vec<(&str, &str)> = files
        .iter()
        .map(|f| {
            (
                f["file"].as_str().unwrap(),
                f["detected_type"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        types,
        vec![
            ("noise.dat", "Unknown"),
            ("unknown_a.bin", "PNG"),
            ("unknown_b.bin", "PDF"),
            ("unknown_c.bin", "Text/ASCII"),
        ]
    );
    assert_eq!(v["summary"]["total_files"], 4);
    assert_eq!(v["summary"]["identified"], 2);
    assert_eq!(v["summary"]["text"], 1);
    assert_eq!(v["summary"]["unknown"], 1);
}

#[test]
fn test_scan_extension_filter_and_table() {
    let dir = evidence_dir();
    let text = run_scan(dir.path(), vec!["bin".to_string()], false);
    assert!(text.contains("Evidence Summary"));
    assert!(text.contains("unknown_a.bin"));
    assert!(!text.contains("noise.dat"));
    assert!(text.contains("Files: 3 (2 identified, 1 text, 0 unknown)"));
}

#[test]
fn test_scan_missing_directory() {
    let mut out = Vec::new();
    let err = scan::execute(
        &ScanOptions {
            dir: "/nonexistent/evidence".to_string(),
            extensions: Vec::new(),
            verbose: false,
            json: false,
        },
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, HexdetError::Argument(_)));
}

#[test]
fn test_strings_offsets_and_keywords() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hidden.bin");
    let mut data = vec![0xFFu8; 10];
    data.extend_from_slice(b"HIDDEN_NOTE");
    data.extend_from_slice(&[0x00; 5]);
    data.extend_from_slice(b"plain words");
    fs::write(&path, &data).unwrap();

    let mut out = Vec::new();
    strings::execute(
        &StringsOptions {
            file: path_str(&path),
            min_length: 4,
            offsets: false,
            highlight: Vec::new(),
            json: true,
        },
        &mut out,
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["count"], 2);
    assert_eq!(v["strings"][0]["offset"], 10);
    assert_eq!(v["strings"][0]["highlighted"], true);
    assert_eq!(v["strings"][1]["offset"], 26);
    assert_eq!(v["strings"][1]["highlighted"], false);

    let mut out = Vec::new();
    strings::execute(
        &StringsOptions {
            file: path_str(&path),
            min_length: 4,
            offsets: true,
            highlight: vec!["plain".to_string()],
            json: false,
        },
        &mut out,
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Extracted 2 strings"));
    assert!(text.contains("[1] 0x0000000a HIDDEN_NOTE"));
    assert!(text.contains("** plain words **"));
}

#[test]
fn test_dump_window_and_raw() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.bin");
    let data: Vec<u8> = (0..64u8).collect();
    fs::write(&path, &data).unwrap();

    let mut out = Vec::new();
    dump::execute(
        &DumpOptions {
            file: path_str(&path),
            offset: 16,
            length: 20,
            raw: false,
        },
        &mut out,
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("(20 bytes)"));
    assert!(text.contains("00000010  10 11 12 13"));
    assert!(text.contains("00000020  20 21 22 23"));
    assert!(!text.contains("00000030"));

    let mut out = Vec::new();
    dump::execute(
        &DumpOptions {
            file: path_str(&path),
            offset: 60,
            length: 256,
            raw: true,
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(out, vec![60, 61, 62, 63]);

    let mut out = Vec::new();
    let err = dump::execute(
        &DumpOptions {
            file: path_str(&path),
            offset: 64,
            length: 16,
            raw: false,
        },
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, HexdetError::Argument(_)));
}

#[test]
fn test_diagnose_text_and_unsupported_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photo.jpg");
    fs::write(&path, [0x00, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).unwrap();

    let mut out = Vec::new();
    diagnose::execute(
        &DiagnoseOptions {
            file: path_str(&path),
            file_type: "jpeg".to_string(),
            json: false,
        },
        &mut out,
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Diagnosis for JPEG:"));
    assert!(text.contains("  Expected: ff d8 ff e0"));
    assert!(text.contains("1 of 4 header bytes corrupted"));

    let mut out = Vec::new();
    let err = diagnose::execute(
        &DiagnoseOptions {
            file: path_str(&path),
            file_type: "BMP".to_string(),
            json: false,
        },
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, HexdetError::UnsupportedType(_)));
}

#[test]
fn test_verify_json() {
    let dir = evidence_dir();
    let mut out = Vec::new();
    verify::execute(
        &VerifyOptions {
            file: path_str(&dir.path().join("unknown_a.bin")),
            json: true,
        },
        &mut out,
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["file_type"], "PNG");
    assert_eq!(v["valid"], true);
    assert_eq!(v["header"], "89 50 4e 47 0d 0a 1a 0a aa aa aa aa aa aa aa aa");

    let mut out = Vec::new();
    verify::execute(
        &VerifyOptions {
            file: path_str(&dir.path().join("noise.dat")),
            json: true,
        },
        &mut out,
    )
    .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["file_type"], "Unknown");
    assert_eq!(v["valid"], false);
}

#[test]
fn test_strings_default_min_length() {
    let cli = Cli::try_parse_from(["hexdet", "strings", "-f", "evidence.bin"]).unwrap();
    match cli.command {
        Commands::Strings { min_length, .. } => assert_eq!(min_length, DEFAULT_MIN_LENGTH),
        _ => panic!("expected the strings subcommand"),
    }
}

#[cfg(unix)]
#[test]
fn test_scan_continues_past_unreadable_subdir() {
    use std::os::unix::fs::PermissionsExt;

    let dir = evidence_dir();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner.bin"), b"PK\x03\x04").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores directory modes, in which case the subdirectory is read.
    let unreadable = fs::read_dir(&locked).is_err();
    let mut out = Vec::new();
    let result = scan::execute(
        &ScanOptions {
            dir: path_str(dir.path()),
            extensions: Vec::new(),
            verbose: false,
            json: true,
        },
        &mut out,
    );
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    result.unwrap();

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let files = v["files"].as_array().unwrap();
    let names: Vec<&str> = files.iter().map(|f| f["file"].as_str().unwrap()).collect();
    assert!(names.contains(&"unknown_a.bin"));
    assert!(names.contains(&"unknown_c.bin"));

    if unreadable {
        let row = files.iter().find(|f| f["file"] == "locked").unwrap();
        assert!(row["error"].as_str().unwrap().contains("Permission denied"));
        assert_eq!(v["summary"]["errors"], 1);
        assert_eq!(v["summary"]["identified"], 2);
    }
}

#[cfg(unix)]
#[test]
fn test_scan_error_count_pluralized() {
    let dir = evidence_dir();
    std::os::unix::fs::symlink(dir.path().join("gone1"), dir.path().join("dangling1.bin")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone2"), dir.path().join("dangling2.bin")).unwrap();

    let text = run_scan(dir.path(), vec!["bin".to_string()], false);
    assert!(text.contains("Files: 5 (2 identified, 1 text, 0 unknown, 2 errors)"));
    assert!(text.contains("File not found"));

    fs::remove_file(dir.path().join("dangling2.bin")).unwrap();
    let text = run_scan(dir.path(), vec!["bin".to_string()], false);
    assert!(text.contains("Files: 4 (2 identified, 1 text, 0 unknown, 1 error)"));
}
