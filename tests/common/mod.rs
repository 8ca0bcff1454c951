//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::{
    fs,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Root of the checked-in fixture tree.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Copies the fixture tree into a fresh temporary work directory.
pub fn stage_workspace() -> TempDir {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let src = fixtures_dir();
    for entry in walkdir::WalkDir::new(&src) {
        let entry = entry.expect("walk fixtures");
        let rel = entry.path().strip_prefix(&src).expect("fixture prefix");
        let dest = tmp.path().join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).expect("create fixture dir");
        } else {
            fs::copy(entry.path(), &dest).expect("copy fixture");
        }
    }
    tmp
}

/// Sorted entry names of a zip held in memory.
pub fn zip_entries(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Content of a single zip entry.
pub fn zip_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut entry = archive.by_name(name).expect("entry present");
    assert_eq!(entry.compression(), zip::CompressionMethod::Stored, "{name} must be stored");
    let mut data = Vec::new();
    entry.read_to_end(&mut data).expect("read entry");
    data
}

/// Module archives written into `dir`.
pub fn module_archives(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read work dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("magisk_module_") && n.ends_with(".zip"))
        })
        .collect();
    found.sort();
    found
}
