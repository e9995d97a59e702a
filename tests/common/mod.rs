//! Common test utilities for pugc integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

/// Command for the built pugc binary.
pub fn pugc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pugc"))
}

/// Write a file, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Count occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
