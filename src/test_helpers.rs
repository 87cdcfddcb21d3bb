//! Shared test utilities for the amp-build test suite.
//!
//! Fixtures are built file by file inside a `TempDir`, so each test states
//! exactly the tree it depends on:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(tmp.path(), "release/index.html", "<!--toc-->");
//! write_file(tmp.path(), "release/alpha.html", &page("Alpha"));
//! ```

use std::fs;
use std::path::Path;

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
}

/// Minimal HTML document with the given `<title>`.
pub fn page(title: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>{title}</title></head><body></body></html>")
}

/// Number of regular files under `root`, recursively.
pub fn count_files(root: &Path) -> usize {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}
