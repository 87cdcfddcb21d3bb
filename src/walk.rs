//! Recursive directory listing.
//!
//! The TOC builder, the scaffold collision check and the report aggregator all
//! need "every file under this directory that matches X". Walks are
//! synchronous and fully collected before anything downstream looks at the
//! result.
//!
//! ## Ordering
//!
//! [`WalkOrder::Discovery`] keeps whatever order the filesystem hands back,
//! which is what the consolidated accessibility document promises. It is not
//! stable across platforms, so consumers that want reproducible output can
//! ask for [`WalkOrder::Path`] instead (entries sorted by file name at every
//! level, giving depth-first path order).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Order in which walked entries are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkOrder {
    /// Filesystem enumeration order.
    #[default]
    Discovery,
    /// Sorted by file name within each directory.
    Path,
}

/// List every regular file under `root` (recursively) accepted by `include`.
///
/// The root itself is never yielded. Symlinks are not followed.
pub fn list_files<F>(root: &Path, order: WalkOrder, mut include: F) -> Result<Vec<PathBuf>, WalkError>
where
    F: FnMut(&Path) -> bool,
{
    let mut walker = WalkDir::new(root).min_depth(1);
    if order == WalkOrder::Path {
        walker = walker.sort_by_file_name();
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            WalkError::Walk { path, source }
        })?;
        if entry.file_type().is_file() && include(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Immediate subdirectories of `root`, in discovery order.
pub fn subdirectories(root: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let read_err = |source| WalkError::ReadDir {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

/// Whether the path of `path` relative to `root` contains any of `needles`.
///
/// This is a plain substring test on the `/`-joined relative path, so
/// `includes` excludes `includes/nav.html` and `my-includes.html` alike.
/// Components of `root` itself never match.
pub fn relative_path_contains(root: &Path, path: &Path, needles: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    needles
        .iter()
        .any(|n| !n.is_empty() && joined.contains(n.as_str()))
}
