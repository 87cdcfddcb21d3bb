//! Consolidation of per-page accessibility reports.
//!
//! The accessibility checker writes one JSON report per page, grouped into
//! section directories:
//!
//! ```text
//! reports/accessibility/
//! ├── home/
//! │   └── home-report-dom.json
//! └── products/
//!     ├── detail-report-dom.json
//!     └── variants/
//!         └── swatch-report-dom.json
//! ```
//!
//! This module folds them into a single document:
//!
//! ```json
//! [
//!   {"section": "home", "fileData": [{"file": "home.html", "report": {...}}]},
//!   {"section": "products", "fileData": [{"file": "detail.html", ...}, {"file": "swatch.html", ...}]}
//! ]
//! ```
//!
//! Sections and files keep discovery order. Leaf content is carried through
//! as opaque JSON; a leaf that does not parse aborts the run and names the file.

use crate::naming;
use crate::types::{FileReport, SectionReport};
use crate::walk::{self, WalkError, WalkOrder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed accessibility report {path}: {source}")]
    MalformedReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot encode consolidated report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How leaf reports are recognized and mapped back to page names.
#[derive(Debug, Clone)]
pub struct LeafNaming {
    /// File name suffix of a leaf report, e.g. `-report-dom.json`.
    pub suffix: String,
    /// Page extension substituted for the suffix, e.g. `.html`.
    pub page_extension: String,
}

/// Summary of a completed aggregation.
#[derive(Debug)]
pub struct AggregateOutcome {
    pub sections: Vec<SectionReport>,
    pub output: PathBuf,
}

impl AggregateOutcome {
    pub fn file_count(&self) -> usize {
        self.sections.iter().map(|s| s.file_data.len()).sum()
    }
}

/// Collect every section under `reports_root` and write the consolidated
/// document to `output`, creating its parent directory.
pub fn aggregate(
    reports_root: &Path,
    output: &Path,
    leaf: &LeafNaming,
) -> Result<AggregateOutcome, AggregateError> {
    let sections = collect_sections(reports_root, leaf)?;
    let document = render_document(&sections)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AggregateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, document).map_err(|source| AggregateError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(AggregateOutcome {
        sections,
        output: output.to_path_buf(),
    })
}

/// Build the in-memory document: one entry per immediate subdirectory.
pub fn collect_sections(
    reports_root: &Path,
    leaf: &LeafNaming,
) -> Result<Vec<SectionReport>, AggregateError> {
    walk::subdirectories(reports_root)?
        .iter()
        .map(|dir| collect_section(dir, leaf))
        .collect()
}

fn collect_section(dir: &Path, leaf: &LeafNaming) -> Result<SectionReport, AggregateError> {
    let section = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let leaves = walk::list_files(dir, WalkOrder::Discovery, |p| {
        leaf_page_name(p, leaf).is_some()
    })?;
    let file_data = leaves
        .iter()
        .map(|path| read_leaf(path, leaf))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SectionReport { section, file_data })
}

fn leaf_page_name(path: &Path, leaf: &LeafNaming) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    naming::page_name_for_report(&name, &leaf.suffix, &leaf.page_extension)
}

/// Parse one leaf report and bind it to the page it describes.
pub fn read_leaf(path: &Path, leaf: &LeafNaming) -> Result<FileReport, AggregateError> {
    let file = leaf_page_name(path, leaf).unwrap_or_default();
    let raw = fs::read(path).map_err(|source| AggregateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let report = serde_json::from_slice(&raw).map_err(|source| AggregateError::MalformedReport {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileReport { file, report })
}

/// Serialize the document in one pass.
pub fn render_document(sections: &[SectionReport]) -> Result<String, AggregateError> {
    Ok(serde_json::to_string(sections)?)
}
