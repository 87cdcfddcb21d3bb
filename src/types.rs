//! Shared types passed between the build extensions and the CLI output.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A page listed in the table of contents.
///
/// Lives only for the duration of one TOC pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Absolute (or root-joined) path of the generated page.
    pub path: std::path::PathBuf,
    /// Text of the page's `<title>`, empty if it has none.
    pub title: String,
    /// Site-relative path with forward slashes, e.g. `/products/detail.html`.
    pub web_path: String,
}

/// One page's accessibility findings inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// Page file name derived from the leaf report name.
    pub file: String,
    /// Leaf report content, kept as opaque JSON.
    pub report: serde_json::Value,
}

/// A top-level grouping of the accessibility reports tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: String,
    #[serde(rename = "fileData")]
    pub file_data: Vec<FileReport>,
}

/// Named build flavours. They differ only in which optional stages wrap the
/// core: the default build links the quality reports from the TOC, `qa`
/// produces and gates on those reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BuildVariant {
    #[default]
    Default,
    Dev,
    Qa,
    Prod,
}

impl BuildVariant {
    /// Whether the TOC gets the quality-report navigation fragment appended.
    pub fn appends_quality_fragment(self) -> bool {
        self == BuildVariant::Default
    }

    /// Whether the build runs the report stages and the quality gate.
    pub fn runs_reports(self) -> bool {
        self == BuildVariant::Qa
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildVariant::Default => "default",
            BuildVariant::Dev => "dev",
            BuildVariant::Qa => "qa",
            BuildVariant::Prod => "prod",
        }
    }
}
