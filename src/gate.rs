//! The quality gate: pass/fail on the markup and accessibility reports.
//!
//! Both validators run in "force" mode, so they always finish and leave their
//! reports behind. The gate reads those reports afterwards and decides:
//!
//! | validation report has `:false` | accessibility report has `ERROR` | result |
//! |---|---|---|
//! | no | no | pass, report workspace removed |
//! | yes | any | fail |
//! | any | yes | fail |
//!
//! There is no warning level. A failure stops the build and points the user
//! at the report viewer.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marks a failed check anywhere in the markup validation report.
pub const VALIDATION_FAILURE_MARKER: &str = ":false";
/// Marks a failed check anywhere in the accessibility report.
pub const ACCESSIBILITY_FAILURE_MARKER: &str = "ERROR";

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Cannot read report {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot remove report workspace {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "Quality gate failed (validation errors: {validation}, accessibility errors: {accessibility}).\n\
         There were validation and/or accessibility errors found in your code.\n\
         You can view them at {view_url}"
    )]
    Failed {
        validation: bool,
        accessibility: bool,
        view_url: String,
    },
}

/// The two inputs the verdict depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QualityFlags {
    pub validation_error: bool,
    pub accessibility_error: bool,
}

impl QualityFlags {
    pub fn from_reports(validation_report: &str, accessibility_report: &str) -> Self {
        Self {
            validation_error: validation_report.contains(VALIDATION_FAILURE_MARKER),
            accessibility_error: accessibility_report.contains(ACCESSIBILITY_FAILURE_MARKER),
        }
    }

    pub fn failed(self) -> bool {
        self.validation_error || self.accessibility_error
    }
}

/// Where the gate reads from and what it cleans up.
#[derive(Debug, Clone)]
pub struct QualityGate {
    pub validation_report: PathBuf,
    pub accessibility_report: PathBuf,
    /// Temporary report workspace removed on a pass.
    pub workspace: PathBuf,
    pub view_url: String,
}

/// A passing verdict.
#[derive(Debug)]
pub struct GateOutcome {
    pub flags: QualityFlags,
    /// The removed workspace, if it existed.
    pub cleaned: Option<PathBuf>,
}

impl QualityGate {
    /// Read both reports and decide. A pass removes the report workspace.
    pub fn evaluate(&self) -> Result<GateOutcome, GateError> {
        let validation = read_report(&self.validation_report)?;
        let accessibility = read_report(&self.accessibility_report)?;
        let flags = QualityFlags::from_reports(&validation, &accessibility);

        if flags.failed() {
            return Err(GateError::Failed {
                validation: flags.validation_error,
                accessibility: flags.accessibility_error,
                view_url: self.view_url.clone(),
            });
        }

        let cleaned = remove_workspace(&self.workspace)?;
        Ok(GateOutcome { flags, cleaned })
    }
}

/// Both markers are ASCII, so a report with stray non-UTF-8 bytes is decoded
/// lossily and still searched.
fn read_report(path: &Path) -> Result<String, GateError> {
    let bytes = fs::read(path).map_err(|source| GateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn remove_workspace(path: &Path) -> Result<Option<PathBuf>, GateError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(GateError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    fn gate(root: &Path) -> QualityGate {
        QualityGate {
            validation_report: root.join("reports/validation/html-validation.json"),
            accessibility_report: root.join("reports/accessibility.json"),
            workspace: root.join("reports"),
            view_url: "http://localhost:3000/views".to_string(),
        }
    }

    fn write_reports(root: &Path, validation: &str, accessibility: &str) {
        write_file(root, "reports/validation/html-validation.json", validation);
        write_file(root, "reports/accessibility.json", accessibility);
    }

    #[test]
    fn flags_truth_table() {
        let cases = [
            ("{\"passed\":true}", "[]", false, false),
            ("{\"passed\":false}", "[]", true, false),
            ("{\"passed\":true}", "[{\"type\":\"ERROR\"}]", false, true),
            ("{\"passed\":false}", "ERROR", true, true),
        ];
        for (validation, accessibility, v, a) in cases {
            let flags = QualityFlags::from_reports(validation, accessibility);
            assert_eq!(flags.validation_error, v, "{validation}");
            assert_eq!(flags.accessibility_error, a, "{accessibility}");
            assert_eq!(flags.failed(), v || a);
        }
    }

    #[test]
    fn markers_are_case_sensitive_substrings() {
        let flags = QualityFlags::from_reports("{\"ok\": false}", "error: none");
        assert!(!flags.failed());
    }

    #[test]
    fn passing_reports_clean_up_workspace() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path(), "{\"passed\":true}", "[]");

        let outcome = gate(tmp.path()).evaluate().unwrap();
        assert!(!outcome.flags.failed());
        assert_eq!(outcome.cleaned, Some(tmp.path().join("reports")));
        assert!(!tmp.path().join("reports").exists());
    }

    #[test]
    fn validation_failure_halts_and_keeps_reports() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path(), "{\"file\":\"a.html\",\"passed\":false}", "[]");

        let err = gate(tmp.path()).evaluate().unwrap_err();
        assert!(matches!(
            err,
            GateError::Failed {
                validation: true,
                accessibility: false,
                ..
            }
        ));
        assert!(tmp.path().join("reports").exists());
    }

    #[test]
    fn failure_message_names_flags_and_viewer() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path(), "{}", "ERROR: missing alt");

        let message = gate(tmp.path()).evaluate().unwrap_err().to_string();
        assert!(message.contains("validation errors: false"));
        assert!(message.contains("accessibility errors: true"));
        assert!(message.contains("http://localhost:3000/views"));
    }

    #[test]
    fn non_utf8_report_still_fails_on_marker() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path(), "", "[]");
        fs::write(
            tmp.path().join("reports/validation/html-validation.json"),
            b"{\"msg\":\"caf\xe9\",\"passed\":false}",
        )
        .unwrap();

        let message = gate(tmp.path()).evaluate().unwrap_err().to_string();
        assert!(message.contains("validation errors: true"));
        assert!(message.contains("http://localhost:3000/views"));
    }

    #[test]
    fn missing_report_is_read_error() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "reports/accessibility.json", "[]");
        assert!(matches!(
            gate(tmp.path()).evaluate(),
            Err(GateError::Read { .. })
        ));
    }

    #[test]
    fn workspace_outside_reports_may_be_absent() {
        let tmp = TempDir::new().unwrap();
        write_reports(tmp.path(), "[]", "[]");
        let mut gate = gate(tmp.path());
        gate.workspace = tmp.path().join("scratch");

        let outcome = gate.evaluate().unwrap();
        assert_eq!(outcome.cleaned, None);
        assert!(tmp.path().join("reports").exists());
    }
}
