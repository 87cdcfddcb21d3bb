//! Centralized filename conventions.
//!
//! Three naming rules show up across the build extensions:
//!
//! - **Scaffold targets** are given without an extension and may carry
//!   directory segments: `products/detail` → directory `products`, name `detail`.
//! - **Template files** carry the extension the scaffold will get:
//!   `basic-page.html` → name `basic-page`, extension `.html`.
//! - **Leaf accessibility reports** are named after the page they describe:
//!   `home-report-dom.json` → `home.html`.

/// A scaffold target split into its directory part and file name.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetName {
    /// Directory segments joined with `/`. Empty for a root-level target.
    pub dir: String,
    /// Final segment, the file name without extension.
    pub name: String,
}

/// Split a scaffold target like `products/detail` into directory and name.
///
/// Backslashes are treated as separators and leading/trailing slashes are
/// ignored, so `\products\detail` and `/products/detail/` behave the same.
pub fn split_target(target: &str) -> TargetName {
    let normalized = target.replace('\\', "/");
    let trimmed = normalized.trim_matches('/');
    match trimmed.rsplit_once('/') {
        Some((dir, name)) => TargetName {
            dir: dir.to_string(),
            name: name.to_string(),
        },
        None => TargetName {
            dir: String::new(),
            name: trimmed.to_string(),
        },
    }
}

/// Split a file name at its last `.` into `(stem, extension)`.
///
/// The extension keeps its leading dot. Returns `None` when there is no
/// extension or the stem would be empty (`.gitkeep`).
pub fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    let pos = file_name.rfind('.')?;
    if pos == 0 || pos == file_name.len() - 1 {
        return None;
    }
    Some((&file_name[..pos], &file_name[pos..]))
}

/// Derive the page file name a leaf report describes.
///
/// `home-report-dom.json` with suffix `-report-dom.json` and extension
/// `.html` gives `home.html`. Returns `None` if `report_name` does not end
/// with the suffix.
pub fn page_name_for_report(report_name: &str, suffix: &str, page_extension: &str) -> Option<String> {
    report_name
        .strip_suffix(suffix)
        .map(|stem| format!("{stem}{page_extension}"))
}
