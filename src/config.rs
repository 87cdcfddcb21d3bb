//! Build configuration module.
//!
//! Handles loading, validating and merging `amp-config.toml`. The file lives at
//! the project root; every key is optional and falls back to the stock
//! defaults. The configuration is loaded once at startup and passed to each
//! stage explicitly.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [base]
//! source_dir = "source"                 # Authored pages, includes, scss, js
//! release_dir = "release"               # Compiled site the TOC is built from
//! template_dir = "templateBaseFiles"    # Scaffold template catalog
//! reports_dir = "reports"               # Temporary report workspace
//! reports_views_dir = "views"           # Report viewer, under reports_dir
//! reports_base_files = "reportsBaseFiles"
//!
//! [templating]
//! choices = ["basic-page.html", "component.html", "module.js"]
//!
//! [toc]
//! placeholder = "<!--toc-->"
//! list_id = "tocList"
//! index_page = "index.html"
//! excluded_segments = ["includes", "bower_components"]
//! quality_fragment = "source/includes/quality-toc.html"
//! order = "discovery"                   # or "path"
//!
//! [quality]
//! validation_report = "reports/validation/html-validation.json"
//! accessibility_report = "reports/accessibility.json"
//! accessibility_dir = "reports/accessibility"
//! report_suffix = "-report-dom.json"
//! page_extension = ".html"
//! view_url = "http://localhost:3000/views"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming;
use crate::walk::WalkOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, relative to the project root.
pub const CONFIG_FILE: &str = "amp-config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `amp-config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project directory layout.
    pub base: BaseConfig,
    /// Scaffold template catalog.
    pub templating: TemplatingConfig,
    /// Table-of-contents generation.
    pub toc: TocConfig,
    /// Report locations and failure markers.
    pub quality: QualityConfig,
}

impl BuildConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toc.placeholder.is_empty() {
            return Err(ConfigError::Validation(
                "toc.placeholder must not be empty".into(),
            ));
        }
        if self.toc.list_id.is_empty() {
            return Err(ConfigError::Validation(
                "toc.list_id must not be empty".into(),
            ));
        }
        if self.quality.report_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "quality.report_suffix must not be empty".into(),
            ));
        }
        if !self.quality.page_extension.starts_with('.') || self.quality.page_extension.len() < 2 {
            return Err(ConfigError::Validation(
                "quality.page_extension must look like \".html\"".into(),
            ));
        }
        for choice in &self.templating.choices {
            if naming::split_extension(choice).is_none() {
                return Err(ConfigError::Validation(format!(
                    "templating.choices entry '{choice}' has no file extension"
                )));
            }
        }
        Ok(())
    }
}

/// Project directory layout. All paths are relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BaseConfig {
    pub source_dir: String,
    pub release_dir: String,
    pub template_dir: String,
    pub reports_dir: String,
    /// Report viewer directory, relative to `reports_dir`.
    pub reports_views_dir: String,
    /// Static files copied into the report viewer.
    pub reports_base_files: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            source_dir: "source".to_string(),
            release_dir: "release".to_string(),
            template_dir: "templateBaseFiles".to_string(),
            reports_dir: "reports".to_string(),
            reports_views_dir: "views".to_string(),
            reports_base_files: "reportsBaseFiles".to_string(),
        }
    }
}

/// Scaffold template catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatingConfig {
    /// Template file names inside `base.template_dir`, in menu order.
    pub choices: Vec<String>,
}

impl Default for TemplatingConfig {
    fn default() -> Self {
        Self {
            choices: vec![
                "basic-page.html".to_string(),
                "component.html".to_string(),
                "module.js".to_string(),
            ],
        }
    }
}

/// Table-of-contents generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Literal marker in the index page replaced by the generated list.
    pub placeholder: String,
    /// `id` attribute of the generated `<ul>`.
    pub list_id: String,
    /// Root index page, relative to the release dir. Never listed.
    pub index_page: String,
    /// A page whose release-relative path contains any of these is not listed.
    pub excluded_segments: Vec<String>,
    /// Navigation fragment appended for the default build, relative to the project root.
    pub quality_fragment: String,
    /// Page ordering in the list.
    pub order: WalkOrder,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            placeholder: "<!--toc-->".to_string(),
            list_id: "tocList".to_string(),
            index_page: "index.html".to_string(),
            excluded_segments: vec!["includes".to_string(), "bower_components".to_string()],
            quality_fragment: "source/includes/quality-toc.html".to_string(),
            order: WalkOrder::Discovery,
        }
    }
}

/// Report locations and the quality gate's viewing URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// Markup validator output.
    pub validation_report: String,
    /// Consolidated accessibility document (aggregator output, gate input).
    pub accessibility_report: String,
    /// Root of the per-page accessibility reports, one subdirectory per section.
    pub accessibility_dir: String,
    /// File name suffix identifying a leaf report.
    pub report_suffix: String,
    /// Extension substituted for the suffix to name the page.
    pub page_extension: String,
    /// Where a failed gate tells the user to look.
    pub view_url: String,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            validation_report: "reports/validation/html-validation.json".to_string(),
            accessibility_report: "reports/accessibility.json".to_string(),
            accessibility_dir: "reports/accessibility".to_string(),
            report_suffix: "-report-dom.json".to_string(),
            page_extension: ".html".to_string(),
            view_url: "http://localhost:3000/views".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to defaults when absent.
pub fn load_config(config_path: &Path) -> Result<BuildConfig, ConfigError> {
    resolve_config(load_raw_config(config_path)?)
}

/// Returns a fully-commented stock `amp-config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# amp-build configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the project root. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Directory layout
# ---------------------------------------------------------------------------
[base]
# Authored pages, includes and assets.
source_dir = "source"
# Compiled site; the table of contents is built from here.
release_dir = "release"
# Scaffold templates listed under [templating].
template_dir = "templateBaseFiles"
# Temporary report workspace, removed after a passing quality gate.
reports_dir = "reports"
# Report viewer directory inside reports_dir.
reports_views_dir = "views"
# Static files copied into the report viewer.
reports_base_files = "reportsBaseFiles"

# ---------------------------------------------------------------------------
# Scaffolding
# ---------------------------------------------------------------------------
[templating]
# Template file names, in menu order. The extension becomes the new file's.
choices = ["basic-page.html", "component.html", "module.js"]

# ---------------------------------------------------------------------------
# Table of contents
# ---------------------------------------------------------------------------
[toc]
# Marker in the index page replaced by the generated list (once).
placeholder = "<!--toc-->"
# id of the generated <ul>.
list_id = "tocList"
# Root index page, relative to release_dir. Never listed.
index_page = "index.html"
# Pages whose path (relative to release_dir) contains any of these are not listed.
excluded_segments = ["includes", "bower_components"]
# Appended after the list for the default build only.
quality_fragment = "source/includes/quality-toc.html"
# "discovery" keeps filesystem order, "path" sorts by file name.
order = "discovery"

# ---------------------------------------------------------------------------
# Quality reports
# ---------------------------------------------------------------------------
[quality]
# Markup validator output; ":false" anywhere marks a failure.
validation_report = "reports/validation/html-validation.json"
# Consolidated accessibility document; "ERROR" anywhere marks a failure.
accessibility_report = "reports/accessibility.json"
# Per-page accessibility reports, one subdirectory per section.
accessibility_dir = "reports/accessibility"
# Leaf report naming: <page><report_suffix> describes <page><page_extension>.
report_suffix = "-report-dom.json"
page_extension = ".html"
# Shown when the gate fails.
view_url = "http://localhost:3000/views"
"##
}
