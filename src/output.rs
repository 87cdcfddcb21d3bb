//! CLI output formatting for every command.
//!
//! Output is **information-first**: each entity (page, section, template) leads
//! with its positional index and human name, and filesystem paths follow as
//! indented context lines.
//!
//! ## TOC
//!
//! ```text
//! Table of contents
//! 001 Alpha → /alpha.html
//! 002 (untitled.html) → /section/untitled.html
//! Injected into release/index.html
//! ```
//!
//! ## Aggregate
//!
//! ```text
//! Accessibility reports
//! 001 home (1 pages)
//!     001 home.html
//! Wrote reports/accessibility.json
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::aggregate::AggregateOutcome;
use crate::gate::GateOutcome;
use crate::pipeline::StageEvent;
use crate::scaffold::{TemplateCatalog, TemplateDescriptor};
use crate::toc::TocOutcome;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display `path` relative to `base` when possible.
fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Titled pages show their title; untitled ones fall back to the file name.
fn page_label(title: &str, path: &Path) -> String {
    if title.is_empty() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("({name})")
    } else {
        title.to_string()
    }
}

// ============================================================================
// Scaffolding
// ============================================================================

/// Numbered menu of the template catalog.
pub fn format_template_menu(catalog: &TemplateCatalog) -> Vec<String> {
    let mut lines = vec!["Please choose a template type".to_string()];
    for (i, template) in catalog.templates().iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i + 1),
            template.name,
            template.file_name
        ));
    }
    lines
}

pub fn print_template_menu(catalog: &TemplateCatalog) {
    for line in format_template_menu(catalog) {
        println!("{}", line);
    }
}

/// Catalog listing with template sources.
pub fn format_templates(catalog: &TemplateCatalog, root: &Path) -> Vec<String> {
    let mut lines = vec!["Templates".to_string()];
    for (i, template) in catalog.templates().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), template.name));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            display_relative(&template.source, root)
        ));
        if !template.source.is_file() {
            lines.push(format!("{}Missing", indent(1)));
        }
    }
    lines
}

pub fn print_templates(catalog: &TemplateCatalog, root: &Path) {
    for line in format_templates(catalog, root) {
        println!("{}", line);
    }
}

pub fn format_scaffold_output(created: &Path, template: &TemplateDescriptor, root: &Path) -> Vec<String> {
    vec![
        format!("Created {}", display_relative(created, root)),
        format!("{}Template: {}", indent(1), template.file_name),
    ]
}

pub fn print_scaffold_output(created: &Path, template: &TemplateDescriptor, root: &Path) {
    for line in format_scaffold_output(created, template, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Table of contents
// ============================================================================

pub fn format_toc_output(outcome: &TocOutcome, root: &Path, placeholder: &str) -> Vec<String> {
    let mut lines = vec!["Table of contents".to_string()];
    if let Some(mismatch) = outcome.skipped {
        lines.push(format!(
            "Found {} pages but {} titles, table of contents not generated",
            mismatch.pages, mismatch.titles
        ));
        return lines;
    }
    for (i, page) in outcome.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            page_label(&page.title, &page.path),
            page.web_path
        ));
    }
    let index = display_relative(&outcome.index, root);
    if outcome.injected {
        lines.push(format!("Injected into {}", index));
    } else {
        lines.push(format!("No {} placeholder in {}, left unchanged", placeholder, index));
    }
    lines
}

pub fn print_toc_output(outcome: &TocOutcome, root: &Path, placeholder: &str) {
    for line in format_toc_output(outcome, root, placeholder) {
        println!("{}", line);
    }
}

// ============================================================================
// Reports
// ============================================================================

pub fn format_views_output(copied: &[std::path::PathBuf], root: &Path) -> Vec<String> {
    if copied.is_empty() {
        return vec!["No report view files to copy".to_string()];
    }
    let mut lines = vec![format!("Copied {} report view files", copied.len())];
    for path in copied {
        lines.push(format!("{}{}", indent(1), display_relative(path, root)));
    }
    lines
}

pub fn print_views_output(copied: &[std::path::PathBuf], root: &Path) {
    for line in format_views_output(copied, root) {
        println!("{}", line);
    }
}

pub fn format_aggregate_output(outcome: &AggregateOutcome, root: &Path) -> Vec<String> {
    let mut lines = vec!["Accessibility reports".to_string()];
    for (i, section) in outcome.sections.iter().enumerate() {
        lines.push(format!(
            "{} {} ({} pages)",
            format_index(i + 1),
            section.section,
            section.file_data.len()
        ));
        for (j, file) in section.file_data.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(j + 1), file.file));
        }
    }
    lines.push(format!("Wrote {}", display_relative(&outcome.output, root)));
    lines
}

pub fn print_aggregate_output(outcome: &AggregateOutcome, root: &Path) {
    for line in format_aggregate_output(outcome, root) {
        println!("{}", line);
    }
}

pub fn format_gate_output(outcome: &GateOutcome, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Quality gate passed (validation errors: {}, accessibility errors: {})",
        outcome.flags.validation_error, outcome.flags.accessibility_error
    )];
    if let Some(cleaned) = &outcome.cleaned {
        lines.push(format!("{}Removed {}", indent(1), display_relative(cleaned, root)));
    }
    lines
}

pub fn print_gate_output(outcome: &GateOutcome, root: &Path) {
    for line in format_gate_output(outcome, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format one pipeline progress event.
pub fn format_stage_event(event: &StageEvent, root: &Path, placeholder: &str) -> Vec<String> {
    match event {
        StageEvent::Started { position, stage } => {
            vec![format!("==> Stage {}: {}", position, stage.label())]
        }
        StageEvent::TocBuilt(outcome) => format_toc_output(outcome, root, placeholder),
        StageEvent::ViewsPrepared(copied) => format_views_output(copied, root),
        StageEvent::Aggregated(outcome) => format_aggregate_output(outcome, root),
        StageEvent::GatePassed(outcome) => format_gate_output(outcome, root),
    }
}
