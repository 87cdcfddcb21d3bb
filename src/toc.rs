//! Table-of-contents generation for the release site.
//!
//! After the pages have been compiled into the release directory, every
//! `.html` page except the root index, include fragments and vendor bundles is
//! listed in a single `<ul>` and injected into the index page in place of the
//! placeholder token.
//!
//! ```html
//! <ul id="tocList" role="list">
//!   <li role="listitem"><a href="/products/detail.html">Product Detail</a></li>
//!   ...
//! </ul>
//! <!-- default build only: contents of the quality navigation fragment -->
//! ```
//!
//! Entries follow walk order (see [`crate::walk::WalkOrder`]), not title order.

use crate::config::TocConfig;
use crate::types::{BuildVariant, PageRecord};
use crate::walk::{self, WalkError};
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TocError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Discovered files and extracted titles disagreed in number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMismatch {
    pub pages: usize,
    pub titles: usize,
}

/// Result of one TOC pass.
#[derive(Debug)]
pub struct TocOutcome {
    pub pages: Vec<PageRecord>,
    /// Full generated markup, fragment included.
    pub markup: String,
    pub index: PathBuf,
    /// False when the index page had no placeholder and was left untouched.
    pub injected: bool,
    /// Set when the page/title guard tripped; nothing was rendered or injected.
    pub skipped: Option<CountMismatch>,
}

/// Build the table of contents for `release_dir` and inject it into the index page.
pub fn build_toc(
    release_dir: &Path,
    variant: BuildVariant,
    config: &TocConfig,
    fragment_path: &Path,
) -> Result<TocOutcome, TocError> {
    let index = release_dir.join(&config.index_page);

    let files = discover_pages(release_dir, config)?;
    let titles = files
        .iter()
        .map(|path| read(path).map(|html| extract_title(&html)))
        .collect::<Result<Vec<_>, _>>()?;
    let pages = match pair_pages(release_dir, &files, titles) {
        Ok(pages) => pages,
        Err(mismatch) => {
            return Ok(TocOutcome {
                pages: Vec::new(),
                markup: String::new(),
                index,
                injected: false,
                skipped: Some(mismatch),
            });
        }
    };

    let fragment = if variant.appends_quality_fragment() {
        Some(read(fragment_path)?)
    } else {
        None
    };
    let markup = render_toc(&pages, &config.list_id, fragment.as_deref()).into_string();

    let content = read(&index)?;
    let injected = match inject_placeholder(&content, &config.placeholder, &markup) {
        Some(updated) => {
            fs::write(&index, updated).map_err(|source| TocError::Write {
                path: index.clone(),
                source,
            })?;
            true
        }
        None => false,
    };

    Ok(TocOutcome {
        pages,
        markup,
        index,
        injected,
        skipped: None,
    })
}

/// List the pages that belong in the table of contents.
pub fn discover_pages(release_dir: &Path, config: &TocConfig) -> Result<Vec<PathBuf>, TocError> {
    let index = release_dir.join(&config.index_page);
    let pages = walk::list_files(release_dir, config.order, |path| {
        path.to_string_lossy().ends_with(".html")
            && path != index.as_path()
            && !walk::relative_path_contains(release_dir, path, &config.excluded_segments)
    })?;
    Ok(pages)
}

/// Zip discovered files with their titles into page records.
///
/// The two lists come from the same walk, so a length mismatch means
/// something upstream is broken. The caller skips the stage instead of
/// injecting a partial list.
pub fn pair_pages(
    release_dir: &Path,
    files: &[PathBuf],
    titles: Vec<String>,
) -> Result<Vec<PageRecord>, CountMismatch> {
    if files.len() != titles.len() {
        return Err(CountMismatch {
            pages: files.len(),
            titles: titles.len(),
        });
    }
    Ok(files
        .iter()
        .zip(titles)
        .map(|(path, title)| PageRecord {
            path: path.clone(),
            title,
            web_path: web_path(release_dir, path),
        })
        .collect())
}

/// Site-relative path of `path` with forward slashes and a leading `/`.
pub fn web_path(release_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(release_dir).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined.replace('\\', "/"))
}

/// Text content of the first `<title>` element, or an empty string.
///
/// Entities are decoded; surrounding whitespace is trimmed.
pub fn extract_title(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find("<title") {
        let tag_start = from + pos;
        let after_name = tag_start + "<title".len();
        match lower.as_bytes().get(after_name) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => {}
            _ => {
                from = after_name;
                continue;
            }
        }
        let Some(open_end) = lower[after_name..].find('>') else {
            return String::new();
        };
        let text_start = after_name + open_end + 1;
        let Some(close) = lower[text_start..].find("</title") else {
            return String::new();
        };
        return decode_entities(html[text_start..text_start + close].trim());
    }
    String::new()
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render the page list, followed by `fragment` verbatim when given.
pub fn render_toc(pages: &[PageRecord], list_id: &str, fragment: Option<&str>) -> Markup {
    html! {
        ul id=(list_id) role="list" {
            @for page in pages {
                li role="listitem" {
                    a href=(page.web_path) { (page.title) }
                }
            }
        }
        @if let Some(fragment) = fragment {
            (PreEscaped(fragment))
        }
    }
}

/// Replace the first occurrence of `placeholder` in `content` with `markup`.
///
/// Returns `None` when the placeholder is absent, so callers leave the
/// original bytes alone.
pub fn inject_placeholder(content: &str, placeholder: &str, markup: &str) -> Option<String> {
    if placeholder.is_empty() || !content.contains(placeholder) {
        return None;
    }
    Some(content.replacen(placeholder, markup, 1))
}

/// Read a page as text. Invalid UTF-8 is replaced rather than rejected, so one
/// Latin-1 page does not stop the stage.
fn read(path: &Path) -> Result<String, TocError> {
    let bytes = fs::read(path).map_err(|source| TocError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
