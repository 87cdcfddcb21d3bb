//! # amp-build
//!
//! Build extensions for a static front-end pipeline. Style compilation,
//! minification, sprites and the validators themselves are handled by
//! external tools; this crate holds the pieces with real logic of their own:
//!
//! ```text
//! new       templateBaseFiles/  →  source/<target>.<ext>   (scaffold a page or module)
//! toc       release/**/*.html   →  release/index.html      (navigation list injected)
//! aggregate reports/accessibility/<section>/*-report-dom.json
//!                               →  reports/accessibility.json
//! gate      validation + accessibility reports → pass (clean up) / fail (halt)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | Recursive file listing with include predicates and walk ordering |
//! | [`naming`] | Scaffold target, template extension and leaf report naming rules |
//! | [`scaffold`] | Template catalog, collision check and scaffold generation |
//! | [`toc`] | Page discovery, title extraction, TOC markup and placeholder injection |
//! | [`gate`] | Pass/fail decision over the markup and accessibility reports |
//! | [`aggregate`] | Per-page accessibility reports folded into one document |
//! | [`pipeline`] | `Project` context and the stage order of each build variant |
//! | [`config`] | `amp-config.toml` loading, defaults, merging and validation |
//! | [`types`] | Records shared between stages and output (`PageRecord`, `SectionReport`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Configuration Is Loaded Once
//!
//! `amp-config.toml` is read at startup into an immutable [`config::BuildConfig`]
//! and handed to each stage through [`pipeline::Project`]. No stage re-reads it.
//!
//! ## Typed Report Document
//!
//! The consolidated accessibility document is built as a `Vec<SectionReport>`
//! and serialized once with `serde_json`, so its brackets and commas are
//! always balanced. Leaf reports that are not valid JSON stop the run.
//!
//! ## Select, Then Generate
//!
//! Scaffolding checks for collisions before asking which template to use,
//! and generation takes the chosen template as a parameter. The CLI prompt
//! sits between the two calls instead of resuming a queued task.
//!
//! ## Markup Through Maud
//!
//! The table of contents is rendered with [Maud](https://maud.lambda.xyz/),
//! so page titles are escaped on the way into the index page.

pub mod aggregate;
pub mod config;
pub mod gate;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scaffold;
pub mod toc;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
