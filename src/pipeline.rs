//! Project context and the fixed stage order of the build extensions.
//!
//! A [`Project`] pairs the project root with the configuration loaded once at
//! startup; every stage receives it explicitly. [`run_build`] runs the stages a
//! build variant needs, in order:
//!
//! ```text
//! default / dev / prod:  toc
//! qa:                    toc → prepare-reports → aggregate → gate
//! ```
//!
//! Compilation, minification and the validators themselves happen outside this
//! crate; the stages here assume their outputs are already on disk.

use crate::aggregate::{self, AggregateError, AggregateOutcome, LeafNaming};
use crate::config::{self, BuildConfig, ConfigError};
use crate::gate::{GateError, GateOutcome, QualityGate};
use crate::scaffold::{ScaffoldError, TemplateCatalog};
use crate::toc::{self, TocError, TocOutcome};
use crate::types::BuildVariant;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Toc(#[from] TocError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("Cannot {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Project root plus its loaded configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: BuildConfig,
}

impl Project {
    /// Load `config_file` (relative to `root` unless absolute).
    pub fn load(root: &Path, config_file: &Path) -> Result<Self, PipelineError> {
        let config = config::load_config(&root.join(config_file))?;
        Ok(Self::new(root, config))
    }

    pub fn new(root: &Path, config: BuildConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// Resolve a configured path against the project root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.path(&self.config.base.source_dir)
    }

    pub fn release_dir(&self) -> PathBuf {
        self.path(&self.config.base.release_dir)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.path(&self.config.base.reports_dir)
    }

    pub fn reports_views_dir(&self) -> PathBuf {
        self.reports_dir().join(&self.config.base.reports_views_dir)
    }

    pub fn catalog(&self) -> Result<TemplateCatalog, ScaffoldError> {
        TemplateCatalog::new(
            &self.path(&self.config.base.template_dir),
            &self.config.templating.choices,
        )
    }

    pub fn quality_gate(&self) -> QualityGate {
        QualityGate {
            validation_report: self.path(&self.config.quality.validation_report),
            accessibility_report: self.path(&self.config.quality.accessibility_report),
            workspace: self.reports_dir(),
            view_url: self.config.quality.view_url.clone(),
        }
    }

    pub fn leaf_naming(&self) -> LeafNaming {
        LeafNaming {
            suffix: self.config.quality.report_suffix.clone(),
            page_extension: self.config.quality.page_extension.clone(),
        }
    }
}

/// A core stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Toc,
    PrepareReports,
    Aggregate,
    Gate,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Toc => "Building table of contents",
            Stage::PrepareReports => "Preparing report views",
            Stage::Aggregate => "Aggregating accessibility reports",
            Stage::Gate => "Checking quality gate",
        }
    }
}

/// Stages run for `variant`, in order.
pub fn stages_for(variant: BuildVariant) -> Vec<Stage> {
    let mut stages = vec![Stage::Toc];
    if variant.runs_reports() {
        stages.extend([Stage::PrepareReports, Stage::Aggregate, Stage::Gate]);
    }
    stages
}

/// Progress reported by [`run_build`] as each stage starts and finishes.
#[derive(Debug)]
pub enum StageEvent {
    Started { position: usize, stage: Stage },
    TocBuilt(TocOutcome),
    ViewsPrepared(Vec<PathBuf>),
    Aggregated(AggregateOutcome),
    GatePassed(GateOutcome),
}

/// Build the table of contents for the project's release directory.
pub fn build_toc(project: &Project, variant: BuildVariant) -> Result<TocOutcome, PipelineError> {
    Ok(toc::build_toc(
        &project.release_dir(),
        variant,
        &project.config.toc,
        &project.path(&project.config.toc.quality_fragment),
    )?)
}

/// Copy the report viewer's static files into `reports/<views>`.
///
/// Files are copied flat; subdirectories of the base-files directory are
/// skipped. A missing base-files directory copies nothing.
pub fn prepare_report_views(project: &Project) -> Result<Vec<PathBuf>, PipelineError> {
    let base = project.path(&project.config.base.reports_base_files);
    if !base.is_dir() {
        return Ok(Vec::new());
    }
    let dest = project.reports_views_dir();
    fs::create_dir_all(&dest).map_err(io_err("create directory", &dest))?;

    let mut copied = Vec::new();
    for entry in fs::read_dir(&base).map_err(io_err("read directory", &base))? {
        let entry = entry.map_err(io_err("read directory", &base))?;
        let src = entry.path();
        if !src.is_file() {
            continue;
        }
        let target = dest.join(entry.file_name());
        fs::copy(&src, &target).map_err(io_err("copy", &src))?;
        copied.push(target);
    }
    Ok(copied)
}

/// Consolidate the per-page accessibility reports into the configured document.
pub fn aggregate_reports(project: &Project) -> Result<AggregateOutcome, PipelineError> {
    Ok(aggregate::aggregate(
        &project.path(&project.config.quality.accessibility_dir),
        &project.path(&project.config.quality.accessibility_report),
        &project.leaf_naming(),
    )?)
}

/// Run the quality gate against the configured reports.
pub fn check_quality(project: &Project) -> Result<GateOutcome, PipelineError> {
    Ok(project.quality_gate().evaluate()?)
}

/// Aggregate, then gate on the freshly written document.
///
/// The aggregate summary is reported before the gate runs, so it is still
/// shown when the gate fails.
pub fn aggregate_and_gate<F>(project: &Project, mut on_event: F) -> Result<(), PipelineError>
where
    F: FnMut(StageEvent),
{
    on_event(StageEvent::Aggregated(aggregate_reports(project)?));
    on_event(StageEvent::GatePassed(check_quality(project)?));
    Ok(())
}

/// Run every stage for `variant`, reporting progress through `on_event`.
///
/// Stops at the first failing stage; later stages do not run.
pub fn run_build<F>(project: &Project, variant: BuildVariant, mut on_event: F) -> Result<(), PipelineError>
where
    F: FnMut(StageEvent),
{
    for (i, stage) in stages_for(variant).into_iter().enumerate() {
        on_event(StageEvent::Started {
            position: i + 1,
            stage,
        });
        let event = match stage {
            Stage::Toc => StageEvent::TocBuilt(build_toc(project, variant)?),
            Stage::PrepareReports => StageEvent::ViewsPrepared(prepare_report_views(project)?),
            Stage::Aggregate => StageEvent::Aggregated(aggregate_reports(project)?),
            Stage::Gate => StageEvent::GatePassed(check_quality(project)?),
        };
        on_event(event);
    }
    Ok(())
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError {
    let path = path.to_path_buf();
    move |source| PipelineError::Io {
        action,
        path,
        source,
    }
}
