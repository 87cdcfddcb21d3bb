//! Scaffold generation: new source files from a closed catalog of templates.
//!
//! Generation runs in two phases so the CLI can ask for a template in between
//! without resuming a queued task:
//!
//! 1. [`check_collision`] rejects a target whose name is already taken by any
//!    file in the source tree, whatever its extension. Nothing is created.
//! 2. [`generate`] copies the chosen template into the target's directory and
//!    renames it to `<name><template extension>`.
//!
//! ```text
//! amp-build new products/detail --template basic-page
//!
//! templateBaseFiles/basic-page.html
//!         │ copy
//!         ▼
//! source/products/basic-page.html
//!         │ rename
//!         ▼
//! source/products/detail.html
//! ```
//!
//! Directory creation is not rolled back: directories made before a failed
//! copy stay on disk.

use crate::naming::{self, TargetName};
use crate::walk::{self, WalkError, WalkOrder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error(
        "Please provide a path and file name (no extension), e.g. `new products/detail`. \
         To create a file at the root level, give just the name."
    )]
    MissingTarget,
    #[error("{0} already exists. Please choose a different name.")]
    AlreadyExists(PathBuf),
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("Template '{0}' has no file extension")]
    InvalidTemplate(String),
    #[error("Cannot stage template copy: {0} already exists")]
    StagingOccupied(PathBuf),
    #[error("Cannot {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Walk(#[from] WalkError),
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> ScaffoldError {
    let path = path.to_path_buf();
    move |source| ScaffoldError::Io {
        action,
        path,
        source,
    }
}

/// A template available to the scaffold generator.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDescriptor {
    /// Menu name, the file name without extension (`basic-page`).
    pub name: String,
    /// File name inside the template directory (`basic-page.html`).
    pub file_name: String,
    /// Extension given to generated files, with leading dot (`.html`).
    pub extension: String,
    /// Location of the template file.
    pub source: PathBuf,
}

/// The closed, ordered set of templates read from configuration.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<TemplateDescriptor>,
}

impl TemplateCatalog {
    pub fn new(template_dir: &Path, choices: &[String]) -> Result<Self, ScaffoldError> {
        let templates = choices
            .iter()
            .map(|choice| -> Result<TemplateDescriptor, ScaffoldError> {
                let (name, extension) = naming::split_extension(choice)
                    .ok_or_else(|| ScaffoldError::InvalidTemplate(choice.clone()))?;
                Ok(TemplateDescriptor {
                    name: name.to_string(),
                    file_name: choice.clone(),
                    extension: extension.to_string(),
                    source: template_dir.join(choice),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    /// Resolve a selection by file name, menu name, or 1-based menu position.
    pub fn select(&self, choice: &str) -> Result<&TemplateDescriptor, ScaffoldError> {
        let choice = choice.trim();
        if let Some(found) = self
            .templates
            .iter()
            .find(|t| t.file_name == choice || t.name == choice)
        {
            return Ok(found);
        }
        choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.templates.get(i))
            .ok_or_else(|| ScaffoldError::UnknownTemplate(choice.to_string()))
    }
}

/// A validated target paired with the chosen template. Consumed by [`generate`].
#[derive(Debug, Clone)]
pub struct ScaffoldRequest<'a> {
    pub target: TargetName,
    pub template: &'a TemplateDescriptor,
}

/// Parse the target and make sure no file in `source_dir` already uses it.
///
/// A file collides when its path without the last extension equals
/// `source_dir/<target>`, so `products/detail` is taken by `detail.html`
/// as much as by `detail.js`.
pub fn check_collision(source_dir: &Path, target: Option<&str>) -> Result<TargetName, ScaffoldError> {
    let target = target
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ScaffoldError::MissingTarget)?;
    let parsed = naming::split_target(target);
    if parsed.name.is_empty() {
        return Err(ScaffoldError::MissingTarget);
    }
    if !source_dir.is_dir() {
        return Ok(parsed);
    }

    let wanted = target_base(source_dir, &parsed);
    let existing = walk::list_files(source_dir, WalkOrder::Discovery, |p| {
        p.extension().is_some() && p.with_extension("") == wanted
    })?;
    match existing.into_iter().next() {
        Some(path) => Err(ScaffoldError::AlreadyExists(path)),
        None => Ok(parsed),
    }
}

/// Create the scaffold described by `request` and return its path.
///
/// Re-checks the collision rule first, so a second call for the same target
/// fails without touching the filesystem.
pub fn generate(source_dir: &Path, request: &ScaffoldRequest<'_>) -> Result<PathBuf, ScaffoldError> {
    let target = format!("{}/{}", request.target.dir, request.target.name);
    check_collision(source_dir, Some(target.as_str()))?;

    let dest_dir = source_dir.join(&request.target.dir);
    let final_path = dest_dir.join(format!(
        "{}{}",
        request.target.name, request.template.extension
    ));
    if final_path.exists() {
        return Err(ScaffoldError::AlreadyExists(final_path));
    }

    fs::create_dir_all(&dest_dir).map_err(io_err("create directory", &dest_dir))?;

    let staged = dest_dir.join(&request.template.file_name);
    if staged.exists() {
        return Err(ScaffoldError::StagingOccupied(staged));
    }
    fs::copy(&request.template.source, &staged)
        .map_err(io_err("copy template", &request.template.source))?;
    fs::rename(&staged, &final_path).map_err(io_err("rename", &staged))?;

    Ok(final_path)
}

fn target_base(source_dir: &Path, target: &TargetName) -> PathBuf {
    if target.dir.is_empty() {
        source_dir.join(&target.name)
    } else {
        source_dir.join(&target.dir).join(&target.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{count_files, write_file};
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
        catalog: TemplateCatalog,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            write_file(tmp.path(), "templates/basic-page.html", "<html>page</html>");
            write_file(tmp.path(), "templates/module.js", "export {};\n");
            fs::create_dir_all(tmp.path().join("source")).unwrap();
            let catalog = TemplateCatalog::new(
                &tmp.path().join("templates"),
                &["basic-page.html".to_string(), "module.js".to_string()],
            )
            .unwrap();
            Self { tmp, catalog }
        }

        fn source(&self) -> PathBuf {
            self.tmp.path().join("source")
        }

        fn scaffold(&self, target: &str, template: &str) -> Result<PathBuf, ScaffoldError> {
            let target = check_collision(&self.source(), Some(target))?;
            let template = self.catalog.select(template)?;
            generate(&self.source(), &ScaffoldRequest { target, template })
        }
    }

    #[test]
    fn catalog_derives_name_and_extension() {
        let fx = Fixture::new();
        let t = &fx.catalog.templates()[0];
        assert_eq!(t.name, "basic-page");
        assert_eq!(t.extension, ".html");
        assert_eq!(t.source, fx.tmp.path().join("templates/basic-page.html"));
    }

    #[test]
    fn catalog_rejects_choice_without_extension() {
        let result = TemplateCatalog::new(Path::new("t"), &["README".to_string()]);
        assert!(matches!(result, Err(ScaffoldError::InvalidTemplate(_))));
    }

    #[test]
    fn select_by_file_name_name_or_position() {
        let fx = Fixture::new();
        assert_eq!(fx.catalog.select("module.js").unwrap().name, "module");
        assert_eq!(fx.catalog.select("module").unwrap().name, "module");
        assert_eq!(fx.catalog.select("1").unwrap().name, "basic-page");
        assert!(matches!(
            fx.catalog.select("3"),
            Err(ScaffoldError::UnknownTemplate(_))
        ));
        assert!(matches!(
            fx.catalog.select("0"),
            Err(ScaffoldError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn generate_at_root_uses_template_extension() {
        let fx = Fixture::new();
        let created = fx.scaffold("landing", "basic-page").unwrap();
        assert_eq!(created, fx.source().join("landing.html"));
        assert_eq!(fs::read_to_string(&created).unwrap(), "<html>page</html>");
        assert!(!fx.source().join("basic-page.html").exists());
    }

    #[test]
    fn generate_creates_intermediate_directories() {
        let fx = Fixture::new();
        let created = fx.scaffold("products/detail/gallery", "module.js").unwrap();
        assert_eq!(created, fx.source().join("products/detail/gallery.js"));
        assert!(created.is_file());
    }

    #[test]
    fn second_generate_collides_and_leaves_one_file() {
        let fx = Fixture::new();
        fx.scaffold("products/detail", "basic-page").unwrap();

        let err = fx.scaffold("products/detail", "basic-page").unwrap_err();
        assert!(matches!(err, ScaffoldError::AlreadyExists(_)));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(count_files(&fx.source()), 1);
    }

    #[test]
    fn generate_rechecks_collision_for_prepared_request() {
        let fx = Fixture::new();
        let target = check_collision(&fx.source(), Some("about")).unwrap();
        let template = fx.catalog.select("basic-page").unwrap();
        let request = ScaffoldRequest { target, template };

        generate(&fx.source(), &request).unwrap();
        assert!(matches!(
            generate(&fx.source(), &request),
            Err(ScaffoldError::AlreadyExists(_))
        ));
    }

    #[test]
    fn collision_ignores_extension() {
        let fx = Fixture::new();
        write_file(&fx.source(), "products/detail.css", "");
        let err = check_collision(&fx.source(), Some("products/detail")).unwrap_err();
        assert!(matches!(err, ScaffoldError::AlreadyExists(p) if p.ends_with("detail.css")));
    }

    #[test]
    fn collision_requires_same_directory() {
        let fx = Fixture::new();
        write_file(&fx.source(), "other/detail.html", "");
        assert!(check_collision(&fx.source(), Some("products/detail")).is_ok());
    }

    #[test]
    fn missing_target_is_rejected() {
        let fx = Fixture::new();
        assert!(matches!(
            check_collision(&fx.source(), None),
            Err(ScaffoldError::MissingTarget)
        ));
        assert!(matches!(
            check_collision(&fx.source(), Some("  ")),
            Err(ScaffoldError::MissingTarget)
        ));
        assert!(matches!(
            check_collision(&fx.source(), Some("products/")),
            Err(ScaffoldError::MissingTarget)
        ));
    }

    #[test]
    fn missing_source_dir_has_no_collisions() {
        let tmp = TempDir::new().unwrap();
        assert!(check_collision(&tmp.path().join("nope"), Some("x")).is_ok());
    }

    #[test]
    fn missing_template_propagates_io_error_and_keeps_directories() {
        let fx = Fixture::new();
        fs::remove_file(fx.tmp.path().join("templates/module.js")).unwrap();

        let err = fx.scaffold("widgets/carousel", "module.js").unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { action: "copy template", .. }));
        assert!(fx.source().join("widgets").is_dir());
        assert_eq!(count_files(&fx.source()), 0);
    }

    #[test]
    fn occupied_staging_name_is_refused() {
        let fx = Fixture::new();
        write_file(&fx.source(), "basic-page.html", "mine");
        let err = fx.scaffold("landing", "basic-page").unwrap_err();
        assert!(matches!(err, ScaffoldError::StagingOccupied(_)));
        assert_eq!(
            fs::read_to_string(fx.source().join("basic-page.html")).unwrap(),
            "mine"
        );
    }
}
