use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("amp-build").unwrap();
    cmd.arg("--root").arg(root);
    cmd
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn page(title: &str) -> String {
    format!("<html><head><title>{title}</title></head><body></body></html>")
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "templateBaseFiles/basic-page.html", "<html>template</html>");
    write(root, "templateBaseFiles/component.html", "<div></div>");
    write(root, "templateBaseFiles/module.js", "export {};");
    write(root, "source/includes/quality-toc.html", "<ul id=\"qualityList\"></ul>");
    write(root, "release/index.html", "<nav><!--toc--></nav>");
    write(root, "release/alpha.html", &page("Alpha"));
    write(root, "release/includes/frag.html", &page("Fragment"));
    write(root, "reports/validation/html-validation.json", "[{\"passed\":true}]");
    write(
        root,
        "reports/accessibility/home/home-report-dom.json",
        "{\"issues\":[]}",
    );
    tmp
}

#[test]
fn gen_config_prints_stock_file() {
    let tmp = TempDir::new().unwrap();
    cmd(tmp.path())
        .arg("gen-config")
        .assert()
        .success()
        .stdout(contains("[toc]"))
        .stdout(contains("placeholder = \"<!--toc-->\""));
}

#[test]
fn gen_config_ignores_broken_project_config() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "amp-config.toml", "not = [valid");
    cmd(tmp.path())
        .arg("gen-config")
        .assert()
        .success()
        .stdout(contains("[base]"));
}

#[test]
fn new_with_template_creates_file() {
    let tmp = project();
    cmd(tmp.path())
        .args(["new", "products/detail", "--template", "basic-page"])
        .assert()
        .success()
        .stdout(contains("Created"));
    let created = tmp.path().join("source/products/detail.html");
    assert_eq!(fs::read_to_string(created).unwrap(), "<html>template</html>");
}

#[test]
fn new_twice_reports_collision() {
    let tmp = project();
    cmd(tmp.path())
        .args(["new", "landing", "--template", "module.js"])
        .assert()
        .success();
    cmd(tmp.path())
        .args(["new", "landing", "--template", "basic-page"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
    assert!(!tmp.path().join("source/landing.html").exists());
}

#[test]
fn new_collision_fails_before_template_menu() {
    let tmp = project();
    cmd(tmp.path())
        .args(["new", "landing", "--template", "module.js"])
        .assert()
        .success();
    cmd(tmp.path())
        .args(["new", "landing"])
        .write_stdin("1\n")
        .assert()
        .failure()
        .stderr(contains("already exists"))
        .stdout(contains("Please choose a template type").not());
    assert!(!tmp.path().join("source/landing.html").exists());
    assert!(!tmp.path().join("source/basic-page.html").exists());
}

#[test]
fn new_without_target_asks_for_one() {
    let tmp = project();
    cmd(tmp.path())
        .arg("new")
        .assert()
        .failure()
        .stderr(contains("Please provide a path"));
}

#[test]
fn new_prompts_for_template() {
    let tmp = project();
    cmd(tmp.path())
        .args(["new", "widgets/card"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(contains("Please choose a template type"))
        .stdout(contains("002 component (component.html)"));
    assert!(tmp.path().join("source/widgets/card.html").is_file());
}

#[test]
fn templates_lists_catalog() {
    let tmp = project();
    cmd(tmp.path())
        .arg("templates")
        .assert()
        .success()
        .stdout(contains("001 basic-page"))
        .stdout(contains("003 module"));
}

#[test]
fn toc_default_variant_appends_quality_links() {
    let tmp = project();
    cmd(tmp.path())
        .arg("toc")
        .assert()
        .success()
        .stdout(contains("001 Alpha → /alpha.html"));
    let index = fs::read_to_string(tmp.path().join("release/index.html")).unwrap();
    assert!(index.contains("<a href=\"/alpha.html\">Alpha</a>"));
    assert!(index.contains("qualityList"));
    assert!(!index.contains("Fragment"));
}

#[test]
fn toc_prod_variant_omits_quality_links() {
    let tmp = project();
    cmd(tmp.path())
        .args(["toc", "--variant", "prod"])
        .assert()
        .success();
    let index = fs::read_to_string(tmp.path().join("release/index.html")).unwrap();
    assert!(!index.contains("qualityList"));
}

#[test]
fn aggregate_then_gate_passes_and_cleans_up() {
    let tmp = project();
    cmd(tmp.path())
        .arg("aggregate")
        .assert()
        .success()
        .stdout(contains("001 home (1 pages)"))
        .stdout(contains("Quality gate passed"));
    assert!(!tmp.path().join("reports").exists());
}

#[test]
fn aggregate_with_errors_fails_the_build() {
    let tmp = project();
    write(
        tmp.path(),
        "reports/accessibility/home/home-report-dom.json",
        "[{\"type\":\"ERROR\",\"msg\":\"img missing alt\"}]",
    );
    cmd(tmp.path())
        .arg("aggregate")
        .assert()
        .failure()
        .stdout(contains("001 home (1 pages)"))
        .stderr(contains("accessibility errors: true"))
        .stderr(contains("http://localhost:3000/views"));
    let document = fs::read_to_string(tmp.path().join("reports/accessibility.json")).unwrap();
    assert!(document.starts_with("[{\"section\":\"home\",\"fileData\":[{\"file\":\"home.html\""));
}

#[test]
fn aggregate_rejects_malformed_leaf() {
    let tmp = project();
    write(tmp.path(), "reports/accessibility/home/home-report-dom.json", "{oops");
    cmd(tmp.path())
        .arg("aggregate")
        .assert()
        .failure()
        .stderr(contains("home-report-dom.json"));
}

#[test]
fn gate_fails_on_validation_marker() {
    let tmp = project();
    write(tmp.path(), "reports/validation/html-validation.json", "{\"passed\":false}");
    write(tmp.path(), "reports/accessibility.json", "[]");
    cmd(tmp.path())
        .arg("gate")
        .assert()
        .failure()
        .stderr(contains("validation errors: true"));
    assert!(tmp.path().join("reports").exists());
}

#[test]
fn qa_build_runs_every_stage() {
    let tmp = project();
    write(tmp.path(), "reportsBaseFiles/index.html", "<h1>Reports</h1>");
    cmd(tmp.path())
        .args(["build", "--variant", "qa"])
        .assert()
        .success()
        .stdout(contains("==> Stage 1: Building table of contents"))
        .stdout(contains("==> Stage 4: Checking quality gate"))
        .stdout(contains("==> Build complete"));
}

#[test]
fn invalid_config_is_reported() {
    let tmp = project();
    write(tmp.path(), "amp-config.toml", "[toc]\nplaceholdr = \"x\"\n");
    cmd(tmp.path())
        .arg("toc")
        .assert()
        .failure()
        .stderr(contains("Config error"));
}
