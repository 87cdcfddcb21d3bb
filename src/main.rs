use amp_build::config;
use amp_build::output;
use amp_build::pipeline::{self, Project};
use amp_build::scaffold::{self, ScaffoldRequest};
use amp_build::types::BuildVariant;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Shared flag for commands whose output depends on the build flavour.
#[derive(clap::Args, Clone)]
struct VariantArgs {
    /// Build variant; only `default` links the quality reports from the TOC
    #[arg(long, value_enum, default_value_t = BuildVariant::Default)]
    variant: BuildVariant,
}

#[derive(Parser)]
#[command(name = "amp-build")]
#[command(version)]
#[command(about = "Build extensions for a static front-end pipeline")]
#[command(long_about = "\
Build extensions for a static front-end pipeline

Scaffolds new pages from templates, injects a table of contents into the
release index page, consolidates accessibility reports and stops the build
when the markup or accessibility reports contain errors.

Project layout (defaults, see 'amp-build gen-config'):

  amp-config.toml
  templateBaseFiles/               # Scaffold templates
  source/                          # Authored pages
  │   └── includes/quality-toc.html
  release/                         # Compiled site
  │   └── index.html               # Contains <!--toc-->
  reportsBaseFiles/                # Report viewer files
  reports/                         # Validator output, removed on a passing gate
      ├── validation/html-validation.json
      └── accessibility/<section>/<page>-report-dom.json")]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file, relative to the project root
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new source file from a template
    New {
        /// Path and file name without extension, e.g. products/detail
        target: Option<String>,
        /// Template name, file name or menu number; prompts when omitted
        #[arg(long)]
        template: Option<String>,
    },
    /// List the available templates
    Templates,
    /// Inject the table of contents into the release index page
    Toc(VariantArgs),
    /// Copy the report viewer files into the reports directory
    PrepareReports,
    /// Consolidate accessibility reports, then run the quality gate
    Aggregate,
    /// Fail if the validation or accessibility reports contain errors
    Gate,
    /// Run the core stages for a build variant
    Build(VariantArgs),
    /// Print a stock amp-config.toml with all options documented
    GenConfig,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let load = || Project::load(&cli.root, &cli.config);

    match cli.command {
        Command::New { target, template } => {
            let project = load()?;
            let source = project.source_dir();
            let target = scaffold::check_collision(&source, target.as_deref())?;
            let catalog = project.catalog()?;
            let choice = match template {
                Some(choice) => choice,
                None => prompt_template(&catalog)?,
            };
            let template = catalog.select(&choice)?;
            let created = scaffold::generate(&source, &ScaffoldRequest { target, template })?;
            output::print_scaffold_output(&created, template, &project.root);
        }
        Command::Templates => {
            let project = load()?;
            output::print_templates(&project.catalog()?, &project.root);
        }
        Command::Toc(args) => {
            let project = load()?;
            let outcome = pipeline::build_toc(&project, args.variant)?;
            output::print_toc_output(&outcome, &project.root, &project.config.toc.placeholder);
        }
        Command::PrepareReports => {
            let project = load()?;
            let copied = pipeline::prepare_report_views(&project)?;
            output::print_views_output(&copied, &project.root);
        }
        Command::Aggregate => {
            let project = load()?;
            let placeholder = project.config.toc.placeholder.as_str();
            pipeline::aggregate_and_gate(&project, |event| {
                for line in output::format_stage_event(&event, &project.root, placeholder) {
                    println!("{}", line);
                }
            })?;
        }
        Command::Gate => {
            let project = load()?;
            let verdict = pipeline::check_quality(&project)?;
            output::print_gate_output(&verdict, &project.root);
        }
        Command::Build(args) => {
            let project = load()?;
            let placeholder = project.config.toc.placeholder.as_str();
            println!("==> Build ({})", args.variant.name());
            pipeline::run_build(&project, args.variant, |event| {
                for line in output::format_stage_event(&event, &project.root, placeholder) {
                    println!("{}", line);
                }
            })?;
            println!("==> Build complete");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Show the template menu and read one selection from stdin.
fn prompt_template(catalog: &scaffold::TemplateCatalog) -> io::Result<String> {
    output::print_template_menu(catalog);
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
