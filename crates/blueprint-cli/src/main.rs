//! Blueprint CLI.
//!
//! Generates a Go backend project from a markdown blueprint.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use blueprint_compiler::config::CREDENTIALS_FILE_NAME;
use blueprint_compiler::ir::Configuration;
use blueprint_compiler::{GenerateResult, Generator, GeneratorConfig, GeneratorError, Plan, STARTER_BLUEPRINT};

mod ui;

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(version)]
#[command(about = "Generate a Go backend project from a markdown blueprint")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the project described by a blueprint
    Generate {
        /// Blueprint document
        #[arg(default_value = "blueprint.md")]
        blueprint: PathBuf,

        /// Directory that receives <project_name>/
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Firebase credentials copied into the project when needed
        #[arg(long, default_value = CREDENTIALS_FILE_NAME)]
        credentials: PathBuf,

        /// Replace an existing project directory
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a blueprint and list what would be generated
    Check {
        /// Blueprint document
        #[arg(default_value = "blueprint.md")]
        blueprint: PathBuf,
    },

    /// Write a starter blueprint
    Init {
        /// Where to write the blueprint
        #[arg(default_value = "blueprint.md")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    ui::header(env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate {
            blueprint,
            output,
            credentials,
            force,
        } => {
            let config = GeneratorConfig {
                output_dir: output,
                credentials_file: credentials,
                overwrite: force,
            };
            generate(&blueprint, config)
        }
        Commands::Check { blueprint } => check(&blueprint),
        Commands::Init { path, force } => init(&path, force),
    }
}

fn generate(blueprint: &Path, config: GeneratorConfig) -> miette::Result<()> {
    let start = Instant::now();
    let generator = Generator::new(config);

    let spinner = ui::spinner(&format!("Reading {}...", blueprint.display()));
    let configuration = match generator.load(blueprint) {
        Ok(configuration) => configuration,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(failed("Blueprint rejected.", e));
        }
    };

    spinner.set_message(format!("Generating {}...", configuration.project_name));
    let result = generator.generate_config(&configuration, &blueprint_compiler::output::OsFileSystem);
    spinner.finish_and_clear();
    let result = result.map_err(|e| failed("Generation failed.", e))?;

    print_summary(&configuration, &result);
    if uses_firebase(&configuration) && !result.credentials_copied {
        ui::warn(&format!(
            "No credentials copied. Place {CREDENTIALS_FILE_NAME} in the project before running it."
        ));
    }
    ui::timing("Done", start.elapsed().as_millis());
    println!();

    ui::box_header(&format!("{} Next steps", ui::symbols::ARROW));
    ui::box_line("");
    ui::box_line(&format!("   cd {}", result.project_dir.display()));
    ui::box_line("   ./setup.sh");
    ui::box_line("   make run");
    ui::box_line("");
    ui::box_footer();
    Ok(())
}

fn check(blueprint: &Path) -> miette::Result<()> {
    let generator = Generator::new(GeneratorConfig::default());

    let spinner = ui::spinner(&format!("Checking {}...", blueprint.display()));
    let checked = generator.check(blueprint);
    spinner.finish_and_clear();
    let plan = checked.map_err(|e| failed("Blueprint rejected.", e))?;

    ui::success(&format!("{} is valid.", blueprint.display()));
    ui::info("Nothing was written.");
    println!();
    print_plan(&plan);
    Ok(())
}

fn init(path: &Path, force: bool) -> miette::Result<()> {
    if path.exists() && !force {
        ui::failure_header("Refusing to overwrite.");
        return Err(miette::miette!(
            help = "Pass --force to replace it",
            "{} already exists",
            path.display()
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| miette::miette!("Failed to create {}: {}", parent.display(), e))?;
    }
    std::fs::write(path, STARTER_BLUEPRINT)
        .map_err(|e| miette::miette!("Failed to write {}: {}", path.display(), e))?;

    ui::success(&format!("Wrote {}", path.display()));
    ui::dim("Edit the JSON block, then run `blueprint generate`.");
    Ok(())
}

fn failed(headline: &str, error: GeneratorError) -> miette::Report {
    ui::failure_header(headline);
    error.into()
}

fn uses_firebase(config: &Configuration) -> bool {
    use blueprint_compiler::ir::{AuthProvider, DatabaseKind};

    config.database.kind == DatabaseKind::Firestore
        || config
            .enabled_auth()
            .is_some_and(|auth| auth.provider == Some(AuthProvider::Firebase))
}

fn print_summary(config: &Configuration, result: &GenerateResult) {
    ui::box_header(&format!("{} {}", ui::symbols::DIAMOND, config.project_name));
    ui::box_line("");
    ui::box_line(&ui::labeled("Database", config.database.kind.as_str()));
    ui::box_line(&ui::labeled("Models", &result.models.join(", ")));
    if let Some(auth) = config.enabled_auth().and_then(|a| a.provider) {
        ui::box_line(&ui::labeled("Auth", auth.as_str()));
    }
    if let Some(payments) = config.enabled_payments().and_then(|p| p.provider) {
        ui::box_line(&ui::labeled("Payments", payments.as_str()));
    }
    ui::box_line(&ui::labeled(
        "Files",
        &format!("{} in {} directories", result.files_written, result.directories),
    ));
    ui::box_line("");
    ui::box_footer();
    println!();

    ui::tree_dir("", &result.project_dir.display().to_string());
    let counts = top_level_counts(&result.project_dir);
    let last = counts.len().saturating_sub(1);
    for (i, (name, files)) in counts.iter().enumerate() {
        let description = match files {
            0 => None,
            1 => Some("1 file".to_string()),
            n => Some(format!("{n} files")),
        };
        ui::tree_item("  ", name, description.as_deref(), i == last);
    }
    println!();
}

/// Files under each top-level entry of the generated tree. Plain files count 0.
fn top_level_counts(root: &Path) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).into_iter().filter_map(Result::ok) {
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let Some(top) = relative.components().next() else {
            continue;
        };
        let top = top.as_os_str().to_string_lossy().into_owned();
        let count = counts.entry(top).or_insert(0);
        if entry.depth() > 1 && entry.file_type().is_file() {
            *count += 1;
        }
    }
    counts
}

fn print_plan(plan: &Plan) {
    ui::box_header(&format!("{} {}", ui::symbols::DIAMOND, plan.project_name));
    ui::box_line("");
    ui::box_line(&ui::labeled("Artifacts", &plan.artifacts.len().to_string()));
    ui::box_line("");
    ui::box_footer();
    println!();

    for artifact in &plan.artifacts {
        let path = artifact.path.display().to_string();
        let path = if path.is_empty() { "." } else { path.as_str() };
        ui::artifact_line(artifact.kind.label(), path);
    }
    println!();
}
