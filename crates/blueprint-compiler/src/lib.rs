//! # Blueprint Compiler
//!
//! This crate turns a project blueprint (a markdown document embedding a JSON
//! configuration) into a complete Go backend built on gin: module manifest,
//! database adapters, per-model CRUD handlers and tests, optional auth and
//! payments modules, container assets, scripts and documentation.
//!
//! ## Architecture
//!
//! ```text
//! Blueprint (markdown)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  First ```json block → Configuration
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Enrich    │  Feature defaults, injected user/transactions models
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Names, collisions, feature models
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │     Plan     │  Ordered artifacts with render contexts
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Backend strategy + templates, rendered in memory
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Output    │  Staged write, renamed into place
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blueprint_compiler::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     output_dir: "out".into(),
//!     ..GeneratorConfig::default()
//! };
//!
//! let result = Generator::new(config).generate("blueprint.md".as_ref())?;
//! println!("wrote {}", result.project_dir.display());
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod enrich;
pub mod frontend;
pub mod ir;
pub mod output;
pub mod plan;
pub mod render;
pub mod validate;

use std::path::{Path, PathBuf};

use tracing::info;

pub use config::GeneratorConfig;
pub use diagnostic::GeneratorError;
pub use plan::Plan;

use codegen::FileOp;
use ir::Configuration;
use output::{FileSystem, OsFileSystem};
use render::TemplateRenderer;

/// Starter document written by `blueprint init`.
pub const STARTER_BLUEPRINT: &str = include_str!("../templates/starter.md");

/// Runs the generation pipeline.
pub struct Generator {
    config: GeneratorConfig,
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    pub project_dir: PathBuf,
    pub files_written: usize,
    pub directories: usize,
    /// Model names in plan order, injected ones included.
    pub models: Vec<String>,
    pub credentials_copied: bool,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parses, enriches and validates a blueprint file.
    pub fn load(&self, blueprint: &Path) -> Result<Configuration, GeneratorError> {
        let config = frontend::create_frontend().parse_file(blueprint)?;
        self.prepare(config)
    }

    /// Same as [`Generator::load`] for blueprint text.
    pub fn load_str(&self, source: &str, origin: &Path) -> Result<Configuration, GeneratorError> {
        let config = frontend::create_frontend().parse_str(source, origin)?;
        self.prepare(config)
    }

    fn prepare(&self, mut config: Configuration) -> Result<Configuration, GeneratorError> {
        enrich::enrich(&mut config);
        validate::validate_configuration(&config)?;
        Ok(config)
    }

    /// Plans a configuration without rendering or writing anything.
    pub fn plan(&self, config: &Configuration) -> Result<Plan, GeneratorError> {
        plan::plan(config, &self.config)
    }

    /// Loads and plans a blueprint file.
    pub fn check(&self, blueprint: &Path) -> Result<Plan, GeneratorError> {
        let config = self.load(blueprint)?;
        self.plan(&config)
    }

    /// Renders every planned artifact in memory.
    pub fn render(&self, plan: &Plan) -> Result<Vec<FileOp>, GeneratorError> {
        let renderer = TemplateRenderer::new().map_err(|e| GeneratorError::Template {
            template: e.template,
            artifact: PathBuf::new(),
            message: e.message,
        })?;
        codegen::generate(plan, &renderer)
    }

    /// Runs the full pipeline on a blueprint file and writes the project.
    pub fn generate(&self, blueprint: &Path) -> Result<GenerateResult, GeneratorError> {
        let config = self.load(blueprint)?;
        self.generate_config(&config, &OsFileSystem)
    }

    /// Plans, renders and writes an already prepared configuration.
    pub fn generate_config(
        &self,
        config: &Configuration,
        fs: &dyn FileSystem,
    ) -> Result<GenerateResult, GeneratorError> {
        info!(
            project = %config.project_name,
            database = config.database.kind.as_str(),
            models = config.models.len(),
            "generating project"
        );

        let plan = self.plan(config)?;
        let ops = self.render(&plan)?;
        let summary = output::write_project(fs, &plan.project_name, &ops, &self.config)?;

        Ok(GenerateResult {
            project_dir: summary.project_dir,
            files_written: summary.files_written,
            directories: summary.directories,
            models: config.models.iter().map(|m| m.name.clone()).collect(),
            credentials_copied: summary.credentials_copied,
        })
    }
}
