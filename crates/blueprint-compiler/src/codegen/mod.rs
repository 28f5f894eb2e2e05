//! Go code generation from a planned project.
//!
//! The planner decides which artifacts exist and builds a context for each;
//! this module renders them. Nothing here touches the filesystem: the whole
//! project is rendered into memory first, so a template failure never leaves
//! a partial tree behind.
//!
//! - `backend` - storage strategies (Firestore, PostgreSQL, MongoDB)
//! - `model` - domain structs, handlers and handler tests
//! - `auth` / `payments` - optional feature modules
//! - `entrypoint` - `cmd/api/main.go`
//! - `project` - build, container, script and documentation files

pub mod auth;
pub mod backend;
pub mod entrypoint;
pub mod go;
pub mod model;
pub mod payments;
pub mod project;

use std::path::PathBuf;

use serde::Serialize;

use crate::diagnostic::GeneratorError;
use crate::plan::{Action, Plan};
use crate::render::{RenderError, TemplateRenderer};

pub use auth::AuthContext;
pub use backend::{strategy_for, BackendStrategy, RepositoryContext};
pub use entrypoint::EntrypointContext;
pub use model::ModelContext;
pub use payments::PaymentsContext;
pub use project::ProjectContext;

/// Data a template is rendered against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderContext {
    Project(Box<ProjectContext>),
    Model(ModelContext),
    Repository(RepositoryContext),
    Auth(AuthContext),
    Payments(PaymentsContext),
    Entrypoint(Box<EntrypointContext>),
}

/// A filesystem operation, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOp {
    CreateDir {
        path: PathBuf,
    },
    Write {
        path: PathBuf,
        contents: String,
        executable: bool,
    },
    /// Copies a file that may not exist.
    CopyOptional {
        source: PathBuf,
        path: PathBuf,
    },
}

impl FileOp {
    pub fn path(&self) -> &PathBuf {
        match self {
            FileOp::CreateDir { path } | FileOp::Write { path, .. } | FileOp::CopyOptional { path, .. } => path,
        }
    }
}

/// Renders every artifact of the plan, in plan order.
pub fn generate(plan: &Plan, renderer: &TemplateRenderer) -> Result<Vec<FileOp>, GeneratorError> {
    let mut ops = Vec::with_capacity(plan.artifacts.len());

    for artifact in &plan.artifacts {
        let op = match &artifact.action {
            Action::CreateDir => FileOp::CreateDir {
                path: artifact.path.clone(),
            },
            Action::Render {
                template,
                context,
                executable,
            } => {
                let rendered = match context {
                    RenderContext::Entrypoint(entry) => entrypoint::render(renderer, entry),
                    other => renderer.render(*template, other),
                };
                let contents = rendered.map_err(|e: RenderError| GeneratorError::Template {
                    template: e.template,
                    artifact: artifact.path.clone(),
                    message: e.message,
                })?;
                FileOp::Write {
                    path: artifact.path.clone(),
                    contents,
                    executable: *executable,
                }
            }
            Action::CopyOptional { source } => FileOp::CopyOptional {
                source: source.clone(),
                path: artifact.path.clone(),
            },
        };
        ops.push(op);
    }

    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::ir::{Configuration, DatabaseKind, FieldType, Model};
    use crate::plan::plan;

    fn invoices() -> Configuration {
        let mut config = Configuration::new("billing", DatabaseKind::Firestore);
        config.models.push(Model::new("invoice").field("total", FieldType::Float));
        config
    }

    #[test]
    fn test_generate_renders_every_artifact() {
        let config = invoices();
        let plan = plan(&config, &GeneratorConfig::default()).unwrap();
        let renderer = TemplateRenderer::new().unwrap();

        let ops = generate(&plan, &renderer).unwrap();
        assert_eq!(ops.len(), plan.artifacts.len());

        let domain = ops
            .iter()
            .find(|op| op.path() == &PathBuf::from("internal/domain/invoice.go"))
            .unwrap();
        match domain {
            FileOp::Write { contents, executable, .. } => {
                assert!(contents.contains("type Invoice struct"));
                assert!(contents.contains("Total float64 `json:\"total\" firestore:\"total\"`"));
                assert!(!executable);
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn test_scripts_are_executable() {
        let plan = plan(&invoices(), &GeneratorConfig::default()).unwrap();
        let ops = generate(&plan, &TemplateRenderer::new().unwrap()).unwrap();

        for script in ["setup.sh", "setup_and_test.sh", "update_docs.sh"] {
            let op = ops.iter().find(|op| op.path() == &PathBuf::from(script)).unwrap();
            assert!(matches!(op, FileOp::Write { executable: true, .. }), "{script}");
        }
    }

    #[test]
    fn test_template_failure_names_the_artifact() {
        let mut plan = plan(&invoices(), &GeneratorConfig::default()).unwrap();
        let project = plan
            .artifacts
            .iter()
            .find_map(|a| match &a.action {
                Action::Render {
                    context: RenderContext::Project(project),
                    ..
                } => Some(project.clone()),
                _ => None,
            })
            .unwrap();

        // The project context lacks the model name the handler template reads
        let handler = plan
            .artifacts
            .iter_mut()
            .find(|a| a.path == PathBuf::from("internal/handlers/invoice/handler.go"))
            .unwrap();
        if let Action::Render { context, .. } = &mut handler.action {
            *context = RenderContext::Project(project);
        }

        match generate(&plan, &TemplateRenderer::new().unwrap()).unwrap_err() {
            GeneratorError::Template { template, artifact, .. } => {
                assert_eq!(template, "handler");
                assert_eq!(artifact, PathBuf::from("internal/handlers/invoice/handler.go"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
