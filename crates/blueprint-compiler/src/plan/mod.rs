//! Artifact planning.
//!
//! Turns an enriched, validated configuration into the ordered list of
//! artifacts that make up the generated project. Every decision about which
//! files exist and which template renders them is made here; rendering and
//! writing only follow the plan.
//!
//! Order: directories, build manifest, database adapters, per-model files,
//! auth, payments, credentials, entrypoint, operational files.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::codegen::{self, auth, model, payments, BackendStrategy, RenderContext};
use crate::config::{GeneratorConfig, CREDENTIALS_FILE_NAME};
use crate::diagnostic::GeneratorError;
use crate::ir::{AuthProvider, Configuration, DatabaseKind, Model, PaymentsProvider};
use crate::render::case::{lower, title};
use crate::render::Template;

/// What an artifact is, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Directory,
    Manifest,
    Lockfile,
    DatabaseAdapter,
    RepositoryPort,
    Domain,
    Repository,
    Handler,
    HandlerTest,
    AuthMiddleware,
    AuthHandler,
    AuthDomain,
    PaymentsConfig,
    PaymentsService,
    Credentials,
    Entrypoint,
    Operational,
}

impl ArtifactKind {
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Directory => "directory",
            ArtifactKind::Manifest => "module manifest",
            ArtifactKind::Lockfile => "module checksums",
            ArtifactKind::DatabaseAdapter => "database adapter",
            ArtifactKind::RepositoryPort => "repository port",
            ArtifactKind::Domain => "domain struct",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Handler => "handler",
            ArtifactKind::HandlerTest => "handler test",
            ArtifactKind::AuthMiddleware => "auth middleware",
            ArtifactKind::AuthHandler => "auth handler",
            ArtifactKind::AuthDomain => "auth request types",
            ArtifactKind::PaymentsConfig => "payments config",
            ArtifactKind::PaymentsService => "payments service",
            ArtifactKind::Credentials => "credentials",
            ArtifactKind::Entrypoint => "entrypoint",
            ArtifactKind::Operational => "operational file",
        }
    }
}

/// How an artifact is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateDir,
    Render {
        template: Template,
        context: RenderContext,
        executable: bool,
    },
    /// Copy a file that may be missing.
    CopyOptional { source: PathBuf },
}

/// One planned output.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Relative to the project root; empty for the root itself.
    pub path: PathBuf,
    pub action: Action,
    /// Model the artifact belongs to.
    pub model: Option<String>,
}

impl Artifact {
    fn describe(&self) -> String {
        match &self.model {
            Some(model) => format!("{} of model '{model}'", self.kind.label()),
            None => self.kind.label().to_string(),
        }
    }
}

/// Ordered artifacts of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub project_name: String,
    pub artifacts: Vec<Artifact>,
}

impl Plan {
    /// Finds an artifact by its relative path.
    pub fn find(&self, path: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.path == PathBuf::from(path))
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }
}

const DOMAIN_DIR: &str = "internal/domain";
const DB_DIR: &str = "internal/infrastructure/db";

/// Go types of the generic repository port.
const PORT_TYPES: &[&str] = &["Repository"];

/// Collects artifacts and rejects paths that collide after case folding,
/// as well as Go types declared twice in one package.
struct Planner {
    artifacts: Vec<Artifact>,
    // folded path -> index of the artifact that claimed it
    claimed: HashMap<String, usize>,
    // package dir joined with type name -> index of the declaring artifact
    declared: HashMap<PathBuf, usize>,
}

impl Planner {
    fn new() -> Self {
        Self {
            artifacts: Vec::new(),
            claimed: HashMap::new(),
            declared: HashMap::new(),
        }
    }

    fn push(&mut self, artifact: Artifact) -> Result<usize, GeneratorError> {
        let folded = artifact.path.to_string_lossy().to_ascii_lowercase();
        if let Some(&index) = self.claimed.get(&folded) {
            return Err(GeneratorError::NamingConflict {
                path: artifact.path.clone(),
                first: self.artifacts[index].describe(),
                second: artifact.describe(),
            });
        }
        let index = self.artifacts.len();
        self.claimed.insert(folded, index);
        self.artifacts.push(artifact);
        Ok(index)
    }

    /// Claims Go type names in the package at `package_dir` for an artifact.
    fn declare<S: AsRef<str>>(
        &mut self,
        owner: usize,
        package_dir: &str,
        types: &[S],
    ) -> Result<(), GeneratorError> {
        for name in types {
            let key = PathBuf::from(package_dir).join(name.as_ref());
            if let Some(&first) = self.declared.get(&key) {
                return Err(GeneratorError::NamingConflict {
                    path: key,
                    first: self.artifacts[first].describe(),
                    second: self.artifacts[owner].describe(),
                });
            }
            self.declared.insert(key, owner);
        }
        Ok(())
    }

    fn dir(&mut self, path: impl Into<PathBuf>, model: Option<&Model>) -> Result<(), GeneratorError> {
        self.push(Artifact {
            kind: ArtifactKind::Directory,
            path: path.into(),
            action: Action::CreateDir,
            model: model.map(|m| m.name.clone()),
        })?;
        Ok(())
    }

    fn render(
        &mut self,
        kind: ArtifactKind,
        path: impl Into<PathBuf>,
        template: Template,
        context: RenderContext,
    ) -> Result<usize, GeneratorError> {
        self.push(Artifact {
            kind,
            path: path.into(),
            action: Action::Render {
                template,
                context,
                executable: false,
            },
            model: None,
        })
    }

    fn render_for(
        &mut self,
        model: &Model,
        kind: ArtifactKind,
        path: impl Into<PathBuf>,
        template: Template,
        context: RenderContext,
    ) -> Result<usize, GeneratorError> {
        self.push(Artifact {
            kind,
            path: path.into(),
            action: Action::Render {
                template,
                context,
                executable: false,
            },
            model: Some(model.name.clone()),
        })
    }

    fn script(&mut self, path: &str, template: Template, context: RenderContext) -> Result<(), GeneratorError> {
        self.push(Artifact {
            kind: ArtifactKind::Operational,
            path: path.into(),
            action: Action::Render {
                template,
                context,
                executable: true,
            },
            model: None,
        })?;
        Ok(())
    }
}

const FIXED_DIRECTORIES: &[&str] = &["cmd/api", "docs", DOMAIN_DIR, DB_DIR, "internal/handlers"];

/// Plans every artifact of the project described by `config`.
pub fn plan(config: &Configuration, settings: &GeneratorConfig) -> Result<Plan, GeneratorError> {
    let backend = codegen::strategy_for(config.database.kind);
    let backend = backend.as_ref();
    let auth_provider = config
        .enabled_auth()
        .map(|a| a.provider.unwrap_or(AuthProvider::Firebase));
    let payments_provider = config
        .enabled_payments()
        .map(|p| p.provider.unwrap_or(PaymentsProvider::MercadoPago));

    let project = RenderContext::Project(Box::new(codegen::project::project_context(config, backend)));
    let mut planner = Planner::new();

    // Directories
    planner.dir(PathBuf::new(), None)?;
    for dir in FIXED_DIRECTORIES {
        planner.dir(*dir, None)?;
    }
    if auth_provider.is_some() {
        planner.dir("internal/auth", None)?;
        planner.dir("internal/handlers/auth", None)?;
    }
    if payments_provider.is_some() {
        planner.dir("internal/payments", None)?;
        planner.dir("internal/config", None)?;
    }
    for model in &config.models {
        planner.dir(codegen::go::handler_dir(model), Some(model))?;
    }

    // Build manifest
    planner.render(ArtifactKind::Manifest, "go.mod", Template::GoMod, project.clone())?;
    planner.render(ArtifactKind::Lockfile, "go.sum", Template::GoSum, project.clone())?;

    // Database adapter and the port it implements
    let adapter = planner.render(
        ArtifactKind::DatabaseAdapter,
        format!("{DB_DIR}/{}", backend.base_file()),
        backend.base_template(),
        project.clone(),
    )?;
    planner.declare(adapter, DB_DIR, &[backend.base_type()])?;
    let port = planner.render(
        ArtifactKind::RepositoryPort,
        format!("{DOMAIN_DIR}/repository.go"),
        Template::RepositoryPort,
        project.clone(),
    )?;
    planner.declare(port, DOMAIN_DIR, PORT_TYPES)?;

    for model in &config.models {
        plan_model(&mut planner, config, model, backend)?;
    }

    if let Some(provider) = auth_provider {
        plan_auth(&mut planner, config, provider)?;
    }

    if let Some(provider) = payments_provider {
        plan_payments(&mut planner, config, provider)?;
    }

    if config.database.kind == DatabaseKind::Firestore || auth_provider == Some(AuthProvider::Firebase) {
        planner.push(Artifact {
            kind: ArtifactKind::Credentials,
            path: CREDENTIALS_FILE_NAME.into(),
            action: Action::CopyOptional {
                source: settings.credentials_file.clone(),
            },
            model: None,
        })?;
    }

    planner.render(
        ArtifactKind::Entrypoint,
        "cmd/api/main.go",
        Template::Main,
        RenderContext::Entrypoint(Box::new(codegen::entrypoint::entrypoint_context(config, backend))),
    )?;

    for (path, template) in [
        ("Dockerfile", Template::Dockerfile),
        ("docker-compose.yml", Template::Compose),
        ("Makefile", Template::Makefile),
        ("Procfile", Template::Procfile),
        (".env.example", Template::EnvExample),
        (".gitignore", Template::GitIgnore),
        ("README.md", Template::Readme),
        ("ARCHITECTURE.md", Template::Architecture),
        ("docs/docs.go", Template::DocsPlaceholder),
    ] {
        planner.render(ArtifactKind::Operational, path, template, project.clone())?;
    }
    planner.script("setup.sh", Template::SetupScript, project.clone())?;
    planner.script("setup_and_test.sh", Template::SmokeTestScript, project.clone())?;
    planner.script("update_docs.sh", Template::UpdateDocsScript, project)?;

    debug!(
        project = %config.project_name,
        artifacts = planner.artifacts.len(),
        "planned project"
    );

    Ok(Plan {
        project_name: config.project_name.clone(),
        artifacts: planner.artifacts,
    })
}

fn plan_model(
    planner: &mut Planner,
    config: &Configuration,
    model: &Model,
    backend: &dyn BackendStrategy,
) -> Result<(), GeneratorError> {
    let file = lower(&model.name);
    let handler_dir = codegen::go::handler_dir(model);
    let context = RenderContext::Model(model::model_context(config, model, backend));
    let type_name = title(&model.name);
    let repository_type = format!("{type_name}Repository");

    let domain = planner.render_for(
        model,
        ArtifactKind::Domain,
        format!("{DOMAIN_DIR}/{file}.go"),
        Template::Domain,
        context.clone(),
    )?;
    planner.declare(domain, DOMAIN_DIR, &[type_name, repository_type.clone()])?;
    let repository = planner.render_for(
        model,
        ArtifactKind::Repository,
        format!("{DB_DIR}/{file}_repository.go"),
        backend.repository_template(),
        RenderContext::Repository(backend.repository_context(config, model)),
    )?;
    planner.declare(repository, DB_DIR, &[repository_type])?;
    planner.render_for(
        model,
        ArtifactKind::Handler,
        format!("{handler_dir}/handler.go"),
        Template::Handler,
        context.clone(),
    )?;
    planner.render_for(
        model,
        ArtifactKind::HandlerTest,
        format!("{handler_dir}/handler_test.go"),
        Template::HandlerTest,
        context,
    )?;
    Ok(())
}

/// Looks up the model a feature binds to.
fn feature_model<'a>(config: &'a Configuration, feature: &str, collection: &str) -> Result<&'a Model, GeneratorError> {
    config
        .find_model(collection)
        .ok_or_else(|| GeneratorError::FeatureModelIncomplete {
            feature: feature.to_string(),
            model: collection.to_string(),
            field: "(model)".to_string(),
            expected: "a declared or injected model".to_string(),
        })
}

fn plan_auth(planner: &mut Planner, config: &Configuration, provider: AuthProvider) -> Result<(), GeneratorError> {
    let collection = config
        .enabled_auth()
        .map(|a| a.user_collection.as_str())
        .unwrap_or_default();
    let user = feature_model(config, "auth", collection)?;
    let context = RenderContext::Auth(auth::auth_context(&config.project_name, user, provider));

    planner.render(
        ArtifactKind::AuthMiddleware,
        "internal/auth/middleware.go",
        auth::middleware_template(provider),
        context.clone(),
    )?;
    planner.render(
        ArtifactKind::AuthHandler,
        "internal/handlers/auth/handler.go",
        auth::handler_template(provider),
        context.clone(),
    )?;
    if provider == AuthProvider::Jwt {
        let domain = planner.render(
            ArtifactKind::AuthDomain,
            format!("{DOMAIN_DIR}/auth.go"),
            Template::JwtDomain,
            context,
        )?;
        planner.declare(domain, DOMAIN_DIR, auth::domain_types(provider))?;
    }
    Ok(())
}

fn plan_payments(
    planner: &mut Planner,
    config: &Configuration,
    provider: PaymentsProvider,
) -> Result<(), GeneratorError> {
    let collection = config
        .enabled_payments()
        .map(|p| p.transactions_collection.as_str())
        .unwrap_or_default();
    let transactions = feature_model(config, "payments", collection)?;
    let context = RenderContext::Payments(payments::payments_context(&config.project_name, transactions, provider));

    planner.render(
        ArtifactKind::PaymentsConfig,
        "internal/config/config.go",
        Template::PaymentsConfig,
        context.clone(),
    )?;
    planner.render(
        ArtifactKind::PaymentsService,
        format!("internal/payments/{}", payments::service_file(provider)),
        payments::service_template(provider),
        context,
    )?;
    Ok(())
}
