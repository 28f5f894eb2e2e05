//! Storage backends.
//!
//! Each backend supplies its shared client adapter, its per-model repository
//! adapter and the operational settings (modules, services, environment)
//! the rest of the project needs. The planner only talks to
//! [`BackendStrategy`], so adding a backend never touches planning.

mod firestore;
mod mongo;
mod postgres;

pub use firestore::FirestoreStrategy;
pub use mongo::MongoStrategy;
pub use postgres::{PostgresStrategy, SqlStatements};

use serde::Serialize;

use crate::codegen::auth;
use crate::codegen::go::GoModule;
use crate::codegen::project::{ComposeService, EnvVar};
use crate::ir::{Configuration, DatabaseKind, Model};
use crate::render::Template;

/// Context of a per-model repository adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryContext {
    pub project_name: String,
    pub name: String,
    pub collection: String,
    /// Sorted member names, the column order of SQL adapters.
    pub columns: Vec<String>,
    /// Members a generic update never writes.
    pub preserved: Vec<String>,
    /// Columns written by a generic update, in column order.
    pub updated: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<SqlStatements>,
}

impl RepositoryContext {
    pub fn new(config: &Configuration, model: &Model) -> Self {
        let preserved = auth::credential_members(config, model);
        let columns: Vec<String> = model.member_names().into_iter().map(str::to_string).collect();
        let updated = columns
            .iter()
            .filter(|c| !preserved.iter().any(|p| p == c))
            .cloned()
            .collect();
        Self {
            project_name: config.project_name.clone(),
            name: model.name.clone(),
            collection: model.name.clone(),
            columns,
            preserved: preserved.into_iter().map(str::to_string).collect(),
            updated,
            sql: None,
        }
    }
}

/// A storage backend of the generated project.
pub trait BackendStrategy: Send + Sync {
    fn kind(&self) -> DatabaseKind;

    /// Template of the shared client adapter.
    fn base_template(&self) -> Template;

    /// File name of the shared client adapter under `internal/infrastructure/db`.
    fn base_file(&self) -> &'static str;

    /// Go type the shared client adapter declares.
    fn base_type(&self) -> &'static str;

    fn repository_template(&self) -> Template;

    fn repository_context(&self, config: &Configuration, model: &Model) -> RepositoryContext {
        RepositoryContext::new(config, model)
    }

    /// Struct tag key the driver reads field names from.
    fn tag_key(&self) -> &'static str;

    /// Full struct tag of the identity field.
    fn id_tag(&self) -> String;

    /// Struct tag of a stored member.
    fn member_tag(&self, member: &str) -> String {
        format!("json:\"{member}\" {}:\"{member}\"", self.tag_key())
    }

    fn modules(&self) -> &'static [GoModule];

    /// Go expression opening the shared client in `main`.
    fn database_init(&self, config: &Configuration) -> String;

    /// Services started next to the API by docker compose.
    fn compose_services(&self, _config: &Configuration) -> Vec<ComposeService> {
        Vec::new()
    }

    /// Environment of the API container.
    fn api_environment(&self, config: &Configuration) -> Vec<String>;

    /// Variables documented in `.env.example`.
    fn environment(&self, config: &Configuration) -> Vec<EnvVar>;

    /// Exports the local run scripts need before starting the server.
    fn local_exports(&self, _config: &Configuration) -> Vec<String> {
        Vec::new()
    }
}

/// Returns the strategy for a database kind.
pub fn strategy_for(kind: DatabaseKind) -> Box<dyn BackendStrategy> {
    match kind {
        DatabaseKind::Firestore => Box::new(FirestoreStrategy),
        DatabaseKind::Postgresql => Box::new(PostgresStrategy),
        DatabaseKind::Mongodb => Box::new(MongoStrategy),
    }
}
