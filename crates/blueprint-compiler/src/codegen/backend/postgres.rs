//! PostgreSQL backend.
//!
//! Every model becomes a table whose columns follow the sorted member names.
//! Identifiers are always double-quoted so reserved words and mixed-case
//! names survive; statements are embedded in Go raw strings, which cannot
//! contain a backtick and never need to.

use serde::Serialize;

use crate::codegen::go::{GoModule, PGX};
use crate::codegen::project::{ComposeService, EnvVar};
use crate::ir::{Configuration, DatabaseKind, FieldType, Model};
use crate::render::Template;
use crate::validate::RESERVED_ID;

use super::{BackendStrategy, RepositoryContext};

/// Column definition of the identity column.
const ID_COLUMN: &str = "TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text";

/// Prepared statements of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStatements {
    pub create_table: String,
    pub select_page: String,
    pub select_one: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl SqlStatements {
    /// Builds the statements for a model. Column order is the sorted member
    /// order, after the identity column. `preserved` members are inserted
    /// but never assigned by the update.
    pub fn for_model(model: &Model, preserved: &[String]) -> Self {
        let table = quote(&model.name);
        let columns = columns(model);
        let id = quote(RESERVED_ID);

        let mut definitions = vec![format!("{id} {ID_COLUMN}")];
        definitions.extend(columns.iter().map(|(name, typ)| format!("{} {typ}", quote(name))));

        let names: Vec<String> = columns.iter().map(|(name, _)| quote(name)).collect();
        let mut selected = vec![id.clone()];
        selected.extend(names.iter().cloned());
        let selected = selected.join(", ");

        let insert = if names.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES RETURNING {id}")
        } else {
            let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${i}")).collect();
            format!(
                "INSERT INTO {table} ({}) VALUES ({}) RETURNING {id}",
                names.join(", "),
                placeholders.join(", ")
            )
        };

        let updated: Vec<String> = columns
            .iter()
            .filter(|(name, _)| !preserved.iter().any(|p| p == name))
            .map(|(name, _)| quote(name))
            .collect();
        let update = if updated.is_empty() {
            format!("UPDATE {table} SET {id} = {id} WHERE {id} = $1")
        } else {
            let assignments: Vec<String> = updated
                .iter()
                .enumerate()
                .map(|(i, name)| format!("{name} = ${}", i + 1))
                .collect();
            format!(
                "UPDATE {table} SET {} WHERE {id} = ${}",
                assignments.join(", "),
                updated.len() + 1
            )
        };

        Self {
            create_table: format!("CREATE TABLE IF NOT EXISTS {table} ({})", definitions.join(", ")),
            select_page: format!("SELECT {selected} FROM {table} ORDER BY {id} LIMIT $1 OFFSET $2"),
            select_one: format!("SELECT {selected} FROM {table} WHERE {id} = $1"),
            insert,
            update,
            delete: format!("DELETE FROM {table} WHERE {id} = $1"),
        }
    }
}

/// Member columns in sorted order with their SQL types.
fn columns(model: &Model) -> Vec<(&str, &'static str)> {
    model
        .member_names()
        .into_iter()
        .map(|name| {
            let typ = match (model.fields.get(name), model.relations.get(name)) {
                (Some(field), _) => field_sql_type(*field),
                (None, Some(relation)) if relation.kind.is_collection() => "TEXT[]",
                _ => "TEXT",
            };
            (name, typ)
        })
        .collect()
}

fn field_sql_type(typ: FieldType) -> &'static str {
    match typ {
        FieldType::String | FieldType::Text => "TEXT",
        FieldType::Integer => "INTEGER",
        FieldType::Float => "DOUBLE PRECISION",
        FieldType::Boolean => "BOOLEAN",
        FieldType::Timestamp => "TIMESTAMP",
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

const LOCAL_URL_HOST: &str = "localhost:5432";

/// PostgreSQL through pgx, one table per model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresStrategy;

impl PostgresStrategy {
    fn url(config: &Configuration, host: &str) -> String {
        format!(
            "postgres://postgres:postgres@{host}/{}?sslmode=disable",
            config.project_name
        )
    }

    fn local_url(config: &Configuration) -> String {
        config
            .database
            .url
            .clone()
            .unwrap_or_else(|| Self::url(config, LOCAL_URL_HOST))
    }
}

impl BackendStrategy for PostgresStrategy {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgresql
    }

    fn base_template(&self) -> Template {
        Template::PostgresBase
    }

    fn base_file(&self) -> &'static str {
        "postgres.go"
    }

    fn base_type(&self) -> &'static str {
        "PostgresRepository"
    }

    fn repository_template(&self) -> Template {
        Template::PostgresRepository
    }

    fn repository_context(&self, config: &Configuration, model: &Model) -> RepositoryContext {
        let context = RepositoryContext::new(config, model);
        RepositoryContext {
            sql: Some(SqlStatements::for_model(model, &context.preserved)),
            ..context
        }
    }

    fn tag_key(&self) -> &'static str {
        "db"
    }

    fn id_tag(&self) -> String {
        self.member_tag(RESERVED_ID)
    }

    fn modules(&self) -> &'static [GoModule] {
        &[PGX]
    }

    fn database_init(&self, _config: &Configuration) -> String {
        "db.NewPostgresRepository(ctx, os.Getenv(\"DATABASE_URL\"))".to_string()
    }

    fn compose_services(&self, config: &Configuration) -> Vec<ComposeService> {
        vec![ComposeService {
            name: "postgres".to_string(),
            image: "postgres:16-alpine".to_string(),
            ports: vec!["5432:5432".to_string()],
            environment: vec![
                "POSTGRES_USER=postgres".to_string(),
                "POSTGRES_PASSWORD=postgres".to_string(),
                format!("POSTGRES_DB={}", config.project_name),
            ],
        }]
    }

    fn api_environment(&self, config: &Configuration) -> Vec<String> {
        vec![format!("DATABASE_URL={}", Self::url(config, "postgres:5432"))]
    }

    fn environment(&self, config: &Configuration) -> Vec<EnvVar> {
        vec![EnvVar::new(
            "DATABASE_URL",
            Self::local_url(config),
            "PostgreSQL connection URL",
        )]
    }

    fn local_exports(&self, config: &Configuration) -> Vec<String> {
        vec![format!("DATABASE_URL=\"${{DATABASE_URL:-{}}}\"", Self::local_url(config))]
    }
}
