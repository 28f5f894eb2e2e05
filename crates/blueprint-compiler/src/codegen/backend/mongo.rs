use crate::codegen::go::{GoModule, MONGO_DRIVER};
use crate::codegen::project::{ComposeService, EnvVar};
use crate::ir::{Configuration, DatabaseKind};
use crate::render::Template;

use super::BackendStrategy;

const LOCAL_URL: &str = "mongodb://localhost:27017";

/// MongoDB, one collection per model keyed by ObjectID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoStrategy;

impl BackendStrategy for MongoStrategy {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Mongodb
    }

    fn base_template(&self) -> Template {
        Template::MongoBase
    }

    fn base_file(&self) -> &'static str {
        "mongo.go"
    }

    fn base_type(&self) -> &'static str {
        "MongoRepository"
    }

    fn repository_template(&self) -> Template {
        Template::MongoRepository
    }

    fn tag_key(&self) -> &'static str {
        "bson"
    }

    fn id_tag(&self) -> String {
        r#"json:"id" bson:"-""#.to_string()
    }

    fn modules(&self) -> &'static [GoModule] {
        &[MONGO_DRIVER]
    }

    fn database_init(&self, config: &Configuration) -> String {
        format!(
            "db.NewMongoRepository(ctx, os.Getenv(\"DATABASE_URL\"), envOr(\"MONGO_DATABASE\", \"{}\"))",
            config.project_name
        )
    }

    fn compose_services(&self, config: &Configuration) -> Vec<ComposeService> {
        vec![ComposeService {
            name: "mongo".to_string(),
            image: "mongo:7".to_string(),
            ports: vec!["27017:27017".to_string()],
            environment: vec![format!("MONGO_INITDB_DATABASE={}", config.project_name)],
        }]
    }

    fn api_environment(&self, config: &Configuration) -> Vec<String> {
        vec![
            "DATABASE_URL=mongodb://mongo:27017".to_string(),
            format!("MONGO_DATABASE={}", config.project_name),
        ]
    }

    fn environment(&self, config: &Configuration) -> Vec<EnvVar> {
        vec![
            EnvVar::new("DATABASE_URL", local_url(config), "MongoDB connection URL"),
            EnvVar::new("MONGO_DATABASE", &config.project_name, "MongoDB database name"),
        ]
    }

    fn local_exports(&self, config: &Configuration) -> Vec<String> {
        vec![format!("DATABASE_URL=\"${{DATABASE_URL:-{}}}\"", local_url(config))]
    }
}

fn local_url(config: &Configuration) -> &str {
    config.database.url.as_deref().unwrap_or(LOCAL_URL)
}
