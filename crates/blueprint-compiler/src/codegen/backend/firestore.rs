use crate::codegen::go::{GoModule, FIREBASE, FIRESTORE, GOOGLE_API};
use crate::codegen::project::EnvVar;
use crate::config::CREDENTIALS_FILE_NAME;
use crate::ir::{Configuration, DatabaseKind};
use crate::render::Template;

use super::BackendStrategy;

/// Google Cloud Firestore, one collection per model.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirestoreStrategy;

impl BackendStrategy for FirestoreStrategy {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Firestore
    }

    fn base_template(&self) -> Template {
        Template::FirestoreBase
    }

    fn base_file(&self) -> &'static str {
        "firestore.go"
    }

    fn base_type(&self) -> &'static str {
        "FirestoreRepository"
    }

    fn repository_template(&self) -> Template {
        Template::FirestoreRepository
    }

    fn tag_key(&self) -> &'static str {
        "firestore"
    }

    fn id_tag(&self) -> String {
        r#"json:"id" firestore:"-""#.to_string()
    }

    fn modules(&self) -> &'static [GoModule] {
        &[FIRESTORE, FIREBASE, GOOGLE_API]
    }

    fn database_init(&self, config: &Configuration) -> String {
        format!(
            "db.NewFirestoreRepository(ctx, envOr(\"FIRESTORE_PROJECT_ID\", \"{}\"), \"{CREDENTIALS_FILE_NAME}\")",
            config.firestore_project_id()
        )
    }

    fn api_environment(&self, config: &Configuration) -> Vec<String> {
        vec![format!("FIRESTORE_PROJECT_ID={}", config.firestore_project_id())]
    }

    fn environment(&self, config: &Configuration) -> Vec<EnvVar> {
        vec![EnvVar::new(
            "FIRESTORE_PROJECT_ID",
            config.firestore_project_id(),
            format!("Firestore project; credentials are read from {CREDENTIALS_FILE_NAME} when present"),
        )]
    }
}
