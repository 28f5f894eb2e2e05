//! In-memory representation of a blueprint.
//!
//! The frontend deserializes the blueprint JSON into a [`Configuration`];
//! enrichment extends it in place and every later stage reads it.

mod feature;
mod model;

pub use feature::{
    AuthConfig, AuthProvider, Database, DatabaseKind, Pagination, PaymentsConfig, PaymentsProvider,
};
pub use model::{FieldType, Model, Relation, RelationKind, RelationParseError};

use serde::{Deserialize, Serialize};

/// Fallback Firestore project id when the blueprint names none.
pub const DEFAULT_FIRESTORE_PROJECT_ID: &str = "your-project-id";

/// Root of a parsed blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub project_name: String,

    #[serde(default)]
    pub database: Database,

    /// Legacy spelling of `database.project_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore_project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments: Option<PaymentsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,

    pub models: Vec<Model>,
}

impl Configuration {
    pub fn new(project_name: impl Into<String>, database: DatabaseKind) -> Self {
        Self {
            project_name: project_name.into(),
            database: Database {
                kind: database,
                project_id: None,
                url: None,
            },
            firestore_project_id: None,
            auth: None,
            payments: None,
            pagination: None,
            models: Vec::new(),
        }
    }

    /// The auth block, only when enabled.
    pub fn enabled_auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref().filter(|a| a.enabled)
    }

    /// The payments block, only when enabled.
    pub fn enabled_payments(&self) -> Option<&PaymentsConfig> {
        self.payments.as_ref().filter(|p| p.enabled)
    }

    /// Looks a model up by case-insensitive name.
    pub fn find_model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.is_named(name))
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.find_model(name).is_some()
    }

    /// Firestore project id, preferring the database block over the legacy key.
    pub fn firestore_project_id(&self) -> &str {
        self.database
            .project_id
            .as_deref()
            .or(self.firestore_project_id.as_deref())
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(DEFAULT_FIRESTORE_PROJECT_ID)
    }

    /// Page size of list endpoints. Zero falls back to the default.
    pub fn default_page_size(&self) -> u32 {
        self.pagination
            .map(|p| p.default_limit)
            .filter(|limit| *limit > 0)
            .unwrap_or_else(|| Pagination::default().default_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_configuration() {
        let json = r#"{
            "project_name": "shop",
            "database": { "type": "postgresql", "url": "postgres://localhost/shop" },
            "auth": { "enabled": true, "provider": "jwt" },
            "payments": { "enabled": false },
            "pagination": { "default_limit": 50 },
            "models": [
                {
                    "name": "orders",
                    "protected": true,
                    "fields": { "total": "float", "placed_at": "timestamp" },
                    "relations": { "customer_id": "belongsTo:users" }
                }
            ]
        }"#;

        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.database.kind, DatabaseKind::Postgresql);
        assert_eq!(config.default_page_size(), 50);
        assert!(config.enabled_auth().is_some());
        assert!(config.enabled_payments().is_none());

        let orders = config.find_model("ORDERS").unwrap();
        assert!(orders.protected);
        assert_eq!(orders.fields["total"], FieldType::Float);
        assert_eq!(orders.relations["customer_id"].kind, RelationKind::BelongsTo);
    }

    #[test]
    fn test_legacy_blueprint_defaults_to_firestore() {
        let json = r#"{
            "project_name": "legacy",
            "firestore_project_id": "legacy-prod",
            "models": []
        }"#;

        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.database.kind, DatabaseKind::Firestore);
        assert_eq!(config.firestore_project_id(), "legacy-prod");
        assert_eq!(config.default_page_size(), 20);
    }

    #[test]
    fn test_zero_page_size_uses_default() {
        let json = r#"{
            "project_name": "notes",
            "pagination": { "default_limit": 0 },
            "models": []
        }"#;

        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_page_size(), 20);
    }

    #[test]
    fn test_missing_models_is_an_error() {
        let json = r#"{ "project_name": "empty" }"#;
        assert!(serde_json::from_str::<Configuration>(json).is_err());
    }
}
