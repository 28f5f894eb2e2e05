//! Per-model contexts: domain struct, handler and handler test.

use serde::Serialize;

use crate::codegen::auth;
use crate::codegen::backend::BackendStrategy;
use crate::codegen::go;
use crate::ir::{Configuration, FieldType, Model};

/// One struct field of a domain record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberContext {
    pub name: String,
    pub go_type: &'static str,
    pub tag: String,
}

/// Context of the domain, handler and handler test templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelContext {
    pub project_name: String,
    pub name: String,
    pub route: String,
    pub protected: bool,
    pub default_limit: u32,
    /// Standard library imports of the domain file.
    pub imports: Vec<&'static str>,
    pub id_tag: String,
    pub members: Vec<MemberContext>,
}

pub fn model_context(config: &Configuration, model: &Model, backend: &dyn BackendStrategy) -> ModelContext {
    let credentials = auth::credential_members(config, model);

    let mut typed: Vec<(&str, &'static str)> = model
        .fields
        .iter()
        .map(|(name, typ)| (name.as_str(), go::field_type(*typ)))
        .chain(
            model
                .relations
                .iter()
                .map(|(name, relation)| (name.as_str(), go::relation_type(relation.kind))),
        )
        .collect();
    typed.sort_unstable_by_key(|(name, _)| *name);

    let members = typed
        .into_iter()
        .map(|(name, go_type)| {
            let tag = if credentials.iter().any(|c| *c == name) {
                format!("json:\"-\" {}:\"{name}\"", backend.tag_key())
            } else {
                backend.member_tag(name)
            };
            MemberContext {
                name: name.to_string(),
                go_type,
                tag,
            }
        })
        .collect();

    let imports = if model.fields.values().any(|typ| *typ == FieldType::Timestamp) {
        vec!["time"]
    } else {
        Vec::new()
    };

    ModelContext {
        project_name: config.project_name.clone(),
        name: model.name.clone(),
        route: go::route(model),
        protected: model.protected,
        default_limit: config.default_page_size(),
        imports,
        id_tag: backend.id_tag(),
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::backend::{FirestoreStrategy, PostgresStrategy};
    use crate::enrich::{enrich, user_model};
    use crate::ir::{AuthConfig, AuthProvider, DatabaseKind, RelationKind};

    #[test]
    fn test_members_sorted_with_go_types() {
        let config = Configuration::new("shop", DatabaseKind::Firestore);
        let model = Model::new("orders")
            .field("total", FieldType::Float)
            .field("placed_at", FieldType::Timestamp)
            .relation("item_ids", RelationKind::HasMany, "items")
            .relation("customer_id", RelationKind::BelongsTo, "customers");

        let context = model_context(&config, &model, &FirestoreStrategy);

        let members: Vec<(&str, &str)> = context
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.go_type))
            .collect();
        assert_eq!(
            members,
            vec![
                ("customer_id", "string"),
                ("item_ids", "[]string"),
                ("placed_at", "time.Time"),
                ("total", "float64"),
            ]
        );
        assert_eq!(context.imports, vec!["time"]);
        assert_eq!(context.route, "/api/orders");
        assert_eq!(context.default_limit, 20);
    }

    #[test]
    fn test_no_time_import_without_timestamps() {
        let config = Configuration::new("shop", DatabaseKind::Firestore);
        let model = Model::new("tags").field("label", FieldType::String);
        assert!(model_context(&config, &model, &FirestoreStrategy).imports.is_empty());
    }

    #[test]
    fn test_password_hash_hidden_from_json() {
        let mut config = Configuration::new("shop", DatabaseKind::Postgresql);
        config.auth = Some(AuthConfig {
            enabled: true,
            provider: Some(AuthProvider::Jwt),
            user_collection: "users".to_string(),
        });
        enrich(&mut config);

        let users = config.find_model("users").unwrap();
        let context = model_context(&config, users, &PostgresStrategy);
        let hash = context.members.iter().find(|m| m.name == "password_hash").unwrap();
        assert_eq!(hash.tag, r#"json:"-" db:"password_hash""#);
        let email = context.members.iter().find(|m| m.name == "email").unwrap();
        assert_eq!(email.tag, r#"json:"email" db:"email""#);
    }

    #[test]
    fn test_password_hash_visible_without_jwt_auth() {
        let config = Configuration::new("shop", DatabaseKind::Firestore);
        let users = user_model("users", AuthProvider::Jwt);
        let context = model_context(&config, &users, &FirestoreStrategy);
        let hash = context.members.iter().find(|m| m.name == "password_hash").unwrap();
        assert!(hash.tag.starts_with(r#"json:"password_hash""#));
    }
}
