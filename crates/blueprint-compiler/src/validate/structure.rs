//! Structure validation for names and model members.
//!
//! Checks that every name becomes a usable identifier and that no two
//! members of a model end up as the same struct field.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::diagnostic::GeneratorError;
use crate::ir::{Configuration, Model};
use crate::render::case::pascal;

/// Name of the identity member every generated record carries.
pub const RESERVED_ID: &str = "id";

fn project_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("project name pattern is valid"))
}

fn model_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("model name pattern is valid"))
}

/// Validates the project name and every model.
pub fn validate_structure(config: &Configuration) -> Result<(), GeneratorError> {
    validate_project_name(&config.project_name)?;
    for model in &config.models {
        validate_model(model)?;
    }
    Ok(())
}

fn validate_project_name(name: &str) -> Result<(), GeneratorError> {
    if name.is_empty() {
        return Err(GeneratorError::InvalidProjectName {
            name: name.to_string(),
            reason: "the name is empty".to_string(),
        });
    }

    if !project_name_pattern().is_match(name) {
        return Err(GeneratorError::InvalidProjectName {
            name: name.to_string(),
            reason: "it is used as the Go module path and the output directory name".to_string(),
        });
    }

    Ok(())
}

/// Validates a model name and its members.
fn validate_model(model: &Model) -> Result<(), GeneratorError> {
    if model.name.is_empty() {
        return Err(GeneratorError::invalid_model("", "model name is empty"));
    }

    if !model_name_pattern().is_match(&model.name) {
        return Err(GeneratorError::invalid_model(
            &model.name,
            "model names start with a letter and contain only letters, digits and '_'",
        ));
    }

    for name in model.relations.keys() {
        if model.fields.contains_key(name) {
            return Err(GeneratorError::invalid_model(
                &model.name,
                format!("'{name}' is declared as both a field and a relation"),
            ));
        }
    }

    // identifier -> member that produced it
    let mut identifiers: HashMap<String, &str> = HashMap::new();
    for name in model.member_names() {
        if name.is_empty() {
            return Err(GeneratorError::invalid_model(&model.name, "member names must not be empty"));
        }

        let identifier = pascal(name);
        if name.eq_ignore_ascii_case(RESERVED_ID) || identifier.eq_ignore_ascii_case(RESERVED_ID) {
            return Err(GeneratorError::invalid_model(
                &model.name,
                format!("'{name}' collides with the generated identity field '{RESERVED_ID}'"),
            ));
        }

        if let Some(first) = identifiers.insert(identifier.clone(), name) {
            return Err(GeneratorError::FieldCollision {
                model: model.name.clone(),
                first: first.to_string(),
                second: name.to_string(),
                identifier,
            });
        }
    }

    Ok(())
}

/// Logs relations whose target is not a declared model.
pub fn check_relation_targets(config: &Configuration) {
    for model in &config.models {
        for (name, relation) in &model.relations {
            if !config.has_model(&relation.target) {
                warn!(
                    model = %model.name,
                    relation = %name,
                    target = %relation.target,
                    "relation targets an undeclared model"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DatabaseKind, FieldType, RelationKind};

    fn config_with(model: Model) -> Configuration {
        let mut config = Configuration::new("shop", DatabaseKind::Firestore);
        config.models.push(model);
        config
    }

    #[test]
    fn test_valid_configuration() {
        let model = Model::new("orderItems")
            .field("created_at", FieldType::Timestamp)
            .field("quantity", FieldType::Integer)
            .relation("order_id", RelationKind::BelongsTo, "orders");
        assert!(validate_structure(&config_with(model)).is_ok());
    }

    #[test]
    fn test_project_name_rules() {
        for good in ["shop", "my-shop", "Shop_2"] {
            assert!(validate_project_name(good).is_ok(), "{good}");
        }
        for bad in ["", "2shop", "my shop", "../escape", "shop/api"] {
            let err = validate_project_name(bad).unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidProjectName { .. }), "{bad}");
        }
    }

    #[test]
    fn test_model_name_rules() {
        for bad in ["", "order-items", "9lives", "with space"] {
            let err = validate_model(&Model::new(bad)).unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidModel { .. }), "{bad}");
        }
    }

    #[test]
    fn test_reserved_id_rejected() {
        // "_id" becomes "Id" and "i_d" becomes "ID"
        for name in ["id", "ID", "_id", "i_d"] {
            let model = Model::new("orders").field(name, FieldType::String);
            assert!(validate_model(&model).is_err(), "{name}");
        }
        let relation = Model::new("orders").relation("Id", RelationKind::HasOne, "users");
        assert!(validate_model(&relation).is_err());
    }

    #[test]
    fn test_field_and_relation_with_same_name() {
        let model = Model::new("posts")
            .field("author", FieldType::String)
            .relation("author", RelationKind::BelongsTo, "users");
        assert!(matches!(
            validate_model(&model).unwrap_err(),
            GeneratorError::InvalidModel { .. }
        ));
    }

    #[test]
    fn test_identifier_collision() {
        let model = Model::new("posts")
            .field("created_at", FieldType::Timestamp)
            .field("createdAt", FieldType::String);
        match validate_model(&model).unwrap_err() {
            GeneratorError::FieldCollision { identifier, .. } => assert_eq!(identifier, "CreatedAt"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
