//! Go-side vocabulary shared by the context builders.

use serde::Serialize;

use crate::ir::{FieldType, Model, RelationKind};
use crate::render::case::{lower, pascal};

/// A `require` line of the generated `go.mod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoModule {
    pub path: &'static str,
    pub version: &'static str,
}

impl GoModule {
    pub const fn new(path: &'static str, version: &'static str) -> Self {
        Self { path, version }
    }
}

pub const GIN: GoModule = GoModule::new("github.com/gin-gonic/gin", "v1.9.1");
pub const SWAGGO_FILES: GoModule = GoModule::new("github.com/swaggo/files", "v1.0.1");
pub const GIN_SWAGGER: GoModule = GoModule::new("github.com/swaggo/gin-swagger", "v1.6.0");
pub const SWAG: GoModule = GoModule::new("github.com/swaggo/swag", "v1.16.2");
pub const TESTIFY: GoModule = GoModule::new("github.com/stretchr/testify", "v1.8.4");
pub const FIRESTORE: GoModule = GoModule::new("cloud.google.com/go/firestore", "v1.14.0");
pub const FIREBASE: GoModule = GoModule::new("firebase.google.com/go/v4", "v4.13.0");
pub const GOOGLE_API: GoModule = GoModule::new("google.golang.org/api", "v0.150.0");
pub const PGX: GoModule = GoModule::new("github.com/jackc/pgx/v5", "v5.5.0");
pub const MONGO_DRIVER: GoModule = GoModule::new("go.mongodb.org/mongo-driver", "v1.13.0");
pub const GOLANG_JWT: GoModule = GoModule::new("github.com/golang-jwt/jwt/v5", "v5.2.0");
pub const X_CRYPTO: GoModule = GoModule::new("golang.org/x/crypto", "v0.17.0");
pub const STRIPE: GoModule = GoModule::new("github.com/stripe/stripe-go/v76", "v76.8.0");

/// Modules every generated project requires.
pub const BASE_MODULES: &[GoModule] = &[GIN, SWAGGO_FILES, GIN_SWAGGER, SWAG, TESTIFY];

/// An aliased import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoImport {
    pub alias: String,
    pub path: String,
}

impl GoImport {
    pub fn new(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            path: path.into(),
        }
    }
}

/// One `target.Field = source` assignment in generated feature code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// Go struct field name.
    pub field: String,
    /// Go expression.
    pub source: String,
}

impl Binding {
    pub fn new(member: &str, source: impl Into<String>) -> Self {
        Self {
            field: pascal(member),
            source: source.into(),
        }
    }

    pub fn uses_time(&self) -> bool {
        self.source.contains("time.")
    }
}

/// Go type of a field.
pub fn field_type(typ: FieldType) -> &'static str {
    match typ {
        FieldType::String | FieldType::Text => "string",
        FieldType::Integer => "int",
        FieldType::Float => "float64",
        FieldType::Boolean => "bool",
        FieldType::Timestamp => "time.Time",
    }
}

/// Go type of a relation: one reference or a list of them.
pub fn relation_type(kind: RelationKind) -> &'static str {
    if kind.is_collection() {
        "[]string"
    } else {
        "string"
    }
}

/// Collection route of a model.
pub fn route(model: &Model) -> String {
    format!("/api/{}", model.name)
}

/// Handler package directory of a model, relative to the project root.
pub fn handler_dir(model: &Model) -> String {
    format!("internal/handlers/{}", lower(&model.name))
}

/// Import alias of a model's handler package in the entrypoint.
pub fn handler_alias(model: &Model) -> String {
    format!("{}handler", lower(&model.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_uses_pascal_field() {
        let binding = Binding::new("created_at", "time.Now()");
        assert_eq!(binding.field, "CreatedAt");
        assert!(binding.uses_time());
        assert!(!Binding::new("name", "identity.Name").uses_time());
    }

    #[test]
    fn test_model_paths() {
        let model = Model::new("OrderItems");
        assert_eq!(route(&model), "/api/OrderItems");
        assert_eq!(handler_dir(&model), "internal/handlers/orderitems");
        assert_eq!(handler_alias(&model), "orderitemshandler");
    }
}
