//! Authentication module.
//!
//! The generated handlers always assign the fields validation requires.
//! Optional profile fields are only assigned when the user model declares
//! them with a compatible type, so a slimmed-down declared model still
//! compiles.

use serde::Serialize;

use crate::codegen::go::{Binding, GoModule, FIREBASE, GOLANG_JWT, GOOGLE_API, X_CRYPTO};
use crate::codegen::project::{EnvVar, Endpoint};
use crate::ir::{AuthProvider, Configuration, Model};
use crate::render::Template;
use crate::validate::Expect;

/// Context of the auth middleware, handler and domain templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthContext {
    pub project_name: String,
    pub user_model: String,
    /// Standard library imports beyond the ones the handler always uses.
    pub std_imports: Vec<&'static str>,
    /// Firebase: assigned on every login.
    pub profile_bindings: Vec<Binding>,
    /// Firebase: assigned when the login creates the record.
    pub create_bindings: Vec<Binding>,
    /// JWT: assigned on registration.
    pub register_bindings: Vec<Binding>,
}

/// Member holding the password hash of password-based auth.
pub const CREDENTIAL_FIELD: &str = "password_hash";

/// Members of `model` that only the auth handlers write. They are hidden
/// from JSON and left alone by generic updates.
pub fn credential_members(config: &Configuration, model: &Model) -> Vec<&'static str> {
    let holds_credentials = config.enabled_auth().is_some_and(|auth| {
        auth.provider == Some(AuthProvider::Jwt) && model.is_named(&auth.user_collection)
    });
    if holds_credentials && model.fields.contains_key(CREDENTIAL_FIELD) {
        vec![CREDENTIAL_FIELD]
    } else {
        Vec::new()
    }
}

pub(crate) type OptionalSource = (&'static str, Expect, &'static str);

const FIREBASE_PROFILE: &[OptionalSource] = &[
    ("name", Expect::Textual, "identity.Name"),
    ("picture", Expect::Textual, "identity.Picture"),
    ("role_id", Expect::Textual, "roleOr(req.Role, user.RoleId)"),
    ("updated_at", Expect::Timestamp, "time.Now()"),
];

const FIREBASE_CREATE: &[OptionalSource] = &[("created_at", Expect::Timestamp, "time.Now()")];

const JWT_REGISTER: &[OptionalSource] = &[
    ("name", Expect::Textual, "req.Name"),
    ("role_id", Expect::Textual, "defaultRole"),
    ("created_at", Expect::Timestamp, "time.Now()"),
    ("updated_at", Expect::Timestamp, "time.Now()"),
];

/// Bindings whose target field exists on the model with a compatible type.
pub(crate) fn bind(model: &Model, sources: &[OptionalSource]) -> Vec<Binding> {
    sources
        .iter()
        .filter(|(field, expect, _)| model.fields.get(*field).is_some_and(|typ| expect.accepts(*typ)))
        .map(|(field, _, source)| Binding::new(field, *source))
        .collect()
}

pub fn auth_context(project_name: &str, user: &Model, provider: AuthProvider) -> AuthContext {
    let (profile_bindings, create_bindings, register_bindings) = match provider {
        AuthProvider::Firebase => (bind(user, FIREBASE_PROFILE), bind(user, FIREBASE_CREATE), Vec::new()),
        AuthProvider::Jwt => (Vec::new(), Vec::new(), bind(user, JWT_REGISTER)),
    };

    let uses_time = profile_bindings
        .iter()
        .chain(&create_bindings)
        .chain(&register_bindings)
        .any(Binding::uses_time);

    AuthContext {
        project_name: project_name.to_string(),
        user_model: user.name.clone(),
        std_imports: if uses_time { vec!["time"] } else { Vec::new() },
        profile_bindings,
        create_bindings,
        register_bindings,
    }
}

pub fn middleware_template(provider: AuthProvider) -> Template {
    match provider {
        AuthProvider::Firebase => Template::FirebaseMiddleware,
        AuthProvider::Jwt => Template::JwtMiddleware,
    }
}

pub fn handler_template(provider: AuthProvider) -> Template {
    match provider {
        AuthProvider::Firebase => Template::FirebaseHandler,
        AuthProvider::Jwt => Template::JwtHandler,
    }
}

pub fn wiring_template(provider: AuthProvider) -> Template {
    match provider {
        AuthProvider::Firebase => Template::FirebaseAuthWiring,
        AuthProvider::Jwt => Template::JwtAuthWiring,
    }
}

/// Go expression of the middleware guarding protected routes.
pub fn gate(provider: AuthProvider) -> &'static str {
    match provider {
        AuthProvider::Firebase => "authn.Middleware(verifier)",
        AuthProvider::Jwt => "authn.Middleware(issuer)",
    }
}

pub fn modules(provider: AuthProvider) -> &'static [GoModule] {
    match provider {
        AuthProvider::Firebase => &[FIREBASE, GOOGLE_API],
        AuthProvider::Jwt => &[GOLANG_JWT, X_CRYPTO],
    }
}

pub fn environment(provider: AuthProvider, project_id: &str) -> Vec<EnvVar> {
    match provider {
        AuthProvider::Firebase => vec![
            EnvVar::new(
                "FIREBASE_PROJECT_ID",
                project_id,
                "Firebase project whose ID tokens are accepted",
            ),
            EnvVar::new(
                "MOCK_AUTH",
                "false",
                "Set to true to accept any bearer token as a test user (development only)",
            ),
        ],
        AuthProvider::Jwt => vec![EnvVar::new(
            "JWT_SECRET",
            "change-me",
            "HMAC secret signing issued tokens",
        )],
    }
}

/// Go types the provider declares in package domain.
pub fn domain_types(provider: AuthProvider) -> &'static [&'static str] {
    match provider {
        AuthProvider::Firebase => &[],
        AuthProvider::Jwt => &["RegisterRequest", "LoginRequest", "TokenResponse"],
    }
}

/// Exports the smoke test script needs.
pub fn test_exports(provider: AuthProvider) -> Vec<String> {
    match provider {
        AuthProvider::Firebase => vec!["MOCK_AUTH=true".to_string()],
        AuthProvider::Jwt => vec!["JWT_SECRET=smoke-test-secret".to_string()],
    }
}

pub fn endpoints(provider: AuthProvider) -> Vec<Endpoint> {
    match provider {
        AuthProvider::Firebase => vec![
            Endpoint::new("POST", "/auth/login", "bearer token; creates or refreshes the user record"),
            Endpoint::new("GET", "/auth/me", "bearer token"),
            Endpoint::new("GET", "/auth/roles", "bearer token"),
        ],
        AuthProvider::Jwt => vec![
            Endpoint::new("POST", "/auth/register", "public; returns a token"),
            Endpoint::new("POST", "/auth/login", "public; returns a token"),
            Endpoint::new("GET", "/auth/me", "bearer token"),
            Endpoint::new("GET", "/auth/roles", "bearer token"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::user_model;
    use crate::ir::FieldType;

    #[test]
    fn test_firebase_bindings_for_baseline_model() {
        let users = user_model("users", AuthProvider::Firebase);
        let context = auth_context("shop", &users, AuthProvider::Firebase);

        let fields: Vec<&str> = context.profile_bindings.iter().map(|b| b.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Picture", "RoleId", "UpdatedAt"]);
        assert_eq!(context.create_bindings[0].field, "CreatedAt");
        assert!(context.register_bindings.is_empty());
        assert_eq!(context.std_imports, vec!["time"]);
    }

    #[test]
    fn test_minimal_model_binds_nothing_optional() {
        let users = Model::new("Users")
            .field("email", FieldType::String)
            .field("uid", FieldType::String);
        let context = auth_context("shop", &users, AuthProvider::Firebase);

        assert!(context.profile_bindings.is_empty());
        assert!(context.create_bindings.is_empty());
        assert!(context.std_imports.is_empty());
        assert_eq!(context.user_model, "Users");
    }

    #[test]
    fn test_incompatible_optional_field_is_skipped() {
        let users = Model::new("users")
            .field("email", FieldType::String)
            .field("password_hash", FieldType::String)
            .field("name", FieldType::Integer)
            .field("created_at", FieldType::Timestamp);
        let context = auth_context("shop", &users, AuthProvider::Jwt);

        let fields: Vec<&str> = context.register_bindings.iter().map(|b| b.field.as_str()).collect();
        assert_eq!(fields, vec!["CreatedAt"]);
    }

    #[test]
    fn test_templates_follow_provider() {
        assert_eq!(handler_template(AuthProvider::Jwt), Template::JwtHandler);
        assert_eq!(middleware_template(AuthProvider::Firebase), Template::FirebaseMiddleware);
        assert_eq!(gate(AuthProvider::Jwt), "authn.Middleware(issuer)");
    }
}
