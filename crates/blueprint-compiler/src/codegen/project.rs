//! Project-level context shared by the build, container, script and
//! documentation templates.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::codegen::backend::BackendStrategy;
use crate::codegen::go::{self, GoModule, BASE_MODULES};
use crate::codegen::{auth, payments};
use crate::ir::{AuthProvider, Configuration, FieldType, Model, PaymentsProvider};

/// A documented environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
    pub comment: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: comment.into(),
        }
    }
}

/// A service started next to the API by docker compose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeService {
    pub name: String,
    pub image: String,
    pub ports: Vec<String>,
    pub environment: Vec<String>,
}

/// A route listed in the README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    pub notes: String,
}

impl Endpoint {
    pub fn new(method: &str, path: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            method: method.to_string(),
            path: path.into(),
            notes: notes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmokeRequest {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub route: String,
    pub access: &'static str,
}

/// Context of every project-level template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectContext {
    pub project_name: String,
    pub project_id: String,
    pub database: &'static str,
    pub database_file: &'static str,
    pub dependencies: Vec<GoModule>,
    pub api_environment: Vec<String>,
    /// Extra YAML lines of the API service, pre-indented.
    pub api_extra: Vec<String>,
    pub compose_services: Vec<ComposeService>,
    pub env: Vec<EnvVar>,
    pub setup_exports: Vec<String>,
    pub test_exports: Vec<String>,
    pub smoke_requests: Vec<SmokeRequest>,
    pub endpoints: Vec<Endpoint>,
    pub models: Vec<ModelSummary>,
    pub default_limit: u32,
}

const BASE_URL: &str = "http://localhost:8080";

pub fn project_context(config: &Configuration, backend: &dyn BackendStrategy) -> ProjectContext {
    let auth = config.enabled_auth().map(|a| a.provider.unwrap_or(AuthProvider::Firebase));
    let payments = config
        .enabled_payments()
        .map(|p| p.provider.unwrap_or(PaymentsProvider::MercadoPago));
    let project_id = config.firestore_project_id().to_string();

    let compose_services = backend.compose_services(config);
    let mut api_extra = Vec::new();
    if !compose_services.is_empty() {
        api_extra.push("    depends_on:".to_string());
        api_extra.extend(compose_services.iter().map(|s| format!("      - {}", s.name)));
    }

    let mut api_environment = vec!["PORT=8080".to_string()];
    api_environment.extend(backend.api_environment(config));

    let mut env = vec![EnvVar::new("PORT", "8080", "HTTP port")];
    env.extend(backend.environment(config));

    let mut test_exports = backend.local_exports(config);
    let mut endpoints = vec![
        Endpoint::new("GET", "/healthz", "health check"),
        Endpoint::new("GET", "/swagger/index.html", "API docs"),
    ];

    if let Some(provider) = auth {
        env.extend(auth::environment(provider, &project_id));
        test_exports.extend(auth::test_exports(provider));
        endpoints.extend(auth::endpoints(provider));
    }

    if let Some(provider) = payments {
        env.extend(payments::environment(provider));
        endpoints.extend(payments::endpoints(provider));
    }

    for model in &config.models {
        endpoints.extend(model_endpoints(model));
    }

    ProjectContext {
        project_name: config.project_name.clone(),
        project_id,
        database: backend.kind().as_str(),
        database_file: backend.base_file(),
        dependencies: dependencies(backend, auth, payments),
        api_environment,
        api_extra,
        compose_services,
        env,
        setup_exports: backend.local_exports(config),
        test_exports,
        smoke_requests: smoke_requests(config, auth, payments),
        endpoints,
        models: config
            .models
            .iter()
            .map(|m| ModelSummary {
                name: m.name.clone(),
                route: go::route(m),
                access: if m.protected { "protected" } else { "public" },
            })
            .collect(),
        default_limit: config.default_page_size(),
    }
}

/// `go.mod` requirements in first-seen order.
fn dependencies(
    backend: &dyn BackendStrategy,
    auth: Option<AuthProvider>,
    payments: Option<PaymentsProvider>,
) -> Vec<GoModule> {
    let groups = [
        BASE_MODULES,
        backend.modules(),
        auth.map(auth::modules).unwrap_or_default(),
        payments.map(payments::modules).unwrap_or_default(),
    ];

    let mut modules: Vec<GoModule> = Vec::new();
    for module in groups.into_iter().flatten() {
        if !modules.iter().any(|m| m.path == module.path) {
            modules.push(*module);
        }
    }
    modules
}

fn model_endpoints(model: &Model) -> Vec<Endpoint> {
    let route = go::route(model);
    let access = if model.protected { "bearer token" } else { "public" };
    vec![
        Endpoint::new("GET", route.clone(), format!("{access}; `limit`, `offset`")),
        Endpoint::new("GET", format!("{route}/:id"), access),
        Endpoint::new("POST", route.clone(), access),
        Endpoint::new("PUT", format!("{route}/:id"), access),
        Endpoint::new("DELETE", format!("{route}/:id"), access),
    ]
}

fn smoke_requests(
    config: &Configuration,
    auth: Option<AuthProvider>,
    payments: Option<PaymentsProvider>,
) -> Vec<SmokeRequest> {
    let mut requests = vec![SmokeRequest {
        label: "Checking health".to_string(),
        command: format!("curl -s {BASE_URL}/healthz"),
    }];

    let bearer = match auth {
        Some(AuthProvider::Firebase) => {
            requests.push(SmokeRequest {
                label: "Logging in with the mock identity".to_string(),
                command: format!(
                    "curl -s -X POST -H \"Authorization: Bearer mock-token\" -H \"Content-Type: application/json\" -d '{{\"role\": \"admin\"}}' {BASE_URL}/auth/login"
                ),
            });
            "mock-token"
        }
        Some(AuthProvider::Jwt) => {
            let credentials = r#"'{"email": "smoke@example.com", "password": "smoke-password"}'"#;
            requests.push(SmokeRequest {
                label: "Registering a user".to_string(),
                command: format!(
                    "curl -s -X POST -H \"Content-Type: application/json\" -d {credentials} {BASE_URL}/auth/register"
                ),
            });
            requests.push(SmokeRequest {
                label: "Logging in".to_string(),
                command: format!(
                    "TOKEN=$(curl -s -X POST -H \"Content-Type: application/json\" -d {credentials} {BASE_URL}/auth/login | sed -n 's/.*\"token\":\"\\([^\"]*\\)\".*/\\1/p')"
                ),
            });
            "$TOKEN"
        }
        None => "test-token",
    };
    let auth_header = format!("-H \"Authorization: Bearer {bearer}\" ");

    for model in &config.models {
        let route = go::route(model);
        let header = if model.protected { auth_header.as_str() } else { "" };
        requests.push(SmokeRequest {
            label: format!("Creating a {} record", model.name),
            command: format!(
                "curl -s -X POST {header}-H \"Content-Type: application/json\" -d '{}' {BASE_URL}{route}",
                shell_quoted(&sample_payload(model))
            ),
        });
        requests.push(SmokeRequest {
            label: format!("Listing {}", model.name),
            command: format!("curl -s {header}\"{BASE_URL}{route}?limit=5\""),
        });
    }

    if let Some(provider) = payments {
        let (label, command) = payments::smoke_request(provider);
        requests.push(SmokeRequest { label, command });
    }

    requests
}

/// JSON body with a plausible value for every member.
fn sample_payload(model: &Model) -> String {
    let mut body = Map::new();
    for (name, typ) in &model.fields {
        let value = match typ {
            FieldType::String | FieldType::Text => Value::from(format!("test_{name}")),
            FieldType::Integer => Value::from(10),
            FieldType::Float => Value::from(99.99),
            FieldType::Boolean => Value::from(true),
            FieldType::Timestamp => Value::from("2024-01-01T00:00:00Z"),
        };
        body.insert(name.clone(), value);
    }
    for (name, relation) in &model.relations {
        let reference = Value::from(format!("test_{name}"));
        let value = if relation.kind.is_collection() {
            Value::Array(vec![reference])
        } else {
            reference
        };
        body.insert(name.clone(), value);
    }
    Value::Object(body).to_string()
}

/// Escapes text for use inside a single-quoted shell word.
fn shell_quoted(text: &str) -> String {
    text.replace('\'', r"'\''")
}
