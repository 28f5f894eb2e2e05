//! The `cmd/api/main.go` entrypoint.
//!
//! Feature wiring is rendered as separate fragments and spliced into the
//! main template, so the main template never branches on features.

use serde::Serialize;

use crate::codegen::backend::BackendStrategy;
use crate::codegen::go::{self, GoImport};
use crate::codegen::{auth, payments};
use crate::ir::{AuthProvider, Configuration, PaymentsProvider};
use crate::render::{RenderError, Template, TemplateRenderer};

/// Gate of protected routes when no auth module is enabled.
const BEARER_GATE: &str = "requireBearer()";

/// One model's route group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteContext {
    pub name: String,
    pub route: String,
    /// Import alias of the handler package.
    pub alias: String,
    pub protected: bool,
    pub middleware: Vec<String>,
}

/// Context of the feature wiring fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WiringContext {
    pub project_id: String,
    pub user_model: String,
    pub transactions_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrypointContext {
    pub project_name: String,
    pub std_imports: Vec<&'static str>,
    pub third_party_imports: Vec<GoImport>,
    pub project_imports: Vec<GoImport>,
    pub database_init: String,
    pub models: Vec<RouteContext>,
    #[serde(skip)]
    pub fragments: Vec<Template>,
    #[serde(skip)]
    pub wiring: WiringContext,
    #[serde(skip)]
    pub footer: Option<Template>,
}

#[derive(Serialize)]
struct MainView<'a> {
    #[serde(flatten)]
    entry: &'a EntrypointContext,
    sections: Vec<String>,
    footer: String,
}

pub fn entrypoint_context(config: &Configuration, backend: &dyn BackendStrategy) -> EntrypointContext {
    let project = &config.project_name;
    let auth = config.enabled_auth();
    let payments = config.enabled_payments();

    let mut std_imports = vec!["context", "log", "net/http", "os"];
    let mut third_party_imports = Vec::new();
    let mut project_imports = Vec::new();
    let mut fragments = Vec::new();
    let mut wiring = WiringContext {
        project_id: config.firestore_project_id().to_string(),
        ..WiringContext::default()
    };

    let gate = match auth {
        Some(auth_config) => {
            let provider = auth_config.provider.unwrap_or(AuthProvider::Firebase);
            if provider == AuthProvider::Firebase {
                third_party_imports.push(GoImport::new("firebase", "firebase.google.com/go/v4"));
            }
            project_imports.push(GoImport::new("authn", format!("{project}/internal/auth")));
            project_imports.push(GoImport::new("authhandler", format!("{project}/internal/handlers/auth")));
            fragments.push(auth::wiring_template(provider));
            wiring.user_model = declared_name(config, &auth_config.user_collection);
            auth::gate(provider)
        }
        None => {
            std_imports.push("strings");
            BEARER_GATE
        }
    };

    if let Some(payments_config) = payments {
        let provider = payments_config.provider.unwrap_or(PaymentsProvider::MercadoPago);
        project_imports.push(GoImport::new("payments", format!("{project}/internal/payments")));
        fragments.push(payments::wiring_template(provider));
        wiring.transactions_model = declared_name(config, &payments_config.transactions_collection);
    }

    let models = config
        .models
        .iter()
        .map(|model| {
            let alias = go::handler_alias(model);
            project_imports.push(GoImport::new(alias.clone(), format!("{project}/{}", go::handler_dir(model))));
            RouteContext {
                name: model.name.clone(),
                route: go::route(model),
                alias,
                protected: model.protected,
                middleware: if model.protected { vec![gate.to_string()] } else { Vec::new() },
            }
        })
        .collect();

    std_imports.sort_unstable();

    EntrypointContext {
        project_name: project.clone(),
        std_imports,
        third_party_imports,
        project_imports,
        database_init: backend.database_init(config),
        models,
        fragments,
        wiring,
        footer: auth.is_none().then_some(Template::BearerGate),
    }
}

/// Spelling of a feature model as declared, falling back to the collection.
fn declared_name(config: &Configuration, collection: &str) -> String {
    config
        .find_model(collection)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| collection.to_string())
}

/// Renders the fragments, then the main file around them.
pub fn render(renderer: &TemplateRenderer, entry: &EntrypointContext) -> Result<String, RenderError> {
    let sections = entry
        .fragments
        .iter()
        .map(|fragment| renderer.render(*fragment, &entry.wiring))
        .collect::<Result<Vec<_>, _>>()?;

    let footer = match entry.footer {
        Some(template) => renderer.render(template, &entry.wiring)?,
        None => String::new(),
    };

    renderer.render(
        Template::Main,
        &MainView {
            entry,
            sections,
            footer,
        },
    )
}
