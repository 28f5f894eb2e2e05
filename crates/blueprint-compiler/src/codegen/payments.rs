//! Payments module.

use serde::Serialize;

use crate::codegen::auth::{bind, OptionalSource};
use crate::codegen::go::{Binding, GoModule, STRIPE};
use crate::codegen::project::{EnvVar, Endpoint};
use crate::ir::{Model, PaymentsProvider};
use crate::render::Template;
use crate::validate::Expect;

/// An environment-backed setting read through `internal/config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub getter: &'static str,
    pub env: &'static str,
    pub fallback: &'static str,
    pub purpose: &'static str,
}

const MERCADOPAGO_SETTINGS: &[Setting] = &[Setting {
    getter: "MPAccessToken",
    env: "MP_ACCESS_TOKEN",
    fallback: "YOUR_MERCADO_PAGO_ACCESS_TOKEN",
    purpose: "MercadoPago access token",
}];

const STRIPE_SETTINGS: &[Setting] = &[
    Setting {
        getter: "StripeSecretKey",
        env: "STRIPE_SECRET_KEY",
        fallback: "sk_test_placeholder",
        purpose: "Stripe secret API key",
    },
    Setting {
        getter: "StripeWebhookSecret",
        env: "STRIPE_WEBHOOK_SECRET",
        fallback: "whsec_placeholder",
        purpose: "Stripe webhook signing secret",
    },
];

pub fn settings(provider: PaymentsProvider) -> &'static [Setting] {
    match provider {
        PaymentsProvider::MercadoPago => MERCADOPAGO_SETTINGS,
        PaymentsProvider::Stripe => STRIPE_SETTINGS,
    }
}

/// Context of the payments config and service templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentsContext {
    pub project_name: String,
    pub transactions_model: String,
    pub settings: &'static [Setting],
    /// Assignments recording a webhook notification.
    pub bindings: Vec<Binding>,
}

const MERCADOPAGO_RECORD: &[OptionalSource] = &[
    ("provider", Expect::Textual, "\"mercadopago\""),
    ("status", Expect::Textual, "stringField(payload, \"action\", \"received\")"),
    ("payload", Expect::Textual, "string(raw)"),
    ("amount", Expect::Float, "floatField(payload, \"transaction_amount\")"),
    ("created_at", Expect::Timestamp, "time.Now()"),
];

const STRIPE_RECORD: &[OptionalSource] = &[
    ("provider", Expect::Textual, "\"stripe\""),
    ("status", Expect::Textual, "string(event.Type)"),
    ("payload", Expect::Textual, "string(raw)"),
    ("amount", Expect::Float, "floatField(event.Data.Object, \"amount\") / 100"),
    ("created_at", Expect::Timestamp, "time.Now()"),
];

pub fn payments_context(project_name: &str, transactions: &Model, provider: PaymentsProvider) -> PaymentsContext {
    let record = match provider {
        PaymentsProvider::MercadoPago => MERCADOPAGO_RECORD,
        PaymentsProvider::Stripe => STRIPE_RECORD,
    };

    PaymentsContext {
        project_name: project_name.to_string(),
        transactions_model: transactions.name.clone(),
        settings: settings(provider),
        bindings: bind(transactions, record),
    }
}

pub fn service_template(provider: PaymentsProvider) -> Template {
    match provider {
        PaymentsProvider::MercadoPago => Template::MercadoPago,
        PaymentsProvider::Stripe => Template::Stripe,
    }
}

/// Service file name under `internal/payments`.
pub fn service_file(provider: PaymentsProvider) -> &'static str {
    match provider {
        PaymentsProvider::MercadoPago => "mercadopago.go",
        PaymentsProvider::Stripe => "stripe.go",
    }
}

pub fn wiring_template(provider: PaymentsProvider) -> Template {
    match provider {
        PaymentsProvider::MercadoPago => Template::MercadoPagoWiring,
        PaymentsProvider::Stripe => Template::StripeWiring,
    }
}

pub fn modules(provider: PaymentsProvider) -> &'static [GoModule] {
    match provider {
        PaymentsProvider::MercadoPago => &[],
        PaymentsProvider::Stripe => &[STRIPE],
    }
}

pub fn environment(provider: PaymentsProvider) -> Vec<EnvVar> {
    settings(provider)
        .iter()
        .map(|s| EnvVar::new(s.env, "", s.purpose))
        .collect()
}

pub fn endpoints(provider: PaymentsProvider) -> Vec<Endpoint> {
    match provider {
        PaymentsProvider::MercadoPago => vec![
            Endpoint::new("POST", "/payments/mercadopago/preference", "creates a checkout preference"),
            Endpoint::new("POST", "/payments/mercadopago/webhook", "records a notification"),
        ],
        PaymentsProvider::Stripe => vec![
            Endpoint::new("POST", "/payments/stripe/intent", "creates a payment intent"),
            Endpoint::new("POST", "/payments/stripe/webhook", "records a signature-verified event"),
        ],
    }
}

/// Smoke request against the webhook route.
pub fn smoke_request(provider: PaymentsProvider) -> (String, String) {
    match provider {
        PaymentsProvider::MercadoPago => (
            "Posting a MercadoPago notification".to_string(),
            "curl -s -X POST -H \"Content-Type: application/json\" -d '{\"action\": \"payment.created\", \"transaction_amount\": 10.5}' http://localhost:8080/payments/mercadopago/webhook".to_string(),
        ),
        PaymentsProvider::Stripe => (
            "Posting an unsigned Stripe event (expect a signature error)".to_string(),
            "curl -s -X POST -H \"Content-Type: application/json\" -d '{\"type\": \"payment_intent.succeeded\"}' http://localhost:8080/payments/stripe/webhook".to_string(),
        ),
    }
}
