//! Feature model validation.
//!
//! Declared feature models are used as-is, so the fields the generated auth
//! and payments code assigns must exist with a compatible type.

use crate::diagnostic::GeneratorError;
use crate::ir::{AuthProvider, Configuration, FieldType, Model};

/// Feature module that binds to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Auth(AuthProvider),
    Payments,
}

impl Feature {
    pub fn label(self) -> &'static str {
        match self {
            Feature::Auth(_) => "auth",
            Feature::Payments => "payments",
        }
    }
}

/// Accepted field types for a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// `string` or `text`.
    Textual,
    Timestamp,
    Float,
}

impl Expect {
    pub fn accepts(self, typ: FieldType) -> bool {
        match self {
            Expect::Textual => typ.is_textual(),
            Expect::Timestamp => typ == FieldType::Timestamp,
            Expect::Float => typ == FieldType::Float,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Expect::Textual => "string or text",
            Expect::Timestamp => "timestamp",
            Expect::Float => "float",
        }
    }
}

/// A field a feature assigns unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRequirement {
    pub name: &'static str,
    pub expect: Expect,
}

const fn require(name: &'static str, expect: Expect) -> FieldRequirement {
    FieldRequirement { name, expect }
}

const FIREBASE_USER: &[FieldRequirement] = &[
    require("email", Expect::Textual),
    require("uid", Expect::Textual),
];

const JWT_USER: &[FieldRequirement] = &[
    require("email", Expect::Textual),
    require("password_hash", Expect::Textual),
];

const TRANSACTION: &[FieldRequirement] = &[
    require("provider", Expect::Textual),
    require("status", Expect::Textual),
    require("payload", Expect::Textual),
    require("created_at", Expect::Timestamp),
];

/// Fields a feature requires on its model.
pub fn requirements(feature: Feature) -> &'static [FieldRequirement] {
    match feature {
        Feature::Auth(AuthProvider::Firebase) => FIREBASE_USER,
        Feature::Auth(AuthProvider::Jwt) => JWT_USER,
        Feature::Payments => TRANSACTION,
    }
}

/// Validates the models of every enabled feature.
pub fn validate_features(config: &Configuration) -> Result<(), GeneratorError> {
    if let Some(auth) = config.enabled_auth() {
        let provider = auth.provider.unwrap_or(AuthProvider::Firebase);
        check_feature_model(config, Feature::Auth(provider), &auth.user_collection)?;
    }

    if let Some(payments) = config.enabled_payments() {
        check_feature_model(config, Feature::Payments, &payments.transactions_collection)?;
    }

    Ok(())
}

fn check_feature_model(config: &Configuration, feature: Feature, collection: &str) -> Result<(), GeneratorError> {
    let model = config.find_model(collection).ok_or_else(|| GeneratorError::FeatureModelIncomplete {
        feature: feature.label().to_string(),
        model: collection.to_string(),
        field: "(model)".to_string(),
        expected: "a declared or injected model".to_string(),
    })?;
    check_model(feature, model)
}

fn check_model(feature: Feature, model: &Model) -> Result<(), GeneratorError> {
    for requirement in requirements(feature) {
        let present = model.fields.get(requirement.name).copied();
        if !present.is_some_and(|typ| requirement.expect.accepts(typ)) {
            return Err(GeneratorError::FeatureModelIncomplete {
                feature: feature.label().to_string(),
                model: model.name.clone(),
                field: requirement.name.to_string(),
                expected: requirement.expect.describe().to_string(),
            });
        }
    }
    Ok(())
}
