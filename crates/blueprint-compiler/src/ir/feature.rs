//! Database selection and optional feature blocks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Storage backend of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Firestore,
    Postgresql,
    Mongodb,
}

impl DatabaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseKind::Firestore => "firestore",
            DatabaseKind::Postgresql => "postgresql",
            DatabaseKind::Mongodb => "mongodb",
        }
    }
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firestore" => Ok(DatabaseKind::Firestore),
            "postgresql" => Ok(DatabaseKind::Postgresql),
            "mongodb" => Ok(DatabaseKind::Mongodb),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,

    /// Firestore project id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Connection URL for PostgreSQL and MongoDB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Authentication provider family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Bearer tokens verified against Firebase Auth.
    Firebase,
    /// Tokens signed and verified by the generated service itself.
    Jwt,
}

impl AuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProvider::Firebase => "firebase",
            AuthProvider::Jwt => "jwt",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firebase" => Ok(AuthProvider::Firebase),
            "jwt" => Ok(AuthProvider::Jwt),
            other => Err(format!("unknown auth provider '{other}', expected 'firebase' or 'jwt'")),
        }
    }
}

/// Authentication module settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub enabled: bool,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub provider: Option<AuthProvider>,

    #[serde(default)]
    pub user_collection: String,
}

/// Payment provider family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentsProvider {
    /// Checkout preferences plus notification webhook.
    MercadoPago,
    /// Payment intents plus signature-verified webhook.
    Stripe,
}

impl PaymentsProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentsProvider::MercadoPago => "mercadopago",
            PaymentsProvider::Stripe => "stripe",
        }
    }
}

impl FromStr for PaymentsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mercadopago" => Ok(PaymentsProvider::MercadoPago),
            "stripe" => Ok(PaymentsProvider::Stripe),
            other => Err(format!(
                "unknown payments provider '{other}', expected 'mercadopago' or 'stripe'"
            )),
        }
    }
}

/// Payments module settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentsConfig {
    pub enabled: bool,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub provider: Option<PaymentsProvider>,

    #[serde(default, rename = "transactions_collection")]
    pub transactions_collection: String,
}

/// Default pagination of generated list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub default_limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { default_limit: 20 }
    }
}

/// Treats a missing, null or blank string as `None`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_provider_is_none() {
        let auth: AuthConfig =
            serde_json::from_str(r#"{"enabled": true, "provider": ""}"#).unwrap();
        assert_eq!(auth.provider, None);
        assert_eq!(auth.user_collection, "");
    }

    #[test]
    fn test_provider_parsed() {
        let auth: AuthConfig =
            serde_json::from_str(r#"{"enabled": true, "provider": "jwt", "user_collection": "accounts"}"#)
                .unwrap();
        assert_eq!(auth.provider, Some(AuthProvider::Jwt));

        let payments: PaymentsConfig =
            serde_json::from_str(r#"{"enabled": true, "provider": "stripe"}"#).unwrap();
        assert_eq!(payments.provider, Some(PaymentsProvider::Stripe));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = serde_json::from_str::<AuthConfig>(r#"{"enabled": true, "provider": "saml"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown auth provider"));
    }
}
