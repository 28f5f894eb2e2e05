//! Blueprint enrichment.
//!
//! Fills in feature defaults and appends the models the auth and payments
//! modules depend on. Runs before validation and planning, and is idempotent:
//! a second pass finds every default set and every injected model present.
//!
//! A model the blueprint already declares under the feature's collection name
//! (compared case-insensitively) is used as-is; baseline fields are never
//! merged into it. Validation checks that such a model still carries the
//! fields the feature code binds to.

use tracing::{debug, info};

use crate::ir::{AuthProvider, Configuration, FieldType, Model, PaymentsProvider};

/// Collection backing the auth module when the blueprint names none.
pub const DEFAULT_USER_COLLECTION: &str = "users";

/// Collection backing the payments module when the blueprint names none.
pub const DEFAULT_TRANSACTIONS_COLLECTION: &str = "transactions";

/// Applies feature defaults and model injection in place.
pub fn enrich(config: &mut Configuration) {
    enrich_auth(config);
    enrich_payments(config);
}

fn enrich_auth(config: &mut Configuration) {
    let (collection, provider) = match config.auth.as_mut().filter(|a| a.enabled) {
        Some(auth) => {
            let provider = *auth.provider.get_or_insert(AuthProvider::Firebase);
            if auth.user_collection.trim().is_empty() {
                auth.user_collection = DEFAULT_USER_COLLECTION.to_string();
            }
            (auth.user_collection.clone(), provider)
        }
        None => return,
    };

    if config.has_model(&collection) {
        debug!(model = %collection, "user model declared by blueprint");
        return;
    }

    info!(model = %collection, provider = provider.as_str(), "injecting user model");
    config.models.push(user_model(&collection, provider));
}

fn enrich_payments(config: &mut Configuration) {
    let collection = match config.payments.as_mut().filter(|p| p.enabled) {
        Some(payments) => {
            payments.provider.get_or_insert(PaymentsProvider::MercadoPago);
            if payments.transactions_collection.trim().is_empty() {
                payments.transactions_collection = DEFAULT_TRANSACTIONS_COLLECTION.to_string();
            }
            payments.transactions_collection.clone()
        }
        None => return,
    };

    if config.has_model(&collection) {
        debug!(model = %collection, "transactions model declared by blueprint");
        return;
    }

    info!(model = %collection, "injecting transactions model");
    config.models.push(transactions_model(&collection));
}

/// Baseline user model for the given auth provider.
pub fn user_model(name: &str, provider: AuthProvider) -> Model {
    let model = Model::new(name)
        .protected()
        .field("email", FieldType::String)
        .field("name", FieldType::String)
        .field("picture", FieldType::String)
        .field("role_id", FieldType::String)
        .field("created_at", FieldType::Timestamp)
        .field("updated_at", FieldType::Timestamp);

    match provider {
        AuthProvider::Firebase => model.field("uid", FieldType::String),
        AuthProvider::Jwt => model.field("password_hash", FieldType::String),
    }
}

/// Baseline transactions model.
pub fn transactions_model(name: &str) -> Model {
    Model::new(name)
        .protected()
        .field("amount", FieldType::Float)
        .field("status", FieldType::String)
        .field("provider", FieldType::String)
        .field("payload", FieldType::Text)
        .field("created_at", FieldType::Timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AuthConfig, DatabaseKind, PaymentsConfig};

    fn auth(provider: Option<AuthProvider>, collection: &str) -> AuthConfig {
        AuthConfig {
            enabled: true,
            provider,
            user_collection: collection.to_string(),
        }
    }

    fn payments(collection: &str) -> PaymentsConfig {
        PaymentsConfig {
            enabled: true,
            provider: None,
            transactions_collection: collection.to_string(),
        }
    }

    fn shop() -> Configuration {
        let mut config = Configuration::new("shop", DatabaseKind::Postgresql);
        config.models.push(
            Model::new("products")
                .field("title", FieldType::String)
                .field("price", FieldType::Float),
        );
        config
    }

    #[test]
    fn test_auth_injects_user_model() {
        let mut config = shop();
        config.auth = Some(auth(None, "users"));

        enrich(&mut config);

        let users: Vec<&Model> = config.models.iter().filter(|m| m.is_named("users")).collect();
        assert_eq!(users.len(), 1);
        let users = users[0];
        assert!(users.protected);
        for field in ["email", "name", "picture", "role_id", "uid"] {
            assert_eq!(users.fields[field], FieldType::String, "{field}");
        }
        assert_eq!(users.fields["created_at"], FieldType::Timestamp);
        assert_eq!(users.fields["updated_at"], FieldType::Timestamp);
        assert!(!users.fields.contains_key("password_hash"));
        assert_eq!(config.auth.as_ref().unwrap().provider, Some(AuthProvider::Firebase));
    }

    #[test]
    fn test_jwt_user_model_carries_password_hash() {
        let mut config = shop();
        config.auth = Some(auth(Some(AuthProvider::Jwt), "accounts"));

        enrich(&mut config);

        let accounts = config.find_model("accounts").unwrap();
        assert!(accounts.fields.contains_key("password_hash"));
        assert!(!accounts.fields.contains_key("uid"));
    }

    #[test]
    fn test_blank_collection_defaults() {
        let mut config = shop();
        config.auth = Some(auth(None, "  "));
        config.payments = Some(payments(""));

        enrich(&mut config);

        assert_eq!(config.auth.as_ref().unwrap().user_collection, "users");
        let payments = config.payments.as_ref().unwrap();
        assert_eq!(payments.transactions_collection, "transactions");
        assert_eq!(payments.provider, Some(PaymentsProvider::MercadoPago));
        assert!(config.has_model("users"));
        assert!(config.has_model("transactions"));
    }

    #[test]
    fn test_existing_model_is_not_duplicated_or_merged() {
        let mut config = shop();
        config.models.push(
            Model::new("Users")
                .field("email", FieldType::String)
                .field("uid", FieldType::String),
        );
        config.auth = Some(auth(None, "users"));
        let before = config.models.len();

        enrich(&mut config);

        assert_eq!(config.models.len(), before);
        let users = config.find_model("users").unwrap();
        assert_eq!(users.name, "Users");
        assert_eq!(users.fields.len(), 2);
        assert!(!users.fields.contains_key("picture"));
        assert!(!users.protected);
    }

    #[test]
    fn test_payments_injects_transactions_model() {
        let mut config = shop();
        config.payments = Some(PaymentsConfig {
            enabled: true,
            provider: Some(PaymentsProvider::Stripe),
            transactions_collection: "payments_log".to_string(),
        });

        enrich(&mut config);

        let tx = config.find_model("payments_log").unwrap();
        assert!(tx.protected);
        assert_eq!(tx.fields["amount"], FieldType::Float);
        assert_eq!(tx.fields["payload"], FieldType::Text);
        assert_eq!(tx.fields["created_at"], FieldType::Timestamp);
        assert_eq!(
            config.payments.as_ref().unwrap().provider,
            Some(PaymentsProvider::Stripe)
        );
    }

    #[test]
    fn test_disabled_features_are_untouched() {
        let mut config = shop();
        config.auth = Some(AuthConfig {
            enabled: false,
            provider: None,
            user_collection: String::new(),
        });

        enrich(&mut config);

        assert_eq!(config.models.len(), 1);
        assert_eq!(config.auth.as_ref().unwrap().provider, None);
        assert_eq!(config.auth.as_ref().unwrap().user_collection, "");
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let mut once = shop();
        once.auth = Some(auth(Some(AuthProvider::Jwt), "users"));
        once.payments = Some(payments("transactions"));
        enrich(&mut once);

        let mut twice = once.clone();
        enrich(&mut twice);

        assert_eq!(once, twice);
        let names: Vec<&str> = twice.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["products", "users", "transactions"]);
    }
}
