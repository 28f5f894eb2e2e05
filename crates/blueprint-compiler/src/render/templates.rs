//! Built-in template bodies.
//!
//! The `.hbs` files live in the crate's `templates/` directory and are
//! embedded into the binary using `include_str!`.

macro_rules! templates {
    ($($variant:ident => $name:literal, $file:literal;)+) => {
        /// A built-in template.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Template {
            $($variant,)+
        }

        impl Template {
            /// Every built-in template, in registration order.
            pub const ALL: &'static [Template] = &[$(Template::$variant,)+];

            /// Registry name, also used in error messages.
            pub fn name(self) -> &'static str {
                match self {
                    $(Template::$variant => $name,)+
                }
            }

            /// Handlebars source.
            pub fn body(self) -> &'static str {
                match self {
                    $(Template::$variant => include_str!(concat!("../../templates/", $file)),)+
                }
            }
        }
    };
}

templates! {
    // Project files
    GoMod => "go_mod", "project/go.mod.hbs";
    GoSum => "go_sum", "project/go.sum.hbs";
    Dockerfile => "dockerfile", "project/Dockerfile.hbs";
    Compose => "compose", "project/docker-compose.yml.hbs";
    Makefile => "makefile", "project/Makefile.hbs";
    Procfile => "procfile", "project/Procfile.hbs";
    EnvExample => "env_example", "project/env.example.hbs";
    GitIgnore => "gitignore", "project/gitignore.hbs";
    Readme => "readme", "project/README.md.hbs";
    Architecture => "architecture", "project/ARCHITECTURE.md.hbs";
    DocsPlaceholder => "docs_placeholder", "project/docs.go.hbs";
    SetupScript => "setup_script", "project/setup.sh.hbs";
    SmokeTestScript => "smoke_test_script", "project/setup_and_test.sh.hbs";
    UpdateDocsScript => "update_docs_script", "project/update_docs.sh.hbs";

    // Database adapters
    FirestoreBase => "firestore_base", "db/firestore.go.hbs";
    PostgresBase => "postgres_base", "db/postgres.go.hbs";
    MongoBase => "mongo_base", "db/mongo.go.hbs";
    FirestoreRepository => "firestore_repository", "db/firestore_repository.go.hbs";
    PostgresRepository => "postgres_repository", "db/postgres_repository.go.hbs";
    MongoRepository => "mongo_repository", "db/mongo_repository.go.hbs";

    // Per-model files
    RepositoryPort => "repository_port", "model/repository_port.go.hbs";
    Domain => "domain", "model/domain.go.hbs";
    Handler => "handler", "model/handler.go.hbs";
    HandlerTest => "handler_test", "model/handler_test.go.hbs";

    // Auth
    FirebaseMiddleware => "firebase_middleware", "auth/firebase_middleware.go.hbs";
    FirebaseHandler => "firebase_handler", "auth/firebase_handler.go.hbs";
    JwtMiddleware => "jwt_middleware", "auth/jwt_middleware.go.hbs";
    JwtHandler => "jwt_handler", "auth/jwt_handler.go.hbs";
    JwtDomain => "jwt_domain", "auth/jwt_domain.go.hbs";

    // Payments
    PaymentsConfig => "payments_config", "payments/config.go.hbs";
    MercadoPago => "mercadopago", "payments/mercadopago.go.hbs";
    Stripe => "stripe", "payments/stripe.go.hbs";

    // Entrypoint
    Main => "main", "entry/main.go.hbs";
    FirebaseAuthWiring => "firebase_auth_wiring", "entry/firebase_auth.go.hbs";
    JwtAuthWiring => "jwt_auth_wiring", "entry/jwt_auth.go.hbs";
    MercadoPagoWiring => "mercadopago_wiring", "entry/mercadopago.go.hbs";
    StripeWiring => "stripe_wiring", "entry/stripe.go.hbs";
    BearerGate => "bearer_gate", "entry/bearer_gate.go.hbs";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = Template::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), Template::ALL.len());
    }

    #[test]
    fn test_go_templates_avoid_triple_braces() {
        for template in Template::ALL {
            let body = template.body();
            assert!(!body.contains("{{{"), "{} contains '{{{{{{'", template.name());
            assert!(!body.contains("}}}"), "{} contains '}}}}}}'", template.name());
        }
    }
}
