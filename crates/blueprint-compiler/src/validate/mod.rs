//! Validation of an enriched configuration.

mod features;
mod structure;

pub use features::{requirements, Expect, FieldRequirement, Feature};
pub use structure::RESERVED_ID;

use crate::diagnostic::GeneratorError;
use crate::ir::Configuration;

/// Validates the entire configuration. Runs after enrichment.
pub fn validate_configuration(config: &Configuration) -> Result<(), GeneratorError> {
    // Validate names and members
    structure::validate_structure(config)?;

    // Validate the models feature code binds to
    features::validate_features(config)?;

    // Dangling relation targets are reported, not rejected
    structure::check_relation_targets(config);

    Ok(())
}
