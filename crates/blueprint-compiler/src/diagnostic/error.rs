//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while generating a project.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("I/O failure on '{}': {message}", path.display())]
    #[diagnostic(code(blueprint::io::failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Output directory '{}' already exists", path.display())]
    #[diagnostic(
        code(blueprint::io::output_exists),
        help("Pass --force to replace it, or choose another output directory")
    )]
    OutputExists {
        path: PathBuf,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Failed to read blueprint '{}': {message}", path.display())]
    #[diagnostic(code(blueprint::input::unreadable))]
    BlueprintUnreadable {
        path: PathBuf,
        message: String,
    },

    #[error("No JSON block found in {}", path.display())]
    #[diagnostic(
        code(blueprint::input::missing_json_block),
        help("Embed the configuration in a fenced block that starts with ```json and ends with ```")
    )]
    MissingJsonBlock {
        path: PathBuf,
    },

    #[error("Invalid blueprint JSON at line {line}, column {column}: {message}")]
    #[diagnostic(code(blueprint::input::invalid_json))]
    InvalidJson {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Unsupported database type: {kind}")]
    #[diagnostic(
        code(blueprint::input::unsupported_database),
        help("Supported database types are firestore, postgresql and mongodb")
    )]
    UnsupportedDatabase {
        kind: String,
    },

    #[error("Invalid project name '{name}': {reason}")]
    #[diagnostic(
        code(blueprint::input::invalid_project_name),
        help("Project names start with a letter and contain only letters, digits, '_' and '-'")
    )]
    InvalidProjectName {
        name: String,
        reason: String,
    },

    #[error("Invalid model '{model}': {message}")]
    #[diagnostic(code(blueprint::input::invalid_model))]
    InvalidModel {
        model: String,
        message: String,
    },

    #[error("Model '{model}' has members '{first}' and '{second}' that both become '{identifier}'")]
    #[diagnostic(
        code(blueprint::input::field_collision),
        help("Rename one of the fields or relations")
    )]
    FieldCollision {
        model: String,
        first: String,
        second: String,
        identifier: String,
    },

    #[error("The {feature} module needs field '{field}' ({expected}) on model '{model}'")]
    #[diagnostic(
        code(blueprint::input::feature_model_incomplete),
        help("Declared feature models are used as-is; add the field or drop the model and let it be generated")
    )]
    FeatureModelIncomplete {
        feature: String,
        model: String,
        field: String,
        expected: String,
    },

    // =========================================================================
    // Planning Errors
    // =========================================================================
    #[error("Two artifacts resolve to '{}': {first} and {second}", path.display())]
    #[diagnostic(
        code(blueprint::plan::naming_conflict),
        help("Model names must stay distinct after lower-casing and must not reuse Go types the generator declares")
    )]
    NamingConflict {
        path: PathBuf,
        first: String,
        second: String,
    },

    // =========================================================================
    // Template Errors
    // =========================================================================
    #[error("Failed to render '{template}' for {}: {message}", artifact.display())]
    #[diagnostic(
        code(blueprint::codegen::template),
        help("Templates ship with the generator; this is a generator defect")
    )]
    Template {
        template: String,
        artifact: PathBuf,
        message: String,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid model error.
    pub fn invalid_model(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Whether the error stems from the blueprint rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::BlueprintUnreadable { .. }
                | Self::MissingJsonBlock { .. }
                | Self::InvalidJson { .. }
                | Self::UnsupportedDatabase { .. }
                | Self::InvalidProjectName { .. }
                | Self::InvalidModel { .. }
                | Self::FieldCollision { .. }
                | Self::FeatureModelIncomplete { .. }
        )
    }
}
