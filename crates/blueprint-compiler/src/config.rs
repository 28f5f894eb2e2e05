//! Generator configuration.

use std::path::PathBuf;

/// Name of the optional credentials file copied into Firebase projects.
pub const CREDENTIALS_FILE_NAME: &str = "firebaseCredentials.json";

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory that receives `<project_name>/`.
    pub output_dir: PathBuf,

    /// Credentials file copied into the project when Firebase is used.
    /// A missing file only produces a warning.
    pub credentials_file: PathBuf,

    /// Replace an existing project directory instead of failing.
    pub overwrite: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            credentials_file: PathBuf::from(CREDENTIALS_FILE_NAME),
            overwrite: false,
        }
    }
}
