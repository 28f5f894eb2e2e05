//! Blueprint frontends.
//!
//! A frontend turns a blueprint document into the [`Configuration`] the rest
//! of the pipeline works on. Markdown with an embedded JSON block is the only
//! format today; the trait keeps the generator independent of it.

pub mod markdown;

use std::path::Path;

use crate::diagnostic::GeneratorError;
use crate::ir::Configuration;

/// Trait for blueprint frontends.
pub trait Frontend {
    /// Returns the document format name (e.g., "markdown").
    fn format(&self) -> &str;

    /// Parses blueprint text. `origin` is only used in error messages.
    fn parse_str(&self, source: &str, origin: &Path) -> Result<Configuration, GeneratorError>;

    /// Reads and parses a blueprint file.
    fn parse_file(&self, path: &Path) -> Result<Configuration, GeneratorError> {
        let source = std::fs::read_to_string(path).map_err(|e| GeneratorError::BlueprintUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.parse_str(&source, path)
    }
}

/// Creates the default frontend.
pub fn create_frontend() -> Box<dyn Frontend> {
    Box::new(markdown::MarkdownFrontend::new())
}
