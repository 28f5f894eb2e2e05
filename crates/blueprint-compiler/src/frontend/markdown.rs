//! Markdown blueprint frontend.
//!
//! The configuration lives in the first fenced block opened with ```` ```json ````
//! and closed by a line holding only ```` ``` ````. Everything else in the
//! document is prose for humans and is ignored.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::Frontend;
use crate::diagnostic::GeneratorError;
use crate::ir::{Configuration, DatabaseKind};

fn json_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?ms)^[ \t]*```json[ \t]*\r?\n(.*?)^[ \t]*```[ \t]*\r?$")
            .expect("json block pattern is valid")
    })
}

/// A located JSON block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonBlock<'a> {
    /// Block contents, without the fences.
    pub body: &'a str,
    /// Zero-based document line of the first body line.
    pub first_line: usize,
}

/// Finds the first fenced JSON block in a markdown document.
pub fn find_json_block(source: &str) -> Option<JsonBlock<'_>> {
    let captures = json_block_pattern().captures(source)?;
    let body = captures.get(1)?;
    let first_line = source[..body.start()].matches('\n').count();
    Some(JsonBlock {
        body: body.as_str(),
        first_line,
    })
}

/// Markdown frontend implementation.
#[derive(Debug, Default)]
pub struct MarkdownFrontend;

impl MarkdownFrontend {
    pub fn new() -> Self {
        Self
    }

    fn decode(&self, block: JsonBlock<'_>) -> Result<Configuration, GeneratorError> {
        let invalid = |e: serde_json::Error| GeneratorError::InvalidJson {
            message: e.to_string(),
            line: block.first_line + e.line(),
            column: e.column(),
        };

        let value: Value = serde_json::from_str(block.body).map_err(invalid)?;

        // Report an unknown backend by name instead of as a serde variant error.
        if let Some(kind) = value
            .get("database")
            .and_then(|db| db.get("type"))
            .and_then(Value::as_str)
        {
            kind.parse::<DatabaseKind>()
                .map_err(|kind| GeneratorError::UnsupportedDatabase { kind })?;
        }

        serde_json::from_value(value).map_err(|e| GeneratorError::InvalidJson {
            message: e.to_string(),
            line: block.first_line + 1,
            column: 0,
        })
    }
}

impl Frontend for MarkdownFrontend {
    fn format(&self) -> &str {
        "markdown"
    }

    fn parse_str(&self, source: &str, origin: &Path) -> Result<Configuration, GeneratorError> {
        let block = find_json_block(source).ok_or_else(|| GeneratorError::MissingJsonBlock {
            path: origin.to_path_buf(),
        })?;
        self.decode(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUEPRINT: &str = r#"# Shop

Some prose about the project.

```json
{
  "project_name": "shop",
  "database": { "type": "mongodb" },
  "models": [ { "name": "products", "fields": { "title": "string" } } ]
}
```

```json
{ "project_name": "ignored", "models": [] }
```
"#;

    fn parse(source: &str) -> Result<Configuration, GeneratorError> {
        MarkdownFrontend::new().parse_str(source, Path::new("blueprint.md"))
    }

    #[test]
    fn test_first_block_wins() {
        let config = parse(BLUEPRINT).unwrap();
        assert_eq!(config.project_name, "shop");
        assert_eq!(config.database.kind, DatabaseKind::Mongodb);
        assert_eq!(config.models.len(), 1);
    }

    #[test]
    fn test_block_position() {
        let block = find_json_block(BLUEPRINT).unwrap();
        assert_eq!(block.first_line, 5);
        assert!(block.body.trim_start().starts_with('{'));
    }

    #[test]
    fn test_missing_block_is_fatal() {
        let err = parse("# Nothing here\n\n```yaml\nproject_name: x\n```\n").unwrap_err();
        assert!(matches!(err, GeneratorError::MissingJsonBlock { .. }));
    }

    #[test]
    fn test_unterminated_block_is_missing() {
        let err = parse("```json\n{ \"project_name\": \"x\", \"models\": [] }\n").unwrap_err();
        assert!(matches!(err, GeneratorError::MissingJsonBlock { .. }));
    }

    #[test]
    fn test_unsupported_database() {
        let source = "```json\n{ \"project_name\": \"x\", \"database\": { \"type\": \"sqlite\" }, \"models\": [] }\n```\n";
        match parse(source).unwrap_err() {
            GeneratorError::UnsupportedDatabase { kind } => assert_eq!(kind, "sqlite"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_reports_document_line() {
        let source = "intro\n```json\n{\n  \"project_name\": \"x\",\n  oops\n}\n```\n";
        match parse(source).unwrap_err() {
            GeneratorError::InvalidJson { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_unreadable() {
        let err = MarkdownFrontend::new()
            .parse_file(Path::new("/definitely/not/here/blueprint.md"))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::BlueprintUnreadable { .. }));
    }
}
