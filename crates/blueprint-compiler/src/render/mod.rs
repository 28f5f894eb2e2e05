//! Template rendering.
//!
//! Template bodies are Handlebars files under `templates/`, embedded at build
//! time with `include_str!`. They only interpolate and iterate: every choice
//! between backends or providers is made before rendering by picking a
//! different [`Template`].

pub mod case;
mod templates;

use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use thiserror::Error;

pub use templates::Template;

/// A failed render, not yet attributed to an artifact.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("template '{template}': {message}")]
pub struct RenderError {
    pub template: String,
    pub message: String,
}

impl RenderError {
    fn new(template: impl Into<String>, message: impl ToString) -> Self {
        Self {
            template: template.into(),
            message: message.to_string(),
        }
    }
}

handlebars_helper!(title_helper: |s: str| case::title(s));
handlebars_helper!(lower_helper: |s: str| case::lower(s));
handlebars_helper!(pascal_helper: |s: str| case::pascal(s));

/// Renders named templates against serializable contexts.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer with every built-in template registered.
    pub fn new() -> Result<Self, RenderError> {
        let mut renderer = Self::empty();
        for template in Template::ALL {
            renderer
                .registry
                .register_template_string(template.name(), template.body())
                .map_err(|e| RenderError::new(template.name(), e))?;
        }
        Ok(renderer)
    }

    /// Creates a renderer with helpers but no registered templates.
    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("title", Box::new(title_helper));
        registry.register_helper("lower", Box::new(lower_helper));
        registry.register_helper("pascal", Box::new(pascal_helper));
        Self { registry }
    }

    /// Renders a built-in template.
    pub fn render<T: Serialize>(&self, template: Template, context: &T) -> Result<String, RenderError> {
        self.registry
            .render(template.name(), context)
            .map_err(|e| RenderError::new(template.name(), e))
    }

    /// Renders an ad-hoc template body.
    pub fn render_template<T: Serialize>(&self, name: &str, body: &str, context: &T) -> Result<String, RenderError> {
        self.registry
            .render_template(body, context)
            .map_err(|e| RenderError::new(name, e))
    }
}
