//! Template rendering on top of minijinja.
//!
//! A thin wrapper that renders single strings against a row context and
//! maps the engine's error kinds onto the crate's error type, so callers
//! can tell malformed marker syntax apart from a missing value.

use crate::common::{Error, Result};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};

/// Renders text strings against a variable context.
///
/// Marker-free text is returned unchanged. Undefined variables are strict:
/// referencing a column that does not exist is an error, not an empty
/// substitution.
///
/// # Example
///
/// ```
/// use minijinja::context;
/// use pomelo::merge::TemplateRenderer;
///
/// let renderer = TemplateRenderer::new();
/// let ctx = context! { name => "Alice" };
///
/// assert_eq!(renderer.render("Hi {{ name }}!", &ctx).unwrap(), "Hi Alice!");
/// assert_eq!(renderer.render("no markers", &ctx).unwrap(), "no markers");
/// assert!(renderer.render("{{ name", &ctx).is_err());
/// ```
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer with strict undefined-variable behavior.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Render `text` against `ctx`.
    ///
    /// Fails with [`Error::TemplateSyntax`] when the marker syntax is
    /// malformed (e.g. an opening delimiter with no matching closing
    /// delimiter) and with [`Error::UndefinedVariable`] when a marker
    /// references a variable missing from the context. Text containing no
    /// markers renders to itself.
    pub fn render(&self, text: &str, ctx: &minijinja::Value) -> Result<String> {
        self.env.render_str(text, ctx).map_err(map_template_err)
    }

    /// Check whether `text` parses as a complete template.
    ///
    /// A pure syntax probe: no variables are resolved, so an unterminated
    /// marker is the only way to fail. Used by the run merger to decide
    /// whether a marker closes within a single run.
    pub fn is_well_formed(&self, text: &str) -> bool {
        self.env.template_from_str(text).is_ok()
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn map_template_err(err: minijinja::Error) -> Error {
    match err.kind() {
        ErrorKind::SyntaxError => Error::TemplateSyntax(err.to_string()),
        ErrorKind::UndefinedError => Error::UndefinedVariable(err.to_string()),
        _ => Error::TemplateRender(err.to_string()),
    }
}
