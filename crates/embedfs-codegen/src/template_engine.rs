//! Template engine for code generation using Handlebars.
//!
//! Wraps Handlebars with the built-in source templates pre-registered:
//!
//! - `dependent`: module built on the shared `embedfs-vfs` runtime types
//! - `independent`: self-contained module with its own node type
//!
//! Output is Rust source, so HTML escaping is disabled and strict mode
//! turns any missing context field into an error.
//!
//! # Examples
//!
//! ```
//! use embedfs_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "const NAME: &str = \"{{name}}\";").unwrap();
//!
//! let out = engine.render("greeting", &json!({"name": "<raw>"})).unwrap();
//! assert_eq!(out, "const NAME: &str = \"<raw>\";");
//! ```

use crate::error::{CodegenError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Name of the shared-runtime source template.
pub const DEPENDENT_TEMPLATE: &str = "dependent";

/// Name of the self-contained source template.
pub const INDEPENDENT_TEMPLATE: &str = "independent";

/// Template engine for code generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Template`] if a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        engine.register_template_string(
            DEPENDENT_TEMPLATE,
            include_str!("../templates/dependent.rs.hbs"),
        )?;
        engine.register_template_string(
            INDEPENDENT_TEMPLATE,
            include_str!("../templates/independent.rs.hbs"),
        )?;
        Ok(engine)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Render`] if the template is unknown, the
    /// context cannot be serialized, or a referenced field is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| CodegenError::Render {
                name: template_name.to_string(),
                source: Box::new(e),
            })
    }

    /// Registers a custom template, replacing any template with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Template`] if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| CodegenError::Template {
                name: name.to_string(),
                source: Box::new(e),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
