//! Error types for code generation.

use thiserror::Error;

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur while generating a pack.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A template failed to parse during registration.
    #[error("Failed to register template '{name}': {source}")]
    Template {
        /// Template name
        name: String,
        /// Parse error
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// A template failed to render.
    #[error("Failed to render template '{name}': {source}")]
    Render {
        /// Template name
        name: String,
        /// Render error
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The tree could not be serialized to JSON.
    #[error("Failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A generated identifier is not a valid Rust identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_codegen::naming::validate_identifier;
    ///
    /// let err = validate_identifier("static").unwrap_err();
    /// assert!(err.is_invalid_name());
    /// ```
    #[error("Invalid identifier '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },
}

impl CodegenError {
    /// Returns `true` for template registration or rendering failures.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::Template { .. } | Self::Render { .. })
    }

    /// Returns `true` if a generated identifier was rejected.
    #[must_use]
    pub const fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }
}
