//! Types for pack generation.
//!
//! [`GenerateOptions`] selects the output shape and names, [`GeneratedPack`]
//! carries the rendered result, and [`SourceContext`] is the data handed to
//! the source templates.
//!
//! # Examples
//!
//! ```
//! use embedfs_codegen::{GenerateOptions, GeneratedPack};
//! use embedfs_core::OutputShape;
//!
//! let options = GenerateOptions::new("ASSETS").with_shape(OutputShape::Json);
//! let pack = GeneratedPack::new(&options, "{}".to_string());
//!
//! assert_eq!(pack.file_extension(), "json");
//! ```

use crate::error::Result;
use crate::naming::{self, FALLBACK_NAME};
use embedfs_core::{OutputShape, PackConfig};
use serde::{Deserialize, Serialize};

/// Options controlling how a tree is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output shape
    pub shape: OutputShape,
    /// Name of the generated static
    pub var_name: String,
    /// Module-level doc text, one `//!` line per text line
    pub module_doc: Option<String>,
}

impl GenerateOptions {
    /// Creates dependent-shape options with the given static name.
    #[must_use]
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            shape: OutputShape::default(),
            var_name: var_name.into(),
            module_doc: None,
        }
    }

    /// Builds options from a pack configuration.
    ///
    /// `default_name` is used when the configuration does not name the
    /// static; it is normalized to `UPPER_SNAKE_CASE` first.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidName`](crate::CodegenError::InvalidName)
    /// if the resulting name is not a valid identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_codegen::GenerateOptions;
    /// use embedfs_core::PackConfig;
    ///
    /// let options = GenerateOptions::from_config(&PackConfig::default(), "site-assets").unwrap();
    /// assert_eq!(options.var_name, "SITE_ASSETS");
    ///
    /// let named = PackConfig::default().with_var_name("fn");
    /// assert!(GenerateOptions::from_config(&named, "x").is_err());
    /// ```
    pub fn from_config(config: &PackConfig, default_name: &str) -> Result<Self> {
        let var_name = match &config.var_name {
            Some(name) => name.clone(),
            None => {
                let derived = naming::to_upper_snake_case(default_name);
                if derived.is_empty() {
                    FALLBACK_NAME.to_string()
                } else {
                    derived
                }
            }
        };
        naming::validate_identifier(&var_name)?;

        Ok(Self {
            shape: config.shape,
            var_name,
            module_doc: config.module_doc.clone(),
        })
    }

    /// Sets the output shape.
    #[must_use]
    pub const fn with_shape(mut self, shape: OutputShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the module doc text.
    #[must_use]
    pub fn with_module_doc(mut self, module_doc: impl Into<String>) -> Self {
        self.module_doc = Some(module_doc.into());
        self
    }
}

/// Rendered pack ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPack {
    /// Shape the content was rendered in
    pub shape: OutputShape,
    /// Name of the generated static (unused by the JSON shapes)
    pub var_name: String,
    /// Rendered text
    pub content: String,
}

impl GeneratedPack {
    /// Wraps rendered content with the options that produced it.
    #[must_use]
    pub fn new(options: &GenerateOptions, content: String) -> Self {
        Self {
            shape: options.shape,
            var_name: options.var_name.clone(),
            content,
        }
    }

    /// Returns the conventional file extension for the shape.
    #[must_use]
    pub const fn file_extension(&self) -> &'static str {
        if self.shape.is_source() { "rs" } else { "json" }
    }

    /// Returns the content length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if nothing was rendered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Context for rendering a source template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceContext {
    /// Generator version stamped into the header
    pub version: String,
    /// Lines of the module doc comment
    pub doc_lines: Vec<String>,
    /// Name of the generated static
    pub var_name: String,
    /// `PascalCase` prefix for the types of the independent shape
    pub type_prefix: String,
    /// Number of files in the tree
    pub file_count: usize,
    /// Number of directories in the tree, root included
    pub dir_count: usize,
    /// Pre-rendered constructor expression for the root node
    pub tree: String,
}
