//! Pack configuration.
//!
//! [`PackConfig`] controls how a source tree is walked and how the result is
//! emitted. It can be built in code, or loaded from a TOML file whose keys
//! mirror the struct fields:
//!
//! ```toml
//! max_depth = 4
//! chunk_width = 90
//! exclude = ["\\.git/", "\\.DS_Store$"]
//! shape = "independent"
//! var_name = "ASSETS"
//! ```
//!
//! # Examples
//!
//! ```
//! use embedfs_core::{OutputShape, PackConfig};
//!
//! let config = PackConfig::default()
//!     .with_max_depth(3)
//!     .with_shape(OutputShape::Independent);
//!
//! assert_eq!(config.depth_limit(), Some(3));
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default recursion bound for directory walks.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default line width of wrapped payload text.
pub const DEFAULT_CHUNK_WIDTH: usize = 76;

/// Shape of the emitted pack.
///
/// All shapes describe the same logical tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputShape {
    /// Rust source built on the shared `embedfs-vfs` runtime types.
    #[default]
    Dependent,
    /// Self-contained Rust source declaring its own node type.
    Independent,
    /// JSON of the nested tree.
    Json,
    /// JSON of the flat directory-to-children view.
    FlatJson,
}

impl OutputShape {
    /// Returns the string representation of the shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_core::OutputShape;
    ///
    /// assert_eq!(OutputShape::FlatJson.as_str(), "flat-json");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dependent => "dependent",
            Self::Independent => "independent",
            Self::Json => "json",
            Self::FlatJson => "flat-json",
        }
    }

    /// Returns `true` if the shape is Rust source rather than JSON.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self, Self::Dependent | Self::Independent)
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dependent" => Ok(Self::Dependent),
            "independent" => Ok(Self::Independent),
            "json" => Ok(Self::Json),
            "flat-json" => Ok(Self::FlatJson),
            _ => Err(Error::InvalidArgument(format!(
                "invalid output shape: '{s}' (expected: dependent, independent, json, or flat-json)"
            ))),
        }
    }
}

/// Settings for walking a source tree and emitting the pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Maximum walk depth, counted in path components below the root.
    ///
    /// `0` means unbounded. Default: 10
    pub max_depth: usize,

    /// Line width of the wrapped base64 payloads.
    ///
    /// Must be at least 1. Default: 76
    pub chunk_width: usize,

    /// Regex patterns that force inclusion of matching paths.
    pub include: Vec<String>,

    /// Regex patterns that exclude matching paths (and whole subtrees for directories).
    pub exclude: Vec<String>,

    /// Emitted shape. Default: dependent
    pub shape: OutputShape,

    /// Name of the generated static. Derived from the source name when `None`.
    pub var_name: Option<String>,

    /// Module-level doc comment placed at the top of generated source.
    pub module_doc: Option<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_width: DEFAULT_CHUNK_WIDTH,
            include: Vec::new(),
            exclude: Vec::new(),
            shape: OutputShape::default(),
            var_name: None,
            module_doc: None,
        }
    }
}

impl PackConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not valid TOML or contains
    /// unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_core::PackConfig;
    ///
    /// let config = PackConfig::from_toml_str("max_depth = 2")?;
    /// assert_eq!(config.max_depth, 2);
    /// assert_eq!(config.chunk_width, 76);
    /// # Ok::<(), embedfs_core::Error>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("invalid pack configuration: {e}"),
        })
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::ConfigError`] if it cannot be parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the configuration for values the walker cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `chunk_width` is zero or `var_name`
    /// is set but empty.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_width == 0 {
            return Err(Error::ConfigError {
                message: "chunk_width must be at least 1".to_string(),
            });
        }
        if self.var_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(Error::ConfigError {
                message: "var_name cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the walk depth bound, or `None` when unbounded.
    #[must_use]
    pub const fn depth_limit(&self) -> Option<usize> {
        if self.max_depth == 0 {
            None
        } else {
            Some(self.max_depth)
        }
    }

    /// Sets the maximum walk depth (`0` = unbounded).
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the payload line width.
    #[must_use]
    pub const fn with_chunk_width(mut self, chunk_width: usize) -> Self {
        self.chunk_width = chunk_width;
        self
    }

    /// Sets the emitted shape.
    #[must_use]
    pub const fn with_shape(mut self, shape: OutputShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the generated variable name.
    #[must_use]
    pub fn with_var_name(mut self, var_name: impl Into<String>) -> Self {
        self.var_name = Some(var_name.into());
        self
    }

    /// Sets the doc comment of generated modules.
    #[must_use]
    pub fn with_module_doc(mut self, module_doc: impl Into<String>) -> Self {
        self.module_doc = Some(module_doc.into());
        self
    }

    /// Appends include patterns.
    #[must_use]
    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Appends exclude patterns.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }
}
