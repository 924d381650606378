//! Error types for embedfs.
//!
//! Errors raised while loading or validating configuration and parsing CLI
//! arguments end up here. Payload failures have their own
//! [`CodecError`](crate::CodecError).
//!
//! # Examples
//!
//! ```
//! use embedfs_core::{Error, Result};
//!
//! fn check_width(width: usize) -> Result<usize> {
//!     if width == 0 {
//!         return Err(Error::ConfigError {
//!             message: "chunk width must be at least 1".to_string(),
//!         });
//!     }
//!     Ok(width)
//! }
//!
//! let err = check_width(0).unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for embedfs configuration and arguments.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading a configuration file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "bad depth".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if a configuration file could not be read.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias for embedfs core operations.
pub type Result<T> = std::result::Result<T, Error>;
