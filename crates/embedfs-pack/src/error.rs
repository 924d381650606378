//! Error types for pack operations.

use embedfs_core::CodecError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pack operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that abort a pack.
///
/// Every variant is fatal: the walker never returns a partial tree.
#[derive(Error, Debug)]
pub enum PackError {
    /// The directory walk failed (unreadable directory, vanished entry, loop).
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Entry being visited when the walk failed
        path: PathBuf,
        /// Underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// An entry could not be stat-ed or read.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_core::PackConfig;
    /// use embedfs_pack::{PackError, Packer};
    ///
    /// let err = Packer::new(PackConfig::default())
    ///     .pack("/definitely/not/here")
    ///     .unwrap_err();
    ///
    /// assert!(matches!(err, PackError::Io { .. }));
    /// ```
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path of the entry on disk
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file's content could not be compressed.
    #[error("Failed to encode {path}: {source}")]
    Encode {
        /// Path of the file on disk
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: CodecError,
    },

    /// Two siblings map to the same entry name.
    #[error("Duplicate entry: {path}")]
    DuplicateEntry {
        /// Virtual path that appears twice
        path: String,
    },

    /// An entry name is not valid UTF-8 and has no virtual path.
    #[error("File name is not valid UTF-8: {}", path.display())]
    InvalidName {
        /// Path of the entry on disk
        path: PathBuf,
    },

    /// An include or exclude pattern is not a valid regular expression.
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidFilter {
        /// The offending pattern
        pattern: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// The pack configuration is unusable.
    #[error(transparent)]
    Config(#[from] embedfs_core::Error),
}

impl PackError {
    /// Returns `true` if the error comes from reading the source tree.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Walk { .. })
    }

    /// Returns `true` if an entry name cannot be represented in the tree.
    #[must_use]
    pub const fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }

    /// Returns `true` if the error comes from the filter patterns.
    #[must_use]
    pub const fn is_filter_error(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. })
    }
}
