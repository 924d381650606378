//! Core types for the virtual filesystem.
//!
//! Errors, per-node metadata and path normalization shared by the tree,
//! the handle and the flat view.
//!
//! # Examples
//!
//! ```
//! use embedfs_vfs::types::clean_path;
//!
//! assert_eq!(clean_path("a//b/./c/../d.txt"), "/a/b/d.txt");
//! assert_eq!(clean_path("/../.."), "/");
//! ```

use embedfs_core::CodecError;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Permission bits reported for every node: read-only for everyone.
pub const READ_ONLY_MODE: u32 = 0o444;

/// Errors that can occur during VFS operations.
///
/// Path and node-kind errors are recoverable by the caller. A
/// [`VfsError::Decode`] is cached on its file node and handed out again on
/// every later access to that node.
///
/// # Examples
///
/// ```
/// use embedfs_vfs::VfsError;
///
/// let error = VfsError::NotFound {
///     path: "/missing.txt".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug, Clone)]
pub enum VfsError {
    /// No node exists at the specified path
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// A directory operation was attempted on a file, or a path descends through one
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path of the file node
        path: String,
    },

    /// A file operation was attempted on a directory
    #[error("Is a directory: {path}")]
    IsADirectory {
        /// The path of the directory node
        path: String,
    },

    /// A directory is referenced but the flat view carries no listing for it
    #[error("Directory has no listing: {path}")]
    MissingListing {
        /// The directory path without a listing
        path: String,
    },

    /// Two siblings share a name
    #[error("Duplicate entry: {path}")]
    DuplicateEntry {
        /// The path that appears twice
        path: String,
    },

    /// Path is empty or malformed
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The invalid path
        path: String,
    },

    /// The tree cannot be used as a filesystem
    #[error("Invalid tree: {message}")]
    InvalidTree {
        /// Description of the problem
        message: String,
    },

    /// The file payload could not be decoded
    #[error("Failed to decode {path}: {source}")]
    Decode {
        /// The file whose payload is corrupt
        path: String,
        /// Cached decode failure, shared by every caller
        #[source]
        source: Arc<CodecError>,
    },

    /// File content was requested as text but is not valid UTF-8
    #[error("Not valid UTF-8: {path}: {source}")]
    NotUtf8 {
        /// The file holding the content
        path: String,
        /// Position of the first invalid byte
        #[source]
        source: std::str::Utf8Error,
    },

    /// A bounded directory listing has no entries left
    #[error("End of directory listing")]
    EndOfListing,
}

impl VfsError {
    /// Returns `true` if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a not-a-directory error.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_vfs::VfsError;
    ///
    /// let error = VfsError::NotADirectory {
    ///     path: "/file.txt".to_string(),
    /// };
    ///
    /// assert!(error.is_not_directory());
    /// assert!(!error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_directory(&self) -> bool {
        matches!(self, Self::NotADirectory { .. })
    }

    /// Returns `true` if a file operation hit a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::IsADirectory { .. })
    }

    /// Returns `true` if this is a cached payload decode failure.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns `true` if text was requested from non-UTF-8 content.
    #[must_use]
    pub const fn is_not_utf8(&self) -> bool {
        matches!(self, Self::NotUtf8 { .. })
    }

    /// Returns `true` if a bounded listing ran out of entries.
    #[must_use]
    pub const fn is_end_of_listing(&self) -> bool {
        matches!(self, Self::EndOfListing)
    }

    /// Returns `true` if the tree itself is malformed.
    #[must_use]
    pub const fn is_invalid_tree(&self) -> bool {
        matches!(
            self,
            Self::InvalidTree { .. } | Self::DuplicateEntry { .. } | Self::MissingListing { .. }
        )
    }

    /// Replaces the node-local name in a node error with the full path it was reached by.
    pub(crate) fn at_path(self, full: &str) -> Self {
        match self {
            Self::IsADirectory { .. } => Self::IsADirectory {
                path: full.to_string(),
            },
            Self::NotADirectory { .. } => Self::NotADirectory {
                path: full.to_string(),
            },
            Self::Decode { source, .. } => Self::Decode {
                path: full.to_string(),
                source,
            },
            other => other,
        }
    }
}

impl From<VfsError> for std::io::Error {
    fn from(error: VfsError) -> Self {
        use std::io::ErrorKind;

        let kind = match &error {
            VfsError::NotFound { .. } => ErrorKind::NotFound,
            VfsError::NotADirectory { .. } => ErrorKind::NotADirectory,
            VfsError::IsADirectory { .. } => ErrorKind::IsADirectory,
            VfsError::InvalidPath { .. } => ErrorKind::InvalidInput,
            VfsError::Decode { .. } | VfsError::NotUtf8 { .. } => ErrorKind::InvalidData,
            VfsError::EndOfListing => ErrorKind::UnexpectedEof,
            VfsError::MissingListing { .. }
            | VfsError::DuplicateEntry { .. }
            | VfsError::InvalidTree { .. } => ErrorKind::Other,
        };
        Self::new(kind, error)
    }
}

/// Type alias for VFS operation results.
pub type Result<T> = std::result::Result<T, VfsError>;

/// Metadata of a node, as returned by `stat` and directory listings.
///
/// `size` is the original byte length recorded at pack time; directories
/// report zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Metadata {
    name: String,
    size: u64,
    is_dir: bool,
    mod_time: i64,
    mode: u32,
}

impl Metadata {
    pub(crate) fn new(name: &str, size: u64, is_dir: bool, mod_time: i64) -> Self {
        Self {
            name: name.to_string(),
            size,
            is_dir,
            mod_time,
            mode: READ_ONLY_MODE,
        }
    }

    /// Returns the base name; empty for the root directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the original byte length of a file, or zero for a directory.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns `true` for files.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// Returns the modification time in seconds since the Unix epoch.
    #[must_use]
    pub const fn mod_time(&self) -> i64 {
        self.mod_time
    }

    /// Returns the modification time as a [`SystemTime`].
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        let offset = Duration::from_secs(self.mod_time.unsigned_abs());
        if self.mod_time >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        }
    }

    /// Returns the permission bits, always [`READ_ONLY_MODE`].
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }
}

/// Normalizes a virtual path into its absolute, `/`-separated form.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment;
/// `..` at the root stays at the root.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        cleaned.push('/');
    }
    cleaned
}

/// Joins a directory path and a child name.
pub(crate) fn join_path(dir: &str, name: &str) -> String {
    if dir == "/" || dir.is_empty() {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Returns the parent of an absolute path, or `None` for the root.
pub(crate) fn parent_path(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(pos) => Some(&path[..pos]),
        None => Some("/"),
    }
}
