//! Builder pattern for constructing virtual filesystems.
//!
//! Provides a fluent API for building a [`VirtualFs`] from raw contents,
//! without going through the packer. Contents are encoded exactly as the
//! packer would encode them, so the result behaves like an embedded pack.
//!
//! # Examples
//!
//! ```
//! use embedfs_vfs::VfsBuilder;
//!
//! let vfs = VfsBuilder::new()
//!     .add_file("/static/app.js", "console.log('hi');")
//!     .add_file("/static/app.css", "body {}")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(vfs.file_count(), 2);
//! ```

use crate::flat::{DirRecord, FileRecord, FlatTree};
use crate::types::{Result, VfsError, clean_path, parent_path};
use crate::vfs::VirtualFs;
use embedfs_core::{DEFAULT_CHUNK_WIDTH, codec};
use std::collections::BTreeSet;

/// Builder for constructing a virtual filesystem.
///
/// Missing parent directories are created implicitly. Errors are collected
/// and the first one is returned by [`VfsBuilder::build`].
#[derive(Debug)]
pub struct VfsBuilder {
    flat: FlatTree,
    dirs: BTreeSet<String>,
    mod_time: i64,
    chunk_width: usize,
    errors: Vec<VfsError>,
}

impl Default for VfsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VfsBuilder {
    /// Creates a builder holding only the root directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_vfs::VfsBuilder;
    ///
    /// let vfs = VfsBuilder::new().build().unwrap();
    /// assert_eq!(vfs.file_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Self {
            flat: FlatTree::default(),
            dirs: BTreeSet::new(),
            mod_time: 0,
            chunk_width: DEFAULT_CHUNK_WIDTH,
            errors: Vec::new(),
        };
        builder.ensure_dir("/");
        builder
    }

    /// Sets the modification time recorded for entries added afterwards.
    #[must_use]
    pub const fn mod_time(mut self, mod_time: i64) -> Self {
        self.mod_time = mod_time;
        self
    }

    /// Sets the payload line width for files added afterwards.
    #[must_use]
    pub const fn chunk_width(mut self, chunk_width: usize) -> Self {
        self.chunk_width = chunk_width;
        self
    }

    /// Adds an empty directory, and any missing parents.
    #[must_use]
    pub fn add_dir(mut self, path: &str) -> Self {
        let path = clean_path(path);
        if self.has_file(&path) {
            self.errors.push(VfsError::DuplicateEntry { path });
        } else {
            self.ensure_dir(&path);
        }
        self
    }

    /// Adds a file with the given content.
    ///
    /// If the path is invalid or already taken, the error is collected and
    /// returned when `build()` is called.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_vfs::VfsBuilder;
    ///
    /// let result = VfsBuilder::new().add_file("/", "content").build();
    /// assert!(result.is_err());
    /// ```
    #[must_use]
    pub fn add_file(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        if let Err(e) = self.insert_file(path, content.as_ref()) {
            self.errors.push(e);
        }
        self
    }

    /// Adds multiple files at once.
    #[must_use]
    pub fn add_files<P, C>(mut self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: AsRef<[u8]>,
    {
        for (path, content) in files {
            if let Err(e) = self.insert_file(path.as_ref(), content.as_ref()) {
                self.errors.push(e);
            }
        }
        self
    }

    /// Returns the number of files added so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.flat.file_count()
    }

    /// Consumes the builder and returns the constructed filesystem.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding entries, if any.
    pub fn build(self) -> Result<VirtualFs> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        VirtualFs::from_flat(self.flat)
    }

    fn insert_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let path = clean_path(path);
        let Some(parent) = parent_path(&path) else {
            return Err(VfsError::InvalidPath { path });
        };
        if self.dirs.contains(&path) || self.has_file(&path) {
            return Err(VfsError::DuplicateEntry { path });
        }

        let payload = if content.is_empty() {
            String::new()
        } else {
            codec::encode(content, self.chunk_width).map_err(|e| VfsError::InvalidTree {
                message: format!("cannot encode {path}: {e}"),
            })?
        };

        let parent = parent.to_string();
        self.ensure_dir(&parent);
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        self.flat.files.entry(parent).or_default().push(FileRecord {
            path,
            name,
            size: content.len() as u64,
            mod_time: self.mod_time,
            payload,
        });
        Ok(())
    }

    fn ensure_dir(&mut self, path: &str) {
        if self.dirs.contains(path) {
            return;
        }
        if let Some(parent) = parent_path(path) {
            let parent = parent.to_string();
            self.ensure_dir(&parent);
        }
        let name = if path == "/" {
            String::new()
        } else {
            path.rsplit('/').next().unwrap_or_default().to_string()
        };
        self.flat.dirs.push(DirRecord {
            path: path.to_string(),
            name,
            mod_time: self.mod_time,
        });
        self.dirs.insert(path.to_string());
    }

    fn has_file(&self, path: &str) -> bool {
        parent_path(path).is_some_and(|parent| {
            self.flat
                .files_in(parent)
                .iter()
                .any(|record| record.path == path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_new() {
        let vfs = VfsBuilder::new().build().unwrap();
        assert_eq!(vfs.file_count(), 0);
        assert!(vfs.stat("/").unwrap().is_dir());
    }

    #[test]
    fn test_builder_creates_parents() {
        let vfs = VfsBuilder::new()
            .add_file("/a/b/c/d.txt", "deep")
            .build()
            .unwrap();
        assert!(vfs.stat("/a/b").unwrap().is_dir());
        assert_eq!(vfs.read("/a/b/c/d.txt").unwrap(), b"deep");
    }

    #[test]
    fn test_builder_relative_paths_are_rooted() {
        let vfs = VfsBuilder::new().add_file("x.txt", "x").build().unwrap();
        assert!(vfs.exists("/x.txt"));
    }

    #[test]
    fn test_builder_duplicate_file() {
        let err = VfsBuilder::new()
            .add_file("/a.txt", "1")
            .add_file("/a.txt", "2")
            .build()
            .unwrap_err();
        assert!(matches!(err, VfsError::DuplicateEntry { path } if path == "/a.txt"));
    }

    #[test]
    fn test_builder_file_over_dir() {
        let err = VfsBuilder::new()
            .add_dir("/a")
            .add_file("/a", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, VfsError::DuplicateEntry { .. }));
    }

    #[test]
    fn test_builder_root_as_file() {
        let err = VfsBuilder::new().add_file("/", "x").build().unwrap_err();
        assert!(matches!(err, VfsError::InvalidPath { .. }));
    }

    #[test]
    fn test_builder_add_files_and_count() {
        let builder = VfsBuilder::new().add_files([("/one", "1"), ("/two", "22")]);
        assert_eq!(builder.file_count(), 2);
        let vfs = builder.build().unwrap();
        assert_eq!(vfs.stat("/two").unwrap().size(), 2);
    }

    #[test]
    fn test_builder_mod_time_and_width() {
        let data = vec![42u8; 2048];
        let vfs = VfsBuilder::new()
            .mod_time(1_234)
            .chunk_width(8)
            .add_file("/blob", &data)
            .build()
            .unwrap();
        assert_eq!(vfs.stat("/blob").unwrap().mod_time(), 1_234);

        let payload = vfs.root().open("/blob").unwrap().as_file().unwrap().payload();
        assert!(payload.lines().all(|line| line.len() <= 8));
        assert_eq!(vfs.read("/blob").unwrap(), data.as_slice());
    }
}
