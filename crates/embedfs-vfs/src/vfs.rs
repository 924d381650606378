//! The read-only virtual filesystem.
//!
//! [`VirtualFs`] owns a root directory [`Node`] and serves path-based
//! lookups against it. It is immutable after construction and is `Send +
//! Sync`, so it can be stored in a `static` and shared by any number of
//! threads.
//!
//! # Examples
//!
//! ```
//! use embedfs_vfs::VfsBuilder;
//!
//! let vfs = VfsBuilder::new()
//!     .add_file("/static/index.html", "<h1>hi</h1>")
//!     .build()?;
//!
//! assert!(vfs.exists("/static/index.html"));
//! assert_eq!(vfs.read("static/./index.html")?, b"<h1>hi</h1>");
//! assert!(vfs.stat("/static")?.is_dir());
//! # Ok::<(), embedfs_vfs::VfsError>(())
//! ```

use crate::flat::FlatTree;
use crate::handle::Handle;
use crate::node::Node;
use crate::types::{Metadata, Result, VfsError, clean_path};
use serde::Deserialize;

/// A read-only filesystem backed by an embedded tree.
///
/// Paths are always `/`-separated. They are cleaned before lookup: empty
/// and `.` segments are ignored, and `..` cannot climb above the root.
#[derive(Debug)]
pub struct VirtualFs {
    root: Node,
}

/// Either persisted shape of a pack.
#[derive(Deserialize)]
#[serde(untagged)]
enum PackDocument {
    Nested(Node),
    Flat(FlatTree),
}

impl VirtualFs {
    /// Wraps a root directory node.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidTree`] if the root is not a directory or has
    /// a non-empty name, and [`VfsError::DuplicateEntry`] if any directory has
    /// two children with the same name.
    pub fn new(root: Node) -> Result<Self> {
        if !root.is_dir() {
            return Err(VfsError::InvalidTree {
                message: format!("root must be a directory, found file {:?}", root.name()),
            });
        }
        if !root.name().is_empty() {
            return Err(VfsError::InvalidTree {
                message: format!("root directory must be unnamed, found {:?}", root.name()),
            });
        }
        root.check_unique_names("/")?;
        Ok(Self { root })
    }

    /// Builds a filesystem from the flat directory-to-children view.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::MissingListing`] if a referenced directory has no
    /// listing, plus any error of [`VirtualFs::new`].
    pub fn from_flat(flat: FlatTree) -> Result<Self> {
        Self::new(flat.into_node()?)
    }

    /// Loads a filesystem from JSON in either the nested or the flat shape.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidTree`] if the text is neither shape, plus
    /// any error of [`VirtualFs::new`] or [`VirtualFs::from_flat`].
    pub fn from_json(text: &str) -> Result<Self> {
        let document: PackDocument =
            serde_json::from_str(text).map_err(|e| VfsError::InvalidTree {
                message: format!("unrecognized pack document: {e}"),
            })?;
        match document {
            PackDocument::Nested(root) => Self::new(root),
            PackDocument::Flat(flat) => Self::from_flat(flat),
        }
    }

    /// Returns the root directory node.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Opens the node at `path`.
    ///
    /// Every node on the path is prepared, but a corrupt payload does not
    /// fail the open: its cached error surfaces on the first read or stat.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] if nothing exists at `path` and
    /// [`VfsError::NotADirectory`] if the path descends through a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_vfs::VfsBuilder;
    ///
    /// let vfs = VfsBuilder::new().add_file("/a/b.txt", "hi").build()?;
    ///
    /// assert!(vfs.open("/a/missing.txt").unwrap_err().is_not_found());
    /// assert!(vfs.open("/a/b.txt/x").unwrap_err().is_not_directory());
    /// # Ok::<(), embedfs_vfs::VfsError>(())
    /// ```
    pub fn open(&self, path: &str) -> Result<Handle<'_>> {
        let path = clean_path(path);
        let node = self.resolve(&path)?;
        Ok(Handle::new(node, path))
    }

    /// Reads the whole decoded content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns any [`VirtualFs::open`] error, [`VfsError::IsADirectory`] for a
    /// directory, and [`VfsError::Decode`] for a corrupt payload.
    pub fn read(&self, path: &str) -> Result<&[u8]> {
        let path = clean_path(path);
        self.resolve(&path)?
            .bytes()
            .map_err(|e| e.at_path(&path))
    }

    /// Reads a file and interprets it as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualFs::read`], plus [`VfsError::NotUtf8`] when the
    /// content is not valid UTF-8.
    pub fn read_to_string(&self, path: &str) -> Result<&str> {
        let bytes = self.read(path)?;
        std::str::from_utf8(bytes).map_err(|source| VfsError::NotUtf8 {
            path: clean_path(path),
            source,
        })
    }

    /// Returns the metadata of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns any [`VirtualFs::open`] error, or [`VfsError::Decode`] for a
    /// file with a corrupt payload.
    pub fn stat(&self, path: &str) -> Result<Metadata> {
        let path = clean_path(path);
        self.resolve(&path)?
            .stat()
            .map_err(|e| e.at_path(&path))
    }

    /// Lists every entry of the directory at `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns any [`VirtualFs::open`] error, or [`VfsError::NotADirectory`]
    /// if `path` is a file.
    pub fn read_dir(&self, path: &str) -> Result<Vec<Metadata>> {
        self.open(path)?.readdir(0)
    }

    /// Returns `true` if a node exists at `path`.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(&clean_path(path)).is_ok()
    }

    /// Returns the number of files in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }

    /// Returns every file path in the tree, in sorted order.
    #[must_use]
    pub fn file_paths(&self) -> Vec<String> {
        fn collect(node: &Node, path: &str, out: &mut Vec<String>) {
            match node.as_dir() {
                Some(dir) => {
                    for child in dir.entries() {
                        collect(child, &crate::types::join_path(path, child.name()), out);
                    }
                }
                None => out.push(path.to_string()),
            }
        }

        let mut paths = Vec::with_capacity(self.file_count());
        collect(&self.root, "/", &mut paths);
        paths
    }

    fn resolve(&self, cleaned: &str) -> Result<&Node> {
        self.root.open(cleaned)
    }
}
