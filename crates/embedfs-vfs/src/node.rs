//! The embedded file tree.
//!
//! A [`Node`] is either a directory holding child nodes or a file holding a
//! compressed, base64-encoded payload. Trees are built once (usually by
//! generated code) and never mutated afterwards. Everything that needs work
//! at runtime happens lazily and at most once per node:
//!
//! - a directory computes its name-sorted order and a name lookup table the
//!   first time it is resolved through, listed or stat-ed;
//! - a file decodes its payload the first time its bytes are needed, and
//!   keeps either the bytes or the decode error for every later caller.
//!
//! Both caches live in [`OnceLock`]s, so a tree can sit in a `static` and be
//! shared across threads without further locking.
//!
//! # Examples
//!
//! ```
//! use embedfs_vfs::Node;
//!
//! let payload = embedfs_core::codec::encode(b"hi", 76)?;
//! let root = Node::dir("", 0, vec![
//!     Node::dir("a", 0, vec![Node::file("b.txt", 2, 0, payload)]),
//! ]);
//!
//! let file = root.open("/a/b.txt")?;
//! assert_eq!(file.bytes()?, b"hi");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::types::{Metadata, Result, VfsError, join_path};
use embedfs_core::{CodecError, codec};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

type Name = Cow<'static, str>;

/// One entry of the embedded tree.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// A directory and its children
    Dir(DirNode),
    /// A file and its encoded content
    File(FileNode),
}

/// Directory node.
#[derive(Debug, Serialize, Deserialize)]
pub struct DirNode {
    name: Name,
    mod_time: i64,
    children: Vec<Node>,
    #[serde(skip)]
    index: OnceLock<DirIndex>,
}

/// File node.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileNode {
    name: Name,
    size: u64,
    mod_time: i64,
    payload: Name,
    #[serde(skip)]
    data: OnceLock<std::result::Result<Vec<u8>, Arc<CodecError>>>,
}

/// Sorted view over a directory's children, computed once.
#[derive(Debug)]
struct DirIndex {
    order: Vec<usize>,
    by_name: HashMap<String, usize>,
}

impl DirIndex {
    fn build(children: &[Node]) -> Self {
        let mut order: Vec<usize> = (0..children.len()).collect();
        order.sort_by(|&a, &b| children[a].name().cmp(children[b].name()));

        let mut by_name = HashMap::with_capacity(children.len());
        for &position in &order {
            // First entry wins; duplicates are rejected when a VirtualFs is built.
            by_name
                .entry(children[position].name().to_string())
                .or_insert(position);
        }
        Self { order, by_name }
    }
}

impl Node {
    /// Creates a directory node.
    ///
    /// Children may be given in any order.
    #[must_use]
    pub fn dir(name: impl Into<Name>, mod_time: i64, children: Vec<Self>) -> Self {
        Self::Dir(DirNode {
            name: name.into(),
            mod_time,
            children,
            index: OnceLock::new(),
        })
    }

    /// Creates a file node from an already encoded payload.
    ///
    /// `size` is the original content length. A size of zero marks an empty
    /// file whose payload is never decoded.
    #[must_use]
    pub fn file(name: impl Into<Name>, size: u64, mod_time: i64, payload: impl Into<Name>) -> Self {
        Self::File(FileNode {
            name: name.into(),
            size,
            mod_time,
            payload: payload.into(),
            data: OnceLock::new(),
        })
    }

    /// Encodes raw content into a file node.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Compress`] if compression fails.
    pub fn from_content(
        name: impl Into<Name>,
        mod_time: i64,
        content: &[u8],
        chunk_width: usize,
    ) -> std::result::Result<Self, CodecError> {
        let payload = if content.is_empty() {
            String::new()
        } else {
            codec::encode(content, chunk_width)?
        };
        Ok(Self::file(name, content.len() as u64, mod_time, payload))
    }

    /// Returns the base name of the node; empty for a root directory.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Dir(dir) => &dir.name,
            Self::File(file) => &file.name,
        }
    }

    /// Returns `true` for directory nodes.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    /// Returns the modification time in seconds since the Unix epoch.
    #[must_use]
    pub const fn mod_time(&self) -> i64 {
        match self {
            Self::Dir(dir) => dir.mod_time,
            Self::File(file) => file.mod_time,
        }
    }

    /// Returns the declared content length; zero for directories.
    #[must_use]
    pub const fn size(&self) -> u64 {
        match self {
            Self::Dir(_) => 0,
            Self::File(file) => file.size,
        }
    }

    /// Returns the directory node, if this is one.
    #[must_use]
    pub const fn as_dir(&self) -> Option<&DirNode> {
        match self {
            Self::Dir(dir) => Some(dir),
            Self::File(_) => None,
        }
    }

    /// Returns the file node, if this is one.
    #[must_use]
    pub const fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::Dir(_) => None,
            Self::File(file) => Some(file),
        }
    }

    /// Runs the one-time preparation of this node.
    ///
    /// Directories build their sorted index; files decode their payload.
    /// Calling it again, from any thread, is a no-op.
    pub fn prepare(&self) {
        match self {
            Self::Dir(dir) => {
                dir.index();
            }
            Self::File(file) => {
                file.decoded();
            }
        }
    }

    /// Returns `true` once [`Node::prepare`] has run for this node.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        match self {
            Self::Dir(dir) => dir.index.get().is_some(),
            Self::File(file) => file.data.get().is_some(),
        }
    }

    /// Returns metadata built from the declared attributes.
    ///
    /// Does not trigger preparation.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.name(), self.size(), self.is_dir(), self.mod_time())
    }

    /// Prepares the node and returns its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Decode`] for a file whose payload cannot be decoded.
    pub fn stat(&self) -> Result<Metadata> {
        if let Self::File(file) = self {
            file.bytes().map_err(|source| VfsError::Decode {
                path: file.name.to_string(),
                source,
            })?;
        } else {
            self.prepare();
        }
        Ok(self.metadata())
    }

    /// Returns the decoded content of a file node.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::IsADirectory`] for directories and
    /// [`VfsError::Decode`] if the payload is corrupt.
    pub fn bytes(&self) -> Result<&[u8]> {
        match self {
            Self::Dir(dir) => Err(VfsError::IsADirectory {
                path: dir.name.to_string(),
            }),
            Self::File(file) => file.bytes().map_err(|source| VfsError::Decode {
                path: file.name.to_string(),
                source,
            }),
        }
    }

    /// Resolves a `/`-separated path relative to this node.
    ///
    /// Empty segments are skipped, so `""`, `"/"` and `"//"` all resolve to
    /// this node. Every node visited is prepared.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] when a segment names no child and
    /// [`VfsError::NotADirectory`] when a path continues below a file.
    pub fn open(&self, path: &str) -> Result<&Self> {
        let mut node = self;
        let mut walked = String::from("/");

        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let Self::Dir(dir) = node else {
                return Err(VfsError::NotADirectory { path: walked });
            };
            walked = join_path(&walked, segment);
            node = dir
                .child(segment)
                .ok_or_else(|| VfsError::NotFound {
                    path: walked.clone(),
                })?;
        }

        node.prepare();
        Ok(node)
    }

    /// Counts the file nodes in this subtree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self {
            Self::Dir(dir) => dir.children.iter().map(Self::file_count).sum(),
            Self::File(_) => 1,
        }
    }

    /// Checks that no directory in this subtree has two children with the same name.
    ///
    /// `path` is the location of this node, used in the error.
    pub(crate) fn check_unique_names(&self, path: &str) -> Result<()> {
        let Self::Dir(dir) = self else {
            return Ok(());
        };

        let mut seen: HashSet<&str> = HashSet::with_capacity(dir.children.len());
        for child in &dir.children {
            let child_path = join_path(path, child.name());
            if child.name().is_empty() || child.name().contains('/') {
                return Err(VfsError::InvalidTree {
                    message: format!("invalid entry name {:?} under {path}", child.name()),
                });
            }
            if !seen.insert(child.name()) {
                return Err(VfsError::DuplicateEntry { path: child_path });
            }
            child.check_unique_names(&child_path)?;
        }
        Ok(())
    }
}

impl DirNode {
    fn index(&self) -> &DirIndex {
        self.index.get_or_init(|| DirIndex::build(&self.children))
    }

    /// Returns the directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the modification time in seconds since the Unix epoch.
    #[must_use]
    pub const fn mod_time(&self) -> i64 {
        self.mod_time
    }

    /// Returns the children in the order they were given at construction.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Looks up a direct child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.index()
            .by_name
            .get(name)
            .map(|&position| &self.children[position])
    }

    /// Iterates the children in ascending byte-wise name order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.index()
            .order
            .iter()
            .map(move |&position| &self.children[position])
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the directory has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl FileNode {
    fn decoded(&self) -> &std::result::Result<Vec<u8>, Arc<CodecError>> {
        self.data.get_or_init(|| {
            if self.size == 0 {
                Ok(Vec::new())
            } else {
                codec::decode_exact(&self.payload, self.size).map_err(Arc::new)
            }
        })
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared content length.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the modification time in seconds since the Unix epoch.
    #[must_use]
    pub const fn mod_time(&self) -> i64 {
        self.mod_time
    }

    /// Returns the encoded payload text as stored in the tree.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the decoded content, decoding on first use.
    ///
    /// Every call after the first returns the same buffer or the same error.
    ///
    /// # Errors
    ///
    /// Returns the cached [`CodecError`] if the payload cannot be decoded or
    /// its decoded length differs from [`FileNode::size`].
    pub fn bytes(&self) -> std::result::Result<&[u8], Arc<CodecError>> {
        match self.decoded() {
            Ok(data) => Ok(data.as_slice()),
            Err(error) => Err(Arc::clone(error)),
        }
    }
}
