//! The flat view of a tree.
//!
//! Instead of nesting, the flat view keeps a list of directory records and,
//! for every directory path, the files directly inside it. It is what the
//! `flat-json` pack shape serializes, and it converts to and from the nested
//! [`Node`] tree without loss.
//!
//! ```json
//! {
//!   "dirs": [
//!     { "path": "/", "name": "", "mod_time": 0 },
//!     { "path": "/a", "name": "a", "mod_time": 0 }
//!   ],
//!   "files": {
//!     "/a": [
//!       { "path": "/a/b.txt", "name": "b.txt", "size": 2, "mod_time": 0, "payload": "H4sI..." }
//!     ]
//!   }
//! }
//! ```

use crate::node::Node;
use crate::types::{Result, VfsError, join_path, parent_path};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A directory entry of the flat view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirRecord {
    /// Absolute path, `/` for the root
    pub path: String,
    /// Base name, empty for the root
    pub name: String,
    /// Modification time in seconds since the Unix epoch
    pub mod_time: i64,
}

/// A file entry of the flat view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path of the file
    pub path: String,
    /// Base name
    pub name: String,
    /// Original content length
    pub size: u64,
    /// Modification time in seconds since the Unix epoch
    pub mod_time: i64,
    /// Encoded payload text
    pub payload: String,
}

/// Directory records plus the files of each directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTree {
    /// Every directory, parents before children
    pub dirs: Vec<DirRecord>,
    /// Files keyed by the path of the directory that holds them
    pub files: BTreeMap<String, Vec<FileRecord>>,
}

#[derive(Debug)]
struct PendingDir {
    name: String,
    mod_time: i64,
    subdirs: Vec<String>,
    files: Vec<FileRecord>,
}

impl FlatTree {
    /// Flattens a nested tree rooted at `root`.
    ///
    /// A file root is recorded as the only file of a synthetic root directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_vfs::{FlatTree, Node};
    ///
    /// let root = Node::dir("", 0, vec![Node::dir("a", 0, vec![Node::file("e", 0, 0, "")])]);
    /// let flat = FlatTree::from_node(&root);
    ///
    /// assert_eq!(flat.dirs.len(), 2);
    /// assert_eq!(flat.files["/a"][0].path, "/a/e");
    /// ```
    #[must_use]
    pub fn from_node(root: &Node) -> Self {
        let mut flat = Self::default();
        if root.is_dir() {
            flat.record(root, "/");
        } else {
            flat.dirs.push(DirRecord {
                path: "/".to_string(),
                name: String::new(),
                mod_time: root.mod_time(),
            });
            flat.record(root, &join_path("/", root.name()));
        }
        flat
    }

    fn record(&mut self, node: &Node, path: &str) {
        match node {
            Node::Dir(dir) => {
                self.dirs.push(DirRecord {
                    path: path.to_string(),
                    name: dir.name().to_string(),
                    mod_time: dir.mod_time(),
                });
                for child in dir.entries() {
                    self.record(child, &join_path(path, child.name()));
                }
            }
            Node::File(file) => {
                let parent = parent_path(path).unwrap_or("/").to_string();
                self.files.entry(parent).or_default().push(FileRecord {
                    path: path.to_string(),
                    name: file.name().to_string(),
                    size: file.size(),
                    mod_time: file.mod_time(),
                    payload: file.payload().to_string(),
                });
            }
        }
    }

    /// Returns the total number of file records.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Returns the file records held directly by `dir`.
    #[must_use]
    pub fn files_in(&self, dir: &str) -> &[FileRecord] {
        self.files.get(dir).map_or(&[], Vec::as_slice)
    }

    /// Rebuilds the nested tree.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::MissingListing`] when the root, the parent of a
    /// directory, or the directory of a file group has no directory record,
    /// and [`VfsError::DuplicateEntry`] when a path is recorded twice.
    pub fn into_node(self) -> Result<Node> {
        let mut pending: HashMap<String, PendingDir> = HashMap::with_capacity(self.dirs.len());
        let mut dirs = self.dirs;
        dirs.sort_by_key(|record| record.path.matches('/').count() + usize::from(record.path != "/"));

        for record in dirs {
            if pending.contains_key(&record.path) {
                return Err(VfsError::DuplicateEntry { path: record.path });
            }
            if let Some(parent) = parent_path(&record.path) {
                let parent_dir =
                    pending
                        .get_mut(parent)
                        .ok_or_else(|| VfsError::MissingListing {
                            path: parent.to_string(),
                        })?;
                parent_dir.subdirs.push(record.path.clone());
            }
            pending.insert(
                record.path,
                PendingDir {
                    name: record.name,
                    mod_time: record.mod_time,
                    subdirs: Vec::new(),
                    files: Vec::new(),
                },
            );
        }

        for (dir, files) in self.files {
            let pending_dir = pending
                .get_mut(&dir)
                .ok_or(VfsError::MissingListing { path: dir })?;
            pending_dir.files.extend(files);
        }

        if !pending.contains_key("/") {
            return Err(VfsError::MissingListing {
                path: "/".to_string(),
            });
        }
        assemble("/", &mut pending)
    }
}

fn assemble(path: &str, pending: &mut HashMap<String, PendingDir>) -> Result<Node> {
    let dir = pending
        .remove(path)
        .ok_or_else(|| VfsError::MissingListing {
            path: path.to_string(),
        })?;

    let mut children = Vec::with_capacity(dir.subdirs.len() + dir.files.len());
    for subdir in &dir.subdirs {
        children.push(assemble(subdir, pending)?);
    }
    for file in dir.files {
        children.push(Node::file(file.name, file.size, file.mod_time, file.payload));
    }
    Ok(Node::dir(dir.name, dir.mod_time, children))
}
