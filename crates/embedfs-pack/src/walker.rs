//! Source tree walker.
//!
//! [`Packer`] turns a file or directory on disk into an embeddable
//! [`Node`] tree. Directories are visited in file-name order, bounded by the
//! configured depth, and pruned by the [`PathFilter`]. Every packed file is
//! read fully and encoded with [`embedfs_core::codec`].
//!
//! # Examples
//!
//! ```
//! use embedfs_core::PackConfig;
//! use embedfs_pack::Packer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::create_dir(temp.path().join("a"))?;
//! std::fs::write(temp.path().join("a/b.txt"), "hi")?;
//!
//! let pack = Packer::new(PackConfig::default()).pack(temp.path())?;
//! let vfs = pack.into_vfs()?;
//!
//! assert_eq!(vfs.read("/a/b.txt")?, b"hi");
//! # Ok(())
//! # }
//! ```

use crate::error::{PackError, Result};
use crate::filter::{AcceptAll, PathFilter};
use embedfs_core::PackConfig;
use embedfs_vfs::{FlatTree, Node, VfsError, VirtualFs};
use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::{DirEntry, WalkDir};

/// Counters collected while packing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Packed files
    pub files: usize,
    /// Packed directories, including the root
    pub dirs: usize,
    /// Total original size of the packed files
    pub original_bytes: u64,
    /// Total length of the encoded payload text
    pub encoded_bytes: u64,
    /// Entries skipped by the filter or because they are symlinks
    pub skipped: usize,
}

/// A packed tree with its statistics.
#[derive(Debug)]
pub struct Pack {
    root: Node,
    stats: PackStats,
}

impl Pack {
    /// Returns the root directory node.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the pack statistics.
    #[must_use]
    pub const fn stats(&self) -> PackStats {
        self.stats
    }

    /// Returns the flat directory-to-children view of the same tree.
    #[must_use]
    pub fn to_flat(&self) -> FlatTree {
        FlatTree::from_node(&self.root)
    }

    /// Consumes the pack, returning the root node.
    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Consumes the pack into a ready-to-query filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::DuplicateEntry`] if the tree has sibling name
    /// collisions.
    pub fn into_vfs(self) -> std::result::Result<VirtualFs, VfsError> {
        VirtualFs::new(self.root)
    }
}

/// Walks a source path and packs it into a tree.
pub struct Packer<F = AcceptAll> {
    config: PackConfig,
    filter: F,
}

impl<F> fmt::Debug for Packer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Packer<AcceptAll> {
    /// Creates a packer that accepts every entry.
    #[must_use]
    pub const fn new(config: PackConfig) -> Self {
        Self {
            config,
            filter: AcceptAll,
        }
    }
}

impl<F: PathFilter> Packer<F> {
    /// Replaces the path filter.
    #[must_use]
    pub fn with_filter<G: PathFilter>(self, filter: G) -> Packer<G> {
        Packer {
            config: self.config,
            filter,
        }
    }

    /// Returns the pack configuration.
    #[must_use]
    pub const fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Packs a file or directory.
    ///
    /// A single file becomes the only child of a synthetic root directory
    /// and is not passed to the filter. For a directory, the filter sees
    /// every entry below the root; the root itself is always packed.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Config`] for an invalid configuration,
    /// [`PackError::Io`] or [`PackError::Walk`] if any entry cannot be read,
    /// [`PackError::InvalidName`] for a name that is not valid UTF-8,
    /// [`PackError::Encode`] if compression fails, and
    /// [`PackError::DuplicateEntry`] on a sibling name collision. No partial
    /// tree is returned.
    pub fn pack(&self, source: impl AsRef<Path>) -> Result<Pack> {
        self.config.validate()?;
        let source = source.as_ref();
        let metadata = fs::metadata(source).map_err(|e| io_error(source, e))?;

        tracing::info!("Packing {}", source.display());
        let pack = if metadata.is_dir() {
            self.pack_dir(source, &metadata)?
        } else {
            self.pack_single_file(source, &metadata)?
        };

        tracing::info!(
            "Packed {} files in {} directories ({} bytes -> {} bytes encoded, {} skipped)",
            pack.stats.files,
            pack.stats.dirs,
            pack.stats.original_bytes,
            pack.stats.encoded_bytes,
            pack.stats.skipped
        );
        Ok(pack)
    }

    fn pack_single_file(&self, source: &Path, metadata: &fs::Metadata) -> Result<Pack> {
        let mut stats = PackStats {
            dirs: 1,
            ..PackStats::default()
        };
        let name = source
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .ok_or_else(|| invalid_name(source))?
            .to_string();
        let file = self.encode_file(source, name, metadata, &mut stats)?;
        let root = Node::dir("", mod_time(metadata), vec![file]);
        Ok(Pack { root, stats })
    }

    fn pack_dir(&self, source: &Path, root_metadata: &fs::Metadata) -> Result<Pack> {
        let mut stats = PackStats {
            dirs: 1,
            ..PackStats::default()
        };
        let skipped = Cell::new(0);
        let mut root = DirFrame::new(String::new(), "/".to_string(), mod_time(root_metadata));
        let mut open_dirs: Vec<DirFrame> = Vec::new();

        let mut walker = WalkDir::new(source)
            .follow_links(false)
            .sort_by_file_name()
            .min_depth(1);
        if let Some(limit) = self.config.depth_limit() {
            walker = walker.max_depth(limit);
        }

        let entries = walker
            .into_iter()
            .filter_entry(|entry| self.admit(source, entry, &skipped));

        for entry in entries {
            let entry = entry.map_err(|walk_err| PackError::Walk {
                path: walk_err
                    .path()
                    .map_or_else(|| source.to_path_buf(), Path::to_path_buf),
                source: walk_err,
            })?;

            // Entries arrive depth-first, so everything deeper than the parent is finished.
            while open_dirs.len() >= entry.depth() {
                close_dir(&mut open_dirs, &mut root)?;
            }

            let virtual_path =
                virtual_path(source, entry.path()).ok_or_else(|| invalid_name(entry.path()))?;
            let name = entry
                .file_name()
                .to_str()
                .ok_or_else(|| invalid_name(entry.path()))?
                .to_string();
            let metadata = entry
                .metadata()
                .map_err(|e| io_error(entry.path(), e.into()))?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if self.config.depth_limit() == Some(entry.depth()) {
                    tracing::debug!("Not descending into {} (depth limit reached)", virtual_path);
                } else {
                    tracing::debug!("Entering {}", virtual_path);
                }
                stats.dirs += 1;
                open_dirs.push(DirFrame::new(name, virtual_path, mod_time(&metadata)));
            } else if file_type.is_file() {
                tracing::debug!("Packing {} ({} bytes)", virtual_path, metadata.len());
                let file = self.encode_file(entry.path(), name, &metadata, &mut stats)?;
                open_dirs
                    .last_mut()
                    .unwrap_or(&mut root)
                    .push(file, &virtual_path)?;
            } else {
                tracing::debug!("Skipping special file {}", virtual_path);
                skipped.set(skipped.get() + 1);
            }
        }

        while !open_dirs.is_empty() {
            close_dir(&mut open_dirs, &mut root)?;
        }
        stats.skipped = skipped.get();
        Ok(Pack {
            root: root.into_node(),
            stats,
        })
    }

    /// Filter hook run before an entry is yielded or descended.
    fn admit(&self, source: &Path, entry: &DirEntry, skipped: &Cell<usize>) -> bool {
        if entry.path_is_symlink() {
            tracing::debug!("Skipping symlink {}", entry.path().display());
            skipped.set(skipped.get() + 1);
            return false;
        }
        let Ok(metadata) = entry.metadata() else {
            // The main loop reports the stat failure.
            return true;
        };
        let Some(path) = virtual_path(source, entry.path()) else {
            // The main loop reports the invalid name.
            return true;
        };
        if self.filter.accept(&path, &metadata) {
            true
        } else {
            tracing::debug!("Filtered out {}", path);
            skipped.set(skipped.get() + 1);
            false
        }
    }

    fn encode_file(
        &self,
        path: &Path,
        name: String,
        metadata: &fs::Metadata,
        stats: &mut PackStats,
    ) -> Result<Node> {
        let content = fs::read(path).map_err(|e| io_error(path, e))?;
        let node = Node::from_content(name, mod_time(metadata), &content, self.config.chunk_width)
            .map_err(|source| PackError::Encode {
                path: path.to_path_buf(),
                source,
            })?;

        stats.files += 1;
        stats.original_bytes += content.len() as u64;
        stats.encoded_bytes += node.as_file().map_or(0, |file| file.payload().len() as u64);
        Ok(node)
    }
}

/// Directory under construction on the walk stack.
struct DirFrame {
    name: String,
    path: String,
    mod_time: i64,
    children: Vec<Node>,
    names: HashSet<String>,
}

impl DirFrame {
    fn new(name: String, path: String, mod_time: i64) -> Self {
        Self {
            name,
            path,
            mod_time,
            children: Vec::new(),
            names: HashSet::new(),
        }
    }

    fn push(&mut self, child: Node, child_path: &str) -> Result<()> {
        if !self.names.insert(child.name().to_string()) {
            return Err(PackError::DuplicateEntry {
                path: child_path.to_string(),
            });
        }
        self.children.push(child);
        Ok(())
    }

    fn into_node(self) -> Node {
        Node::dir(self.name, self.mod_time, self.children)
    }
}

fn close_dir(open_dirs: &mut Vec<DirFrame>, root: &mut DirFrame) -> Result<()> {
    if let Some(frame) = open_dirs.pop() {
        let path = frame.path.clone();
        open_dirs
            .last_mut()
            .unwrap_or(root)
            .push(frame.into_node(), &path)?;
    }
    Ok(())
}

/// Maps an on-disk path to its `/`-rooted path relative to the walk root.
///
/// Returns `None` when a component is not valid UTF-8.
fn virtual_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in relative.components() {
        out.push('/');
        out.push_str(component.as_os_str().to_str()?);
    }
    if out.is_empty() {
        out.push('/');
    }
    Some(out)
}

fn mod_time(metadata: &fs::Metadata) -> i64 {
    metadata.modified().map_or(0, |time| match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |secs| -secs),
    })
}

fn invalid_name(path: &Path) -> PackError {
    PackError::InvalidName {
        path: path.to_path_buf(),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PackError {
    PackError::Io {
        path: PathBuf::from(path),
        source,
    }
}

/// Packs `source` with the regex filter described by `config`.
///
/// # Errors
///
/// Returns [`PackError::InvalidFilter`] for a bad pattern, plus any
/// [`Packer::pack`] error.
pub fn pack(source: impl AsRef<Path>, config: &PackConfig) -> Result<Pack> {
    let filter = crate::filter::RegexFilter::from_config(config)?;
    Packer::new(config.clone()).with_filter(filter).pack(source)
}
