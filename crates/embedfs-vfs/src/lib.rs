//! Read-only virtual filesystem over an embedded file tree.
//!
//! The packer turns a directory into a tree of [`Node`]s whose file contents
//! are gzip-compressed and base64-encoded. This crate is the runtime side:
//! it resolves paths against that tree, lists directories in name order, and
//! decodes file contents lazily, once per file, on first access.
//!
//! # Examples
//!
//! ```
//! use embedfs_vfs::VfsBuilder;
//! use std::io::Read;
//!
//! let vfs = VfsBuilder::new()
//!     .add_file("/a/b.txt", "hi")
//!     .build()?;
//!
//! let mut handle = vfs.open("/a/b.txt")?;
//! let mut text = String::new();
//! handle.read_to_string(&mut text)?;
//! assert_eq!(text, "hi");
//!
//! let listing = vfs.read_dir("/a")?;
//! assert_eq!(listing[0].name(), "b.txt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod flat;
pub mod handle;
pub mod node;
pub mod types;
pub mod vfs;

pub use builder::VfsBuilder;
pub use flat::{DirRecord, FileRecord, FlatTree};
pub use handle::Handle;
pub use node::{DirNode, FileNode, Node};
pub use types::{Metadata, READ_ONLY_MODE, Result, VfsError};
pub use vfs::VirtualFs;

/// Re-exported so generated code only needs this crate.
pub use embedfs_core::CodecError;
