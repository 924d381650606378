//! Build-time packer for embedded file trees.
//!
//! Walks a file or directory, applies a [`PathFilter`], and produces an
//! [`embedfs_vfs::Node`] tree whose file contents are gzip-compressed and
//! base64-encoded. The tree is what the code generator embeds and what
//! [`embedfs_vfs::VirtualFs`] serves at runtime.
//!
//! # Examples
//!
//! ```
//! use embedfs_core::PackConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::write(temp.path().join("keep.txt"), "keep")?;
//! std::fs::write(temp.path().join("skip.log"), "skip")?;
//!
//! let config = PackConfig::default().with_exclude(["\\.log$"]);
//! let pack = embedfs_pack::pack(temp.path(), &config)?;
//!
//! assert_eq!(pack.stats().files, 1);
//! assert_eq!(pack.stats().skipped, 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod filter;
pub mod walker;

pub use error::{PackError, Result};
pub use filter::{AcceptAll, PathFilter, RegexFilter};
pub use walker::{Pack, PackStats, Packer, pack};
