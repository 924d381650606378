//! Code generation for embedfs packs.
//!
//! Renders a packed tree as Rust source that embeds it into a program, or as
//! JSON that can be loaded at run time with
//! [`VirtualFs::from_json`](embedfs_vfs::VirtualFs::from_json). Source is
//! produced from Handlebars templates.
//!
//! # Examples
//!
//! ```
//! use embedfs_codegen::{GenerateOptions, SourceGenerator};
//! use embedfs_core::OutputShape;
//! use embedfs_vfs::VfsBuilder;
//!
//! let vfs = VfsBuilder::new().add_file("/a.txt", "hi").build()?;
//! let options = GenerateOptions::new("ASSETS").with_shape(OutputShape::Independent);
//!
//! let pack = SourceGenerator::new()?.generate(&vfs, &options)?;
//! assert!(pack.content.contains("pub enum AssetsNode"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod generator;
pub mod naming;
pub mod template_engine;
pub mod types;

pub use error::{CodegenError, Result};
pub use generator::SourceGenerator;
pub use types::{GenerateOptions, GeneratedPack, SourceContext};
