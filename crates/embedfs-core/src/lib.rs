//! Core types, codec and errors for embedfs.
//!
//! This crate provides the pieces shared between pack time and run time:
//! the payload codec that both sides must agree on, the pack configuration,
//! and the small CLI primitives used by the `embedfs` binary.
//!
//! # Architecture
//!
//! - [`codec`] - gzip + base64 payload encoding with cosmetic line wrapping
//! - [`PackConfig`] - walker and generator settings, loadable from TOML
//! - [`Error`] / [`CodecError`] - error hierarchy with contextual information
//! - [`cli`] - output format and exit code types

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
pub mod codec;
mod config;
mod error;

pub use codec::CodecError;
pub use config::{DEFAULT_CHUNK_WIDTH, DEFAULT_MAX_DEPTH, OutputShape, PackConfig};
pub use error::{Error, Result};
