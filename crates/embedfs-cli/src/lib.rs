//! embedfs CLI library.
//!
//! This library provides the core functionality for the `embedfs` binary,
//! exposing modules for commands and formatters that can be tested.

#![allow(clippy::missing_errors_doc)]

use clap::ValueEnum;
use embedfs_core::OutputShape;

pub mod commands;
pub mod formatters;

/// Output shape selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// Rust source using the `embedfs-vfs` runtime types.
    #[default]
    Dependent,
    /// Self-contained Rust source with its own node type.
    Independent,
    /// JSON of the nested tree.
    Json,
    /// JSON of the flat directory-to-children view.
    FlatJson,
}

impl From<ShapeArg> for OutputShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Dependent => Self::Dependent,
            ShapeArg::Independent => Self::Independent,
            ShapeArg::Json => Self::Json,
            ShapeArg::FlatJson => Self::FlatJson,
        }
    }
}
