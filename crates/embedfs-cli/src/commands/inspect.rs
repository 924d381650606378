//! Inspect command implementation.
//!
//! Loads a JSON pack (nested or flat) into a [`VirtualFs`] and either lists
//! a directory or prints a file's decoded content to stdout.

use anyhow::{Context, Result};
use colored::Colorize;
use embedfs_core::cli::{ExitCode, OutputFormat};
use embedfs_vfs::types::clean_path;
use embedfs_vfs::{Metadata, VirtualFs};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Directory listing produced by the inspect command.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// Listed directory
    pub path: String,
    /// Number of files in the whole pack
    pub total_files: usize,
    /// Children in name order
    pub entries: Vec<EntryInfo>,
}

/// One row of a [`Listing`].
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// Base name
    pub name: String,
    /// `dir` or `file`
    pub kind: &'static str,
    /// Original size in bytes
    pub size: u64,
    /// Modification time as RFC 3339, if representable
    pub modified: Option<String>,
    /// Permission bits in octal
    pub mode: String,
}

impl From<&Metadata> for EntryInfo {
    fn from(meta: &Metadata) -> Self {
        Self {
            name: meta.name().to_string(),
            kind: if meta.is_dir() { "dir" } else { "file" },
            size: meta.size(),
            modified: chrono::DateTime::from_timestamp(meta.mod_time(), 0)
                .map(|time| time.to_rfc3339()),
            mode: format!("{:o}", meta.mode()),
        }
    }
}

/// Loads a JSON pack from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid pack.
pub fn load(pack_path: &Path) -> Result<VirtualFs> {
    let text = fs::read_to_string(pack_path)
        .with_context(|| format!("failed to read {}", pack_path.display()))?;
    VirtualFs::from_json(&text)
        .with_context(|| format!("{} is not a valid embedfs JSON pack", pack_path.display()))
}

/// Lists the directory at `path`.
///
/// # Errors
///
/// Returns an error if `path` does not resolve to a directory.
///
/// # Examples
///
/// ```
/// use embedfs_cli::commands::inspect::list;
/// use embedfs_vfs::VfsBuilder;
///
/// let vfs = VfsBuilder::new().add_file("/a/b.txt", "hi").build()?;
/// let listing = list(&vfs, "a/")?;
///
/// assert_eq!(listing.path, "/a");
/// assert_eq!(listing.entries[0].name, "b.txt");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn list(vfs: &VirtualFs, path: &str) -> Result<Listing> {
    let entries = vfs
        .read_dir(path)
        .with_context(|| format!("failed to list {path}"))?
        .iter()
        .map(EntryInfo::from)
        .collect();

    Ok(Listing {
        path: clean_path(path),
        total_files: vfs.file_count(),
        entries,
    })
}

/// Runs the inspect command.
///
/// # Returns
///
/// - `ExitCode::SUCCESS` after listing or printing
/// - `ExitCode::INVALID_INPUT` if `path` does not exist in the pack
///
/// # Errors
///
/// Returns an error if the pack cannot be loaded or a file fails to decode.
pub fn run(pack_path: &Path, path: Option<&str>, output_format: OutputFormat) -> Result<ExitCode> {
    let vfs = load(pack_path)?;
    let target = path.unwrap_or("/");
    info!(
        "Inspecting {} in {} ({} files)",
        target,
        pack_path.display(),
        vfs.file_count()
    );

    let meta = match vfs.stat(target) {
        Ok(meta) => meta,
        Err(e) if e.is_not_found() || e.is_not_directory() => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(ExitCode::INVALID_INPUT);
        }
        Err(e) => return Err(anyhow::Error::new(e).context(format!("failed to stat {target}"))),
    };

    if meta.is_dir() {
        let listing = list(&vfs, target)?;
        println!(
            "{}",
            crate::formatters::format_output(&listing, output_format)?
        );
    } else {
        let bytes = vfs
            .read(target)
            .with_context(|| format!("failed to read {target}"))?;
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(bytes)
            .and_then(|()| stdout.flush())
            .context("failed to write to stdout")?;
    }

    Ok(ExitCode::SUCCESS)
}
