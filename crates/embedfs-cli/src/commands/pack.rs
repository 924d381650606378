//! Pack command implementation.
//!
//! Walks a source directory, encodes every file, and writes the tree in the
//! selected shape. This command:
//! 1. Loads `--config`, or `embedfs.toml` from the source directory
//! 2. Applies flag overrides and validates the result
//! 3. Asks before overwriting an existing output file
//! 4. Packs, generates, and writes the output
//! 5. Prints a summary (to stderr when the pack itself goes to stdout)

use crate::ShapeArg;
use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use embedfs_codegen::{GenerateOptions, SourceGenerator, naming};
use embedfs_core::PackConfig;
use embedfs_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration file picked up from the source directory.
pub const CONFIG_FILE_NAME: &str = "embedfs.toml";

/// Output path that selects stdout.
pub const STDOUT_SENTINEL: &str = "-";

/// Arguments of the pack command.
#[derive(Debug, Clone, Default)]
pub struct PackArgs {
    /// Directory or file to pack
    pub source: PathBuf,
    /// Output file; `None` or `-` writes to stdout
    pub out: Option<PathBuf>,
    /// Name of the generated static
    pub var_name: Option<String>,
    /// Output shape
    pub shape: Option<ShapeArg>,
    /// Extra include patterns
    pub include: Vec<String>,
    /// Extra exclude patterns
    pub exclude: Vec<String>,
    /// Walk depth bound, `0` for unbounded
    pub max_depth: Option<usize>,
    /// Payload line width
    pub chunk_width: Option<usize>,
    /// Module doc text for generated source
    pub module_doc: Option<String>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Overwrite without asking
    pub yes: bool,
}

/// Where the generated pack is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output
    Stdout,
    /// A file on disk
    File(PathBuf),
}

impl Destination {
    /// Interprets the `--out` flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_cli::commands::pack::Destination;
    /// use std::path::Path;
    ///
    /// assert_eq!(Destination::from_arg(None), Destination::Stdout);
    /// assert_eq!(Destination::from_arg(Some(Path::new("-"))), Destination::Stdout);
    /// ```
    #[must_use]
    pub fn from_arg(out: Option<&Path>) -> Self {
        match out {
            Some(path) if path.as_os_str() != STDOUT_SENTINEL => Self::File(path.to_path_buf()),
            _ => Self::Stdout,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Result of a pack run.
#[derive(Debug, Serialize)]
struct PackSummary {
    /// Packed source path
    source: String,
    /// Output path or `<stdout>`
    output: String,
    /// Emitted shape
    shape: String,
    /// Generated static name
    var_name: String,
    /// Packed files
    files: usize,
    /// Packed directories, root included
    dirs: usize,
    /// Entries skipped by filters or as symlinks
    skipped: usize,
    /// Total original file size
    original_bytes: u64,
    /// Total payload text size
    encoded_bytes: u64,
    /// Bytes written to the output
    written_bytes: usize,
}

/// Builds the effective configuration for a pack run.
///
/// Starts from `--config` when given, otherwise from `embedfs.toml` in the
/// source directory, otherwise from defaults. A discovered configuration
/// file excludes itself from the pack. Flags override file values; pattern
/// flags extend the file's lists.
///
/// # Errors
///
/// Returns an error if a configuration file cannot be read or parsed.
pub fn load_config(args: &PackArgs) -> Result<PackConfig> {
    let mut config = if let Some(path) = &args.config {
        PackConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
    } else {
        let discovered = args.source.join(CONFIG_FILE_NAME);
        if discovered.is_file() {
            info!("Using configuration from {}", discovered.display());
            let mut config = PackConfig::from_toml_file(&discovered)
                .with_context(|| format!("failed to load config {}", discovered.display()))?;
            config
                .exclude
                .push(format!("^/{}$", CONFIG_FILE_NAME.replace('.', "\\.")));
            config
        } else {
            PackConfig::default()
        }
    };

    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(chunk_width) = args.chunk_width {
        config.chunk_width = chunk_width;
    }
    if let Some(shape) = args.shape {
        config.shape = shape.into();
    }
    if let Some(var_name) = &args.var_name {
        config.var_name = Some(var_name.clone());
    }
    if let Some(module_doc) = &args.module_doc {
        config.module_doc = Some(module_doc.clone());
    }
    config.include.extend(args.include.iter().cloned());
    config.exclude.extend(args.exclude.iter().cloned());

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Runs the pack command.
///
/// # Returns
///
/// - `ExitCode::SUCCESS` when the pack was written
/// - `ExitCode::INVALID_INPUT` for an invalid configuration or static name
/// - `ExitCode::CANCELLED` when overwriting was declined
///
/// # Errors
///
/// Returns an error if walking, generating, or writing fails.
pub fn run(args: PackArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let config = load_config(&args)?;
    if let Err(e) = config.validate() {
        eprintln!("{} {e}", "error:".red().bold());
        return Ok(ExitCode::INVALID_INPUT);
    }

    let options = match GenerateOptions::from_config(&config, &naming::var_name_for(&args.source))
    {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(ExitCode::INVALID_INPUT);
        }
    };

    let destination = Destination::from_arg(args.out.as_deref());
    if let Destination::File(path) = &destination
        && path.exists()
        && !args.yes
        && !confirm_overwrite(path)?
    {
        eprintln!("{}", "Cancelled.".yellow());
        return Ok(ExitCode::CANCELLED);
    }

    info!("Packing {}", args.source.display());
    let pack = embedfs_pack::pack(&args.source, &config)
        .with_context(|| format!("failed to pack {}", args.source.display()))?;
    let stats = pack.stats();
    if stats.files == 0 {
        warn!("No files were packed from {}", args.source.display());
    }

    let fs = pack
        .into_vfs()
        .context("packed tree is not a valid filesystem")?;
    let generated = SourceGenerator::new()
        .context("failed to initialize generator")?
        .generate(&fs, &options)
        .context("failed to generate output")?;

    let written_bytes = write_output(&destination, &generated.content)?;

    let summary = PackSummary {
        source: args.source.display().to_string(),
        output: destination.to_string(),
        shape: generated.shape.to_string(),
        var_name: generated.var_name,
        files: stats.files,
        dirs: stats.dirs,
        skipped: stats.skipped,
        original_bytes: stats.original_bytes,
        encoded_bytes: stats.encoded_bytes,
        written_bytes,
    };
    let formatted = crate::formatters::format_output(&summary, output_format)?;
    match destination {
        Destination::Stdout => eprintln!("{formatted}"),
        Destination::File(_) => println!("{formatted}"),
    }

    info!(
        "Packed {} files into {} ({} bytes)",
        stats.files, destination, written_bytes
    );
    Ok(ExitCode::SUCCESS)
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .context("failed to get confirmation")
}

/// Writes `content`, newline-terminated, and returns the number of bytes written.
fn write_output(destination: &Destination, content: &str) -> Result<usize> {
    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")?;
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    Ok(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedfs_core::OutputShape;
    use tempfile::TempDir;

    fn args_for(source: &Path) -> PackArgs {
        PackArgs {
            source: source.to_path_buf(),
            ..PackArgs::default()
        }
    }

    #[test]
    fn test_destination_from_arg() {
        assert_eq!(
            Destination::from_arg(Some(Path::new("out.rs"))),
            Destination::File(PathBuf::from("out.rs"))
        );
        assert_eq!(Destination::Stdout.to_string(), "<stdout>");
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&args_for(temp.path())).unwrap();
        assert_eq!(config, PackConfig::default());
    }

    #[test]
    fn test_load_config_discovers_file_and_excludes_it() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "max_depth = 2\nexclude = [\"\\\\.bak$\"]\n",
        )
        .unwrap();

        let config = load_config(&args_for(temp.path())).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.exclude, vec!["\\.bak$", "^/embedfs\\.toml$"]);
    }

    #[test]
    fn test_load_config_flags_override_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("custom.toml");
        fs::write(&file, "max_depth = 2\nshape = \"json\"\ninclude = [\"a\"]\n").unwrap();

        let args = PackArgs {
            config: Some(file),
            max_depth: Some(0),
            shape: Some(ShapeArg::Independent),
            var_name: Some("SITE".to_string()),
            include: vec!["b".to_string()],
            ..args_for(temp.path())
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.shape, OutputShape::Independent);
        assert_eq!(config.var_name.as_deref(), Some("SITE"));
        assert_eq!(config.include, vec!["a", "b"]);
    }

    #[test]
    fn test_load_config_reports_bad_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bad.toml");
        fs::write(&file, "unknown_key = 1\n").unwrap();

        let args = PackArgs {
            config: Some(file),
            ..args_for(temp.path())
        };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_write_output_creates_parent_and_terminates_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out.json");
        let written = write_output(&Destination::File(path.clone()), "{}").unwrap();
        assert_eq!(written, 3);
        assert_eq!(fs::read_to_string(path).unwrap(), "{}\n");
    }
}
