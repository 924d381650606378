//! embedfs CLI.
//!
//! Packs a directory into Rust source (or JSON) that embeds it as a
//! read-only virtual filesystem.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `pack` - Walk a directory and emit an embeddable pack
//! - `inspect` - List or print entries of a JSON pack
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Generate src/assets.rs from ./public
//! embedfs pack public -o src/assets.rs
//!
//! # Self-contained module, skipping source maps
//! embedfs pack dist --shape independent -e '\.map$' -o src/dist.rs
//!
//! # Inspect a JSON pack
//! embedfs pack public --shape json -o public.json
//! embedfs inspect public.json /css
//! ```

#![allow(clippy::missing_errors_doc)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use embedfs_cli::ShapeArg;
use embedfs_cli::commands::{self, pack::PackArgs};
use embedfs_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// embedfs - embed a directory tree into a Rust program.
///
/// Files are gzip-compressed and base64-encoded at pack time, then decoded
/// lazily, once per file, when the program first reads them.
#[derive(Parser, Debug)]
#[command(name = "embedfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Summary output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack a directory (or a single file) into an embeddable pack.
    ///
    /// Settings come from `--config`, or from `embedfs.toml` in the source
    /// directory when present; flags override them.
    ///
    /// # Examples
    ///
    /// ```bash
    /// embedfs pack public -o src/assets.rs --var ASSETS
    /// embedfs pack public --max-depth 0 -i '\.keep$' -e '^/tmp/' -o -
    /// ```
    Pack {
        /// Directory or file to pack
        source: PathBuf,

        /// Output file (`-` for stdout)
        #[arg(short, long, default_value = "-")]
        out: PathBuf,

        /// Name of the generated static (default: derived from the source name)
        #[arg(long = "var")]
        var_name: Option<String>,

        /// Output shape
        #[arg(long, value_enum)]
        shape: Option<ShapeArg>,

        /// Regex of paths to always include (repeatable)
        #[arg(short, long = "include", num_args = 1)]
        include: Vec<String>,

        /// Regex of paths to exclude; excluding a directory prunes its subtree (repeatable)
        #[arg(short, long = "exclude", num_args = 1)]
        exclude: Vec<String>,

        /// Maximum walk depth below the source (0 for unbounded)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Line width of the wrapped payload text
        #[arg(long)]
        chunk_width: Option<usize>,

        /// Module doc comment for generated source
        #[arg(long)]
        doc: Option<String>,

        /// Configuration file (default: <SOURCE>/embedfs.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overwrite an existing output file without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Inspect a JSON pack.
    ///
    /// Lists a directory, or prints a file's decoded content to stdout.
    Inspect {
        /// JSON pack produced with `--shape json` or `--shape flat-json`
        pack: PathBuf,

        /// Path inside the pack (default: `/`)
        path: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::ERROR
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose)?;

    let output_format = match cli.format.parse::<OutputFormat>() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(ExitCode::INVALID_INPUT);
        }
    };

    execute_command(cli.command, output_format)
}

/// Initializes logging infrastructure.
///
/// Logs go to stderr so that `-o -` keeps stdout clean.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Routes a command to its handler.
fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Pack {
            source,
            out,
            var_name,
            shape,
            include,
            exclude,
            max_depth,
            chunk_width,
            doc,
            config,
            yes,
        } => {
            let args = PackArgs {
                source,
                out: Some(out),
                var_name,
                shape,
                include,
                exclude,
                max_depth,
                chunk_width,
                module_doc: doc,
                config,
                yes,
            };
            commands::pack::run(args, output_format)
        }
        Commands::Inspect { pack, path } => {
            commands::inspect::run(&pack, path.as_deref(), output_format)
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
