//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use embedfs_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use embedfs_cli::commands::completions;
///
/// let mut cmd = Command::new("embedfs");
/// let mut script = Vec::new();
/// completions::generate_completions(Shell::Bash, &mut cmd, &mut script);
/// assert!(!script.is_empty());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    info!("Generating {} completions", shell);
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Returns
///
/// Returns `Ok(ExitCode::SUCCESS)` on successful generation.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_for(shell: Shell) -> String {
        let mut cmd = Command::new("embedfs").subcommand(Command::new("pack"));
        let mut out = Vec::new();
        generate_completions(shell, &mut cmd, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_generate_completions_bash() {
        assert!(script_for(Shell::Bash).contains("embedfs"));
    }

    #[test]
    fn test_generate_completions_zsh() {
        assert!(script_for(Shell::Zsh).contains("#compdef embedfs"));
    }

    #[test]
    fn test_generate_completions_fish() {
        assert!(script_for(Shell::Fish).contains("pack"));
    }

    #[test]
    fn test_generate_completions_powershell() {
        assert!(!script_for(Shell::PowerShell).is_empty());
    }
}
