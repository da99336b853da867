//! cli::args
//!
//! Global command-line arguments.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version` / `-V`: Show version (top level only)
//! - `--config <path>`: Read configuration from this file
//! - `--host <url>`: GitLab host, overrides the config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only
//!
//! Subcommands are not part of the derive: their flags come from flag
//! declarations and are registered on the command tree at runtime.

use clap::Parser;
use std::path::PathBuf;

/// rlab - A command-line client for the GitLab API
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "rlab")]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    /// Read configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitLab host, e.g. https://gitlab.example.com
    #[arg(long, global = true, value_name = "URL")]
    pub host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
