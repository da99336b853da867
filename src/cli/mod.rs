//! cli
//!
//! Command-line interface layer for rlab.
//!
//! # Responsibilities
//!
//! - Build the command tree (global flags plus declared subcommand flags)
//! - Load configuration and install logging
//! - Dispatch to command handlers and print their results
//!
//! # Architecture
//!
//! The CLI layer is thin. Flag handling lives in [`crate::flags`], request
//! construction in [`crate::api`]. The binary talks to
//! [`PreviewApi`](crate::api::preview::PreviewApi), which prints the
//! request each command would send.

pub mod args;
pub mod commands;

pub use args::{GlobalArgs, Shell};
pub use commands::{Commands, Outcome};

use std::ffi::OsString;

use anyhow::{Context, Result};
use clap::FromArgMatches;
use tracing_subscriber::EnvFilter;

use crate::api::preview::PreviewApi;
use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI with explicit arguments (the first one is the binary name).
pub fn run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    init_logging(debug_requested(&args));

    let commands = Commands::new()?;
    let matches = commands.command()?.get_matches_from(args);
    let global = GlobalArgs::from_arg_matches(&matches)?;

    let verbosity = Verbosity::from_flags(global.quiet, global.debug);

    let config = Config::load(global.config.as_deref())?.with_host(global.host.clone())?;
    output::debug(format!("using API at {}", config.api_base()), verbosity);

    let api = PreviewApi::new(&config);
    let rt = tokio::runtime::Runtime::new()?;
    match rt.block_on(commands.dispatch(&matches, &api))? {
        Outcome::Response(response) => {
            output::print_json(&response, config.pretty(), verbosity)
                .context("failed to render response")?;
        }
        Outcome::Completion(shell) => {
            let mut stdout = std::io::stdout();
            commands::completion::completion(shell, commands.command()?, &mut stdout)?;
        }
    }

    Ok(())
}

/// Whether `--debug` appears among the options, before any `--`.
///
/// Logging is installed before the command tree is built, so this cannot
/// wait for clap.
fn debug_requested(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|arg| arg.as_os_str() != "--")
        .any(|arg| arg.as_os_str() == "--debug")
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise warnings only, or debug output for rlab with
/// `--debug`. A second call is a no-op.
fn init_logging(debug: bool) {
    let default = if debug { "rlab=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
