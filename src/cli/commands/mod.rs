//! cli::commands
//!
//! Command tree construction and dispatch.
//!
//! # Architecture
//!
//! Each command group owns the flag mappers of its subcommands. The mappers
//! are built once, when [`Commands::new`] runs; they register their flags on
//! the clap tree and later bind the parsed flags into API options.
//!
//! Command handlers:
//! 1. Bind flags into an options struct
//! 2. Call the API
//! 3. Return the response document for printing

pub mod completion;
pub mod emails;
pub mod project;
pub mod ssh_keys;
pub mod tokens;
pub mod user;

pub use project::ProjectCommands;
pub use user::UserCommands;

use anyhow::{bail, Result};
use clap::{Arg, ArgMatches, Command, CommandFactory};
use serde_json::Value;

use super::args::GlobalArgs;
use crate::api::GitlabApi;
use crate::flags::{check_inherited, FlagError};

/// All command groups.
#[derive(Debug)]
pub struct Commands {
    project: ProjectCommands,
    user: UserCommands,
}

/// What a dispatched command asks the caller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Print this response document.
    Response(Value),
    /// Write shell completions.
    Completion(super::args::Shell),
}

impl Commands {
    pub fn new() -> Result<Self, FlagError> {
        Ok(Self {
            project: ProjectCommands::new()?,
            user: UserCommands::new()?,
        })
    }

    /// Build the complete command tree, global flags included.
    ///
    /// # Errors
    ///
    /// `DuplicateFlagRegistration` if a declared flag reuses the name or
    /// shorthand of a global flag.
    pub fn command(&self) -> Result<Command, FlagError> {
        let root = GlobalArgs::command();
        let globals = global_args(&root);

        let groups = [
            self.project.command()?,
            self.user.command()?,
            completion::command(),
        ];
        let mut root = root.subcommand_required(true).arg_required_else_help(true);
        for group in groups {
            check_inherited(&group, &globals)?;
            root = root.subcommand(group);
        }
        Ok(root)
    }

    /// Dispatch the selected subcommand.
    pub async fn dispatch(&self, matches: &ArgMatches, api: &dyn GitlabApi) -> Result<Outcome> {
        match matches.subcommand() {
            Some(("project", sub)) => Ok(Outcome::Response(self.project.run(sub, api).await?)),
            Some(("user", sub)) => Ok(Outcome::Response(self.user.run(sub, api).await?)),
            Some(("completion", sub)) => Ok(Outcome::Completion(completion::shell(sub)?)),
            Some((other, _)) => bail!("unknown command '{}'", other),
            None => bail!("no command given"),
        }
    }
}

/// A bound value whose flag is declared required.
///
/// Binding already rejects absent required flags; this keeps handlers free of
/// `unwrap` when they move the value out of its `Option`.
pub(crate) fn required<T: Clone>(value: &Option<T>, name: &'static str) -> Result<T, FlagError> {
    value
        .clone()
        .ok_or(FlagError::MissingRequiredFlag { name })
}

/// Flags of `root` that every subcommand inherits.
fn global_args(root: &Command) -> Vec<Arg> {
    root.get_arguments()
        .filter(|arg| arg.is_global_set())
        .cloned()
        .collect()
}
