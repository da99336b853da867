//! flags::registry
//!
//! Registration of declared flags on a clap [`Command`].
//!
//! # Flag shapes
//!
//! | Kind | Accepted forms |
//! |------|----------------|
//! | text | `--name value`, `-n value` |
//! | integer | `--count 3` |
//! | boolean | `--flag`, `--flag=true`, `--flag=false` (also yes/no, on/off) |
//! | text-list | `--tag a --tag b`, `--tag a,b` |
//! | binary | `--avatar ./logo.png` |
//!
//! Flags are never marked required at the clap level. Required-ness is
//! enforced when binding so that partially specified invocations still reach
//! the command and can print usage.

use clap::builder::BoolishValueParser;
use clap::{value_parser, Arg, ArgAction, Command, ValueHint};

use super::descriptor::{FlagDescriptor, FlagKind};
use super::error::FlagError;

/// Add one flag per descriptor to `command`.
///
/// # Errors
///
/// `DuplicateFlagRegistration` if a long name or shorthand is already taken
/// on the command, including clap's own `--help`/`-h` (and
/// `--version`/`-V` when the command carries a version).
pub fn register(mut command: Command, descriptors: &[FlagDescriptor]) -> Result<Command, FlagError> {
    for descriptor in descriptors {
        if let Some(taken) = collision(&command, descriptor) {
            return Err(FlagError::DuplicateFlagRegistration {
                command: command.get_name().to_string(),
                name: taken,
            });
        }
        command = command.arg(build_arg(descriptor));
    }

    tracing::debug!(
        command = command.get_name(),
        flags = descriptors.len(),
        "registered flags"
    );

    Ok(command)
}

/// Check `command` and every command below it against flags they inherit
/// from an ancestor, such as the root's global flags.
///
/// clap only notices these clashes when the assembled tree is first parsed,
/// and then panics.
///
/// # Errors
///
/// `DuplicateFlagRegistration` naming the innermost command whose own flag
/// reuses an inherited long name or shorthand.
pub fn check_inherited(command: &Command, inherited: &[Arg]) -> Result<(), FlagError> {
    for arg in command.get_arguments() {
        for parent in inherited {
            let taken = if arg.get_long().is_some() && arg.get_long() == parent.get_long() {
                arg.get_long().map(str::to_string)
            } else if arg.get_short().is_some() && arg.get_short() == parent.get_short() {
                arg.get_short().map(|short| format!("-{}", short))
            } else {
                None
            };
            if let Some(name) = taken {
                return Err(FlagError::DuplicateFlagRegistration {
                    command: command.get_name().to_string(),
                    name,
                });
            }
        }
    }

    command
        .get_subcommands()
        .try_for_each(|sub| check_inherited(sub, inherited))
}

/// Name or shorthand of `descriptor` that is already in use on `command`.
fn collision(command: &Command, descriptor: &FlagDescriptor) -> Option<String> {
    let has_version = command.get_version().is_some() || command.get_long_version().is_some();

    if descriptor.name == "help" || (has_version && descriptor.name == "version") {
        return Some(descriptor.name.to_string());
    }
    if let Some(short) = descriptor.shorthand {
        if short == 'h' || (has_version && short == 'V') {
            return Some(format!("-{}", short));
        }
    }

    for arg in command.get_arguments() {
        if arg.get_id() == descriptor.name || arg.get_long() == Some(descriptor.name) {
            return Some(descriptor.name.to_string());
        }
        if descriptor.shorthand.is_some() && arg.get_short() == descriptor.shorthand {
            return Some(format!("-{}", arg.get_short().unwrap_or_default()));
        }
    }

    None
}

fn help_text(descriptor: &FlagDescriptor) -> String {
    if descriptor.required {
        format!("(required) {}", descriptor.description)
    } else {
        descriptor.description.to_string()
    }
}

fn build_arg(descriptor: &FlagDescriptor) -> Arg {
    let mut arg = Arg::new(descriptor.name)
        .long(descriptor.name)
        .help(help_text(descriptor));
    if let Some(short) = descriptor.shorthand {
        arg = arg.short(short);
    }

    match descriptor.kind {
        FlagKind::Text => arg
            .action(ArgAction::Set)
            .value_name("TEXT")
            .value_parser(value_parser!(String)),
        FlagKind::Integer => arg
            .action(ArgAction::Set)
            .value_name("INT")
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64)),
        FlagKind::Boolean => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_name("BOOL")
            .value_parser(BoolishValueParser::new()),
        FlagKind::TextList => arg
            .action(ArgAction::Append)
            .value_delimiter(',')
            .value_name("ITEM")
            .value_parser(value_parser!(String)),
        FlagKind::Binary => arg
            .action(ArgAction::Set)
            .value_name("FILE")
            .value_hint(ValueHint::FilePath)
            .value_parser(value_parser!(String)),
    }
}
