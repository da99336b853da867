//! completion command - Generate shell completion scripts

use crate::cli::args::Shell;
use anyhow::Result;
use clap::{ArgMatches, Command};
use clap_complete::{generate, shells};
use std::io::Write;

/// The `completion` subcommand definition.
pub fn command() -> Command {
    Command::new("completion")
        .about("Generate shell completion scripts")
        .arg(
            clap::Arg::new("shell")
                .required(true)
                .value_parser(clap::value_parser!(Shell)),
        )
}

/// Shell selected on the command line.
pub fn shell(matches: &ArgMatches) -> Result<Shell> {
    matches
        .get_one::<Shell>("shell")
        .copied()
        .ok_or_else(|| anyhow::anyhow!("missing shell"))
}

/// Write completions for the full command tree to `out`.
pub fn completion(shell: Shell, mut cmd: Command, out: &mut dyn Write) -> Result<()> {
    let name = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &name, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &name, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, &name, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &name, out),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Commands;

    #[test]
    fn bash_completion_mentions_declared_flags() {
        let commands = Commands::new().unwrap();
        let mut out = Vec::new();
        completion(Shell::Bash, commands.command().unwrap(), &mut out).unwrap();
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("--group_access"));
        assert!(script.contains("--skip_confirmation"));
    }
}
