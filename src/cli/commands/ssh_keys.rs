//! user ssh-keys command - Manage SSH keys
//!
//! Without a subcommand the group lists keys. Keys belong to the
//! authenticated user unless a user is named.

use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use serde_json::Value;

use super::required;
use crate::api::{
    AddSshKeyOptions, DeleteSshKeyOptions, GetSshKeyOptions, GitlabApi, ListSshKeysOptions,
};
use crate::flag_declaration;
use crate::flags::{flag, FlagError, FlagMapper};

flag_declaration! {
    pub struct SshKeyListFlags {
        id: Text = flag("id")
            .short('i')
            .help("ID or username of user. If empty, lists the keys of the authenticated user"),
    }
}

flag_declaration! {
    pub struct SshKeyGetFlags {
        key_id: Integer = flag("key_id").short('k').required().help("The ID of an SSH key"),
    }
}

flag_declaration! {
    pub struct SshKeyAddFlags {
        user: Text = flag("user")
            .short('u')
            .help("ID or username of user. If empty, adds the key for the authenticated user"),
        key: Text = flag("key").short('k').required().help("New SSH key"),
        title: Text = flag("title").short('t').required().help("New SSH key's title"),
    }
}

flag_declaration! {
    pub struct SshKeyDeleteFlags {
        user: Text = flag("user")
            .short('u')
            .help("ID or username of user. If empty, deletes a key of the authenticated user"),
        key_id: Integer = flag("key_id").short('k').required().help("SSH key ID"),
    }
}

/// The `user ssh-keys` group.
#[derive(Debug)]
pub struct SshKeyCommands {
    list: FlagMapper<SshKeyListFlags, ListSshKeysOptions>,
    get: FlagMapper<SshKeyGetFlags, GetSshKeyOptions>,
    add: FlagMapper<SshKeyAddFlags, AddSshKeyOptions>,
    delete: FlagMapper<SshKeyDeleteFlags, DeleteSshKeyOptions>,
}

impl SshKeyCommands {
    pub fn new() -> Result<Self, FlagError> {
        Ok(Self {
            list: FlagMapper::new()?,
            get: FlagMapper::new()?,
            add: FlagMapper::new()?,
            delete: FlagMapper::new()?,
        })
    }

    pub fn command(&self) -> Result<Command, FlagError> {
        let group = Command::new("ssh-keys")
            .about("Manage SSH keys")
            .long_about("List SSH keys of a user, or get, add and delete a single key")
            .args_conflicts_with_subcommands(true);

        Ok(self
            .list
            .register(group)?
            .subcommand(self.get.register(
                Command::new("get").about("Get a single SSH key of the authenticated user"),
            )?)
            .subcommand(self.add.register(Command::new("add").about("Add an SSH key"))?)
            .subcommand(self.delete.register(Command::new("delete").about("Delete an SSH key"))?))
    }

    pub async fn run(&self, matches: &ArgMatches, api: &dyn GitlabApi) -> Result<Value> {
        let response = match matches.subcommand() {
            None => {
                let options = self.list.bind_matches(matches)?;
                let owner = api.owner_id(options.id.as_ref()).await?;
                api.list_ssh_keys(owner).await?
            }
            Some(("get", sub)) => {
                let options = self.get.bind_matches(sub)?;
                api.get_ssh_key(required(&options.key_id, "key_id")?).await?
            }
            Some(("add", sub)) => {
                let options = self.add.bind_matches(sub)?;
                let owner = api.owner_id(options.user.as_ref()).await?;
                api.add_ssh_key(owner, &options).await?
            }
            Some(("delete", sub)) => {
                let options = self.delete.bind_matches(sub)?;
                let owner = api.owner_id(options.user.as_ref()).await?;
                api.delete_ssh_key(owner, required(&options.key_id, "key_id")?)
                    .await?
            }
            Some((other, _)) => bail!("unknown ssh-keys subcommand '{}'", other),
        };

        Ok(response)
    }
}
