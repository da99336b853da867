//! user emails command - Manage email addresses

use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use serde_json::Value;

use super::required;
use crate::api::{
    AddEmailOptions, DeleteEmailOptions, GetEmailOptions, GitlabApi, ListEmailsOptions,
};
use crate::flag_declaration;
use crate::flags::{flag, FlagError, FlagMapper};

flag_declaration! {
    pub struct EmailListFlags {
        user_id: Text = flag("user_id")
            .short('u')
            .help("ID or username of user. If empty, lists the emails of the authenticated user"),
    }
}

flag_declaration! {
    pub struct EmailGetFlags {
        email_id: Integer = flag("email_id").short('i').required().help("Email ID"),
    }
}

flag_declaration! {
    pub struct EmailAddFlags {
        user_id: Text = flag("user_id")
            .short('u')
            .help("ID or username of user. If empty, adds the email for the authenticated user"),
        email: Text = flag("email").short('e').required().help("Email address"),
    }
}

flag_declaration! {
    pub struct EmailDeleteFlags {
        user_id: Text = flag("user_id")
            .short('u')
            .help("ID or username of user. If empty, deletes an email of the authenticated user"),
        email_id: Integer = flag("email_id").short('i').required().help("Email ID"),
    }
}

/// The `user emails` group.
#[derive(Debug)]
pub struct EmailCommands {
    list: FlagMapper<EmailListFlags, ListEmailsOptions>,
    get: FlagMapper<EmailGetFlags, GetEmailOptions>,
    add: FlagMapper<EmailAddFlags, AddEmailOptions>,
    delete: FlagMapper<EmailDeleteFlags, DeleteEmailOptions>,
}

impl EmailCommands {
    pub fn new() -> Result<Self, FlagError> {
        Ok(Self {
            list: FlagMapper::new()?,
            get: FlagMapper::new()?,
            add: FlagMapper::new()?,
            delete: FlagMapper::new()?,
        })
    }

    pub fn command(&self) -> Result<Command, FlagError> {
        Ok(Command::new("emails")
            .about("Manage emails")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(self.list.register(Command::new("ls").about("List emails"))?)
            .subcommand(self.get.register(
                Command::new("get").about("Get a single email of the authenticated user"),
            )?)
            .subcommand(self.add.register(Command::new("add").about("Add an email"))?)
            .subcommand(self.delete.register(Command::new("delete").about("Delete an email"))?))
    }

    pub async fn run(&self, matches: &ArgMatches, api: &dyn GitlabApi) -> Result<Value> {
        let Some((name, sub)) = matches.subcommand() else {
            bail!("missing emails subcommand");
        };

        let response = match name {
            "ls" => {
                let options = self.list.bind_matches(sub)?;
                let owner = api.owner_id(options.user_id.as_ref()).await?;
                api.list_emails(owner).await?
            }
            "get" => {
                let options = self.get.bind_matches(sub)?;
                api.get_email(required(&options.email_id, "email_id")?)
                    .await?
            }
            "add" => {
                let options = self.add.bind_matches(sub)?;
                let owner = api.owner_id(options.user_id.as_ref()).await?;
                api.add_email(owner, &options).await?
            }
            "delete" => {
                let options = self.delete.bind_matches(sub)?;
                let owner = api.owner_id(options.user_id.as_ref()).await?;
                api.delete_email(owner, required(&options.email_id, "email_id")?)
                    .await?
            }
            other => bail!("unknown emails subcommand '{}'", other),
        };

        Ok(response)
    }
}
