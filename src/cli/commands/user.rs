//! user command - Manage users
//!
//! `modify` and `delete` take a user ID or a username; usernames are looked
//! up through the API before the call. SSH keys, emails and impersonation
//! tokens are nested groups with their own modules.

use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use serde_json::Value;

use super::emails::EmailCommands;
use super::required;
use super::ssh_keys::SshKeyCommands;
use super::tokens::TokenCommands;
use crate::api::{
    CreateUserOptions, DeleteUserOptions, GetUserOptions, GitlabApi, ListUsersOptions,
    ModifyUserOptions, UserActivitiesOptions,
};
use crate::core::types::Identifier;
use crate::flag_declaration;
use crate::flags::{flag, FlagError, FlagMapper, ISO_DATE};

flag_declaration! {
    pub struct UserGetFlags {
        id: Integer = flag("id").short('i').help("The ID of a user"),
        username: Text = flag("username").short('u').help("Username of a user"),
    }
}

flag_declaration! {
    pub struct UserListFlags {
        active: Boolean = flag("active").help("Filter users based on state active"),
        blocked: Boolean = flag("blocked").help("Filter users based on state blocked"),
        search: Text = flag("search").help("Search for users by email or username (admin only)"),
        username: Text = flag("username").help("Lookup users by username (admin only)"),
        extern_uid: Text = flag("extern_uid")
            .help("Lookup users by external UID and provider (admin only)"),
        provider: Text = flag("provider")
            .help("Lookup users by external UID and provider (admin only)"),
        external: Boolean = flag("external").help("Search for users who are external (admin only)"),
        created_before: Text = flag("created_before")
            .help("Search users created before, e.g. 2001-01-02T00:00:00.060Z (admin only)"),
        created_after: Text = flag("created_after")
            .help("Search users created after, e.g. 2001-01-02T00:00:00.060Z (admin only)"),
        custom_attribute_key: Text = flag("custom_attribute_key")
            .help("Filter by custom attribute key (admin only)"),
        custom_attribute_value: Text = flag("custom_attribute_value")
            .help("Filter by custom attribute value (admin only)"),
    }
}

flag_declaration! {
    pub struct UserCreateFlags {
        email: Text = flag("email").short('e').required().help("Email"),
        password: Text = flag("password").short('p').help("Password"),
        reset_password: Boolean = flag("reset_password").help("Send user password reset link"),
        username: Text = flag("username").short('u').required().help("Username"),
        name: Text = flag("name").short('n').required().help("Name"),
        skype: Text = flag("skype").help("Skype ID"),
        linkedin: Text = flag("linkedin").help("LinkedIn"),
        twitter: Text = flag("twitter").help("Twitter account"),
        website_url: Text = flag("website_url").help("Website URL"),
        organization: Text = flag("organization").help("Organization name"),
        projects_limit: Integer = flag("projects_limit").help("Number of projects user can create"),
        extern_uid: Text = flag("extern_uid").help("External UID"),
        provider: Text = flag("provider").help("External provider name"),
        bio: Text = flag("bio").help("User's biography"),
        location: Text = flag("location").help("User's location"),
        admin: Boolean = flag("admin").help("User is admin"),
        can_create_group: Boolean = flag("can_create_group").help("User can create groups"),
        skip_confirmation: Boolean = flag("skip_confirmation").help("Skip confirmation"),
        external: Boolean = flag("external").help("Flags the user as external"),
    }
}

flag_declaration! {
    pub struct UserModifyFlags {
        id: Text = flag("id").short('i').required().help("User ID or username of the user to modify"),
        email: Text = flag("email").short('e').help("Email"),
        password: Text = flag("password").short('p').help("Password"),
        username: Text = flag("username").short('u').help("Username"),
        name: Text = flag("name").short('n').help("Name"),
        skype: Text = flag("skype").help("Skype ID"),
        linkedin: Text = flag("linkedin").help("LinkedIn"),
        twitter: Text = flag("twitter").help("Twitter account"),
        website_url: Text = flag("website_url").help("Website URL"),
        organization: Text = flag("organization").help("Organization name"),
        projects_limit: Integer = flag("projects_limit").help("Number of projects user can create"),
        extern_uid: Text = flag("extern_uid").help("External UID"),
        provider: Text = flag("provider").help("External provider name"),
        bio: Text = flag("bio").help("User's biography"),
        location: Text = flag("location").help("User's location"),
        admin: Boolean = flag("admin").help("User is admin"),
        can_create_group: Boolean = flag("can_create_group").help("User can create groups"),
        skip_confirmation: Boolean = flag("skip_confirmation").help("Skip confirmation"),
        external: Boolean = flag("external").help("Flags the user as external"),
    }
}

flag_declaration! {
    pub struct UserDeleteFlags {
        id: Text = flag("id").short('i').required().help("User ID or username of the user to delete"),
        hard_delete: Boolean = flag("hard_delete").short('d').help(
            "Delete contributions and solely owned groups instead of moving them to the ghost user",
        ),
    }
}

flag_declaration! {
    pub struct UserActivitiesFlags {
        from: Text = flag("from")
            .transform(ISO_DATE)
            .help("Date string in the format YEAR-MONTH-DAY, e.g. 2016-03-11. Defaults to 6 months ago"),
    }
}

/// The `user` command group with its flag mappers.
#[derive(Debug)]
pub struct UserCommands {
    get: FlagMapper<UserGetFlags, GetUserOptions>,
    list: FlagMapper<UserListFlags, ListUsersOptions>,
    create: FlagMapper<UserCreateFlags, CreateUserOptions>,
    modify: FlagMapper<UserModifyFlags, ModifyUserOptions>,
    delete: FlagMapper<UserDeleteFlags, DeleteUserOptions>,
    activities: FlagMapper<UserActivitiesFlags, UserActivitiesOptions>,
    ssh_keys: SshKeyCommands,
    emails: EmailCommands,
    tokens: TokenCommands,
}

impl UserCommands {
    pub fn new() -> Result<Self, FlagError> {
        Ok(Self {
            get: FlagMapper::new()?,
            list: FlagMapper::new()?,
            create: FlagMapper::new()?,
            modify: FlagMapper::new()?,
            delete: FlagMapper::new()?,
            activities: FlagMapper::new()?,
            ssh_keys: SshKeyCommands::new()?,
            emails: EmailCommands::new()?,
            tokens: TokenCommands::new()?,
        })
    }

    pub fn command(&self) -> Result<Command, FlagError> {
        Ok(Command::new("user")
            .about("Manage users")
            .long_about("Create, update and delete users")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(self.get.register(
                Command::new("get")
                    .about("Get a single user")
                    .long_about("Get a single user. Provide either --id or --username."),
            )?)
            .subcommand(self.list.register(Command::new("ls").about("List users"))?)
            .subcommand(self.create.register(
                Command::new("create")
                    .about("Create a new user")
                    .long_about(
                        "Creates a new user. Only administrators can create users. Either \
                         password or reset_password should be given.",
                    ),
            )?)
            .subcommand(
                self.modify
                    .register(Command::new("modify").about("Modify an existing user"))?,
            )
            .subcommand(
                self.delete
                    .register(Command::new("delete").about("Delete a user"))?,
            )
            .subcommand(self.ssh_keys.command()?)
            .subcommand(self.emails.command()?)
            .subcommand(self.tokens.command()?)
            .subcommand(self.activities.register(
                Command::new("activities")
                    .about("Get the last activity date for all users")
                    .long_about(
                        "Get the last activity date for all users, sorted from oldest to newest. \
                         Admin only.",
                    ),
            )?))
    }

    pub async fn run(&self, matches: &ArgMatches, api: &dyn GitlabApi) -> Result<Value> {
        let Some((name, sub)) = matches.subcommand() else {
            bail!("missing user subcommand");
        };

        let response = match name {
            "get" => {
                let options = self.get.bind_matches(sub)?;
                let id = match (options.id, options.username) {
                    (Some(id), None) => id,
                    (None, Some(username)) => api.resolve_user(&username).await?,
                    _ => bail!("provide exactly one of --id or --username"),
                };
                api.get_user(id).await?
            }
            "ls" => {
                let options = self.list.bind_matches(sub)?;
                api.list_users(&options).await?
            }
            "create" => {
                let options = self.create.bind_matches(sub)?;
                api.create_user(&options).await?
            }
            "modify" => {
                let options = self.modify.bind_matches(sub)?;
                let id = api.user_id(&user_ref(&options.id)?).await?;
                api.modify_user(id, &options).await?
            }
            "delete" => {
                let options = self.delete.bind_matches(sub)?;
                let id = api.user_id(&user_ref(&options.id)?).await?;
                api.delete_user(id, &options).await?
            }
            "ssh-keys" => self.ssh_keys.run(sub, api).await?,
            "emails" => self.emails.run(sub, api).await?,
            "impersonation-token" => self.tokens.run(sub, api).await?,
            "activities" => {
                let options = self.activities.bind_matches(sub)?;
                api.user_activities(&options).await?
            }
            other => bail!("unknown user subcommand '{}'", other),
        };

        Ok(response)
    }
}

fn user_ref(id: &Option<Identifier>) -> Result<Identifier, FlagError> {
    required(id, "id")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockGitlab;
    use crate::api::Operation;

    fn run_with(api: &MockGitlab, args: &[&str]) -> Result<Value> {
        let commands = UserCommands::new()?;
        let matches = commands.command()?.try_get_matches_from(args)?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(commands.run(&matches, api))
    }

    #[test]
    fn command_tree_is_consistent() {
        UserCommands::new().unwrap().command().unwrap().debug_assert();
    }

    #[test]
    fn skip_confirmation_is_accepted_but_not_forwarded() {
        let commands = UserCommands::new().unwrap();
        assert_eq!(commands.create.unmapped_flags(), vec!["skip_confirmation"]);

        let api = MockGitlab::new();
        run_with(
            &api,
            &[
                "user",
                "create",
                "-e",
                "a@example.com",
                "-u",
                "alice",
                "-n",
                "Alice",
                "--skip_confirmation",
            ],
        )
        .unwrap();
        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::CreateUser);
        assert!(request.params.get("skip_confirmation").is_none());
        assert_eq!(request.params["username"], "alice");
    }

    #[test]
    fn create_requires_email_first() {
        let api = MockGitlab::new();
        let err = run_with(&api, &["user", "create"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FlagError>(),
            Some(FlagError::MissingRequiredFlag { name: "email" })
        ));
    }

    #[test]
    fn get_by_username_resolves_first() {
        let api = MockGitlab::new().with_user("alice", 7);
        run_with(&api, &["user", "get", "-u", "alice"]).unwrap();

        let operations: Vec<Operation> = api.operations().iter().map(|r| r.operation).collect();
        assert_eq!(operations, vec![Operation::FindUser, Operation::GetUser]);
        assert_eq!(api.last_operation().unwrap().path, "/users/7");
    }

    #[test]
    fn get_needs_exactly_one_selector() {
        let api = MockGitlab::new();
        assert!(run_with(&api, &["user", "get"]).is_err());
        assert!(run_with(&api, &["user", "get", "-i", "1", "-u", "x"]).is_err());
        assert!(api.operations().is_empty());
    }

    #[test]
    fn delete_accepts_numeric_id_without_lookup() {
        let api = MockGitlab::new();
        run_with(&api, &["user", "delete", "-i", "12", "-d"]).unwrap();

        let operations = api.operations();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].path, "/users/12");
        assert_eq!(operations[0].params["hard_delete"], true);
    }

    #[test]
    fn modify_by_unknown_username_fails() {
        let api = MockGitlab::new();
        let err = run_with(&api, &["user", "modify", "-i", "nobody", "--bio", "x"]).unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn nested_groups_are_dispatched() {
        let api = MockGitlab::new();
        run_with(&api, &["user", "ssh-keys"]).unwrap();
        run_with(&api, &["user", "emails", "ls"]).unwrap();
        run_with(&api, &["user", "impersonation-token", "revoke", "-u", "2", "-t", "5"]).unwrap();

        let operations: Vec<Operation> = api.operations().iter().map(|r| r.operation).collect();
        assert_eq!(
            operations,
            vec![
                Operation::ListSshKeys,
                Operation::ListEmails,
                Operation::RevokeImpersonationToken,
            ]
        );
    }

    #[test]
    fn activities_take_an_iso_date() {
        let api = MockGitlab::new();
        run_with(&api, &["user", "activities", "--from", "2016-03-11"]).unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::UserActivities);
        assert_eq!(request.path, "/user/activities");
        assert_eq!(request.params["from"], "2016-03-11");

        assert!(run_with(&api, &["user", "activities", "--from", "March"]).is_err());
    }
}
