//! user impersonation-token command - Manage impersonation tokens
//!
//! Admin only. Tokens always belong to a named user.

use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use serde_json::Value;

use super::required;
use crate::api::{
    CreateImpersonationTokenOptions, GetImpersonationTokensOptions, GitlabApi,
    RevokeImpersonationTokenOptions,
};
use crate::flag_declaration;
use crate::flags::{flag, FlagError, FlagMapper, ISO_DATE};

flag_declaration! {
    pub struct TokenGetFlags {
        user: Text = flag("user").short('u').required().help("The ID or username of the user"),
        impersonation_token_id: Integer = flag("impersonation_token_id")
            .short('t')
            .help("The ID of the impersonation token. If empty, lists the user's tokens"),
        state: Text = flag("state")
            .short('s')
            .help("Filter tokens based on state: all, active or inactive"),
    }
}

flag_declaration! {
    pub struct TokenCreateFlags {
        user: Text = flag("user").short('u').required().help("The ID or username of the user"),
        name: Text = flag("name").short('n').required().help("The name of the impersonation token"),
        expires_at: Text = flag("expires_at")
            .short('e')
            .transform(ISO_DATE)
            .help("The expiration date of the impersonation token in ISO format (YYYY-MM-DD)"),
        scopes: TextList = flag("scopes")
            .short('s')
            .required()
            .help("The scopes of the token: api, read_user"),
    }
}

flag_declaration! {
    pub struct TokenRevokeFlags {
        user_id: Text = flag("user_id").short('u').required().help("The ID or username of the user"),
        impersonation_token_id: Integer = flag("impersonation_token_id")
            .short('t')
            .required()
            .help("The ID of the impersonation token"),
    }
}

/// The `user impersonation-token` group.
#[derive(Debug)]
pub struct TokenCommands {
    get: FlagMapper<TokenGetFlags, GetImpersonationTokensOptions>,
    create: FlagMapper<TokenCreateFlags, CreateImpersonationTokenOptions>,
    revoke: FlagMapper<TokenRevokeFlags, RevokeImpersonationTokenOptions>,
}

impl TokenCommands {
    pub fn new() -> Result<Self, FlagError> {
        Ok(Self {
            get: FlagMapper::new()?,
            create: FlagMapper::new()?,
            revoke: FlagMapper::new()?,
        })
    }

    pub fn command(&self) -> Result<Command, FlagError> {
        Ok(Command::new("impersonation-token")
            .about("Manage impersonation tokens")
            .long_about("Get, create and revoke impersonation tokens of a user. Admin only.")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(self.get.register(
                Command::new("get")
                    .about("Get impersonation tokens")
                    .long_about(
                        "Get one impersonation token of a user, or all of them filtered by state",
                    ),
            )?)
            .subcommand(
                self.create
                    .register(Command::new("create").about("Create an impersonation token"))?,
            )
            .subcommand(
                self.revoke
                    .register(Command::new("revoke").about("Revoke an impersonation token"))?,
            ))
    }

    pub async fn run(&self, matches: &ArgMatches, api: &dyn GitlabApi) -> Result<Value> {
        let Some((name, sub)) = matches.subcommand() else {
            bail!("missing impersonation-token subcommand");
        };

        let response = match name {
            "get" => {
                let options = self.get.bind_matches(sub)?;
                let user = api.user_id(&required(&options.user, "user")?).await?;
                match options.impersonation_token_id {
                    Some(token_id) => api.get_impersonation_token(user, token_id).await?,
                    None => api.list_impersonation_tokens(user, &options).await?,
                }
            }
            "create" => {
                let options = self.create.bind_matches(sub)?;
                let user = api.user_id(&required(&options.user, "user")?).await?;
                api.create_impersonation_token(user, &options).await?
            }
            "revoke" => {
                let options = self.revoke.bind_matches(sub)?;
                let user = api.user_id(&required(&options.user_id, "user_id")?).await?;
                let token_id = required(&options.impersonation_token_id, "impersonation_token_id")?;
                api.revoke_impersonation_token(user, token_id).await?
            }
            other => bail!("unknown impersonation-token subcommand '{}'", other),
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockGitlab;
    use crate::api::{Method, Operation};

    fn run_with(api: &MockGitlab, args: &[&str]) -> Result<Value> {
        let commands = TokenCommands::new()?;
        let matches = commands.command()?.try_get_matches_from(args)?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(commands.run(&matches, api))
    }

    #[test]
    fn command_tree_is_consistent() {
        TokenCommands::new().unwrap().command().unwrap().debug_assert();
    }

    #[test]
    fn every_token_flag_is_forwarded() {
        let commands = TokenCommands::new().unwrap();
        assert!(commands.get.unmapped_flags().is_empty());
        assert!(commands.create.unmapped_flags().is_empty());
        assert!(commands.revoke.unmapped_flags().is_empty());
    }

    #[test]
    fn create_converts_date_and_splits_scopes() {
        let api = MockGitlab::new().with_user("dave", 4);
        run_with(
            &api,
            &[
                "impersonation-token",
                "create",
                "-u",
                "dave",
                "-n",
                "ci",
                "-e",
                "2031-06-30",
                "-s",
                "api,read_user",
            ],
        )
        .unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::CreateImpersonationToken);
        assert_eq!(request.path, "/users/4/impersonation_tokens");
        assert_eq!(
            Value::Object(request.params),
            serde_json::json!({
                "name": "ci",
                "expires_at": "2031-06-30",
                "scopes": ["api", "read_user"]
            })
        );
    }

    #[test]
    fn create_rejects_malformed_expiry() {
        let api = MockGitlab::new();
        let err = run_with(
            &api,
            &[
                "impersonation-token",
                "create",
                "-u",
                "1",
                "-n",
                "ci",
                "-e",
                "30/06/2031",
                "-s",
                "api",
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FlagError>(),
            Some(FlagError::TransformFailed { name: "expires_at", .. })
        ));
        assert!(api.operations().is_empty());
    }

    #[test]
    fn get_lists_unless_a_token_is_named() {
        let api = MockGitlab::new();
        run_with(&api, &["impersonation-token", "get", "-u", "6", "-s", "active"]).unwrap();
        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::ListImpersonationTokens);
        assert_eq!(request.params["state"], "active");

        run_with(&api, &["impersonation-token", "get", "-u", "6", "-t", "11"]).unwrap();
        let request = api.last_operation().unwrap();
        assert_eq!(request.operation, Operation::GetImpersonationToken);
        assert_eq!(request.path, "/users/6/impersonation_tokens/11");
    }

    #[test]
    fn revoke_deletes_the_token() {
        let api = MockGitlab::new();
        run_with(&api, &["impersonation-token", "revoke", "-u", "6", "-t", "11"]).unwrap();

        let request = api.last_operation().unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/users/6/impersonation_tokens/11");
    }
}
