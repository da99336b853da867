//! api::traits
//!
//! The `GitlabApi` trait consumed by the command layer.
//!
//! # Design
//!
//! Implementations only provide [`GitlabApi::send`]; every operation has a
//! provided method that builds its [`ApiRequest`] and hands it over. This
//! keeps the per-operation knowledge (method, path, parameter placement) in
//! one place, [`super::request`], for every implementation.
//!
//! # Example
//!
//! ```
//! use rlab::api::mock::MockGitlab;
//! use rlab::api::{GitlabApi, ShareWithGroupOptions};
//! use rlab::core::types::Identifier;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let api = MockGitlab::new();
//! let options = ShareWithGroupOptions {
//!     group_id: Some(3),
//!     group_access: Some(30),
//!     ..Default::default()
//! };
//! api.share_project(&Identifier::parse("group/project"), &options)
//!     .await
//!     .unwrap();
//! assert_eq!(api.operations().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::options::{
    AddEmailOptions, AddSshKeyOptions, CreateImpersonationTokenOptions, CreateProjectOptions,
    CreateUserOptions, DeleteUserOptions, EditProjectOptions, ForkProjectOptions,
    GetImpersonationTokensOptions, GetProjectOptions, ListForksOptions, ListProjectsOptions,
    ListUsersOptions, ModifyUserOptions, ShareWithGroupOptions, UploadFileOptions,
    UserActivitiesOptions,
};
use super::request::{self, ApiRequest, Operation};
use crate::core::types::Identifier;

/// Errors from API operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Request parameters could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// The operation is not supported by this implementation.
    #[error("not supported: {0}")]
    Unsupported(String),
}

/// Access to the GitLab REST API.
///
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait GitlabApi: Send + Sync {
    /// Implementation name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Perform one request and return the response document.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;

    async fn list_projects(&self, options: &ListProjectsOptions) -> Result<Value, ApiError> {
        self.send(request::list_projects(options)?).await
    }

    async fn get_project(
        &self,
        id: &Identifier,
        options: &GetProjectOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::get_project(id, options)?).await
    }

    async fn create_project(&self, options: &CreateProjectOptions) -> Result<Value, ApiError> {
        self.send(request::create_project(options)?).await
    }

    async fn edit_project(
        &self,
        id: &Identifier,
        options: &EditProjectOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::edit_project(id, options)?).await
    }

    async fn fork_project(
        &self,
        id: &Identifier,
        options: &ForkProjectOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::fork_project(id, options)?).await
    }

    async fn share_project(
        &self,
        id: &Identifier,
        options: &ShareWithGroupOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::share_project(id, options)?).await
    }

    async fn unshare_project(&self, id: &Identifier, group_id: i64) -> Result<Value, ApiError> {
        self.send(request::unshare_project(id, group_id)?).await
    }

    async fn list_forks(
        &self,
        id: &Identifier,
        options: &ListForksOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::list_forks(id, options)?).await
    }

    async fn upload_file(
        &self,
        id: &Identifier,
        options: &UploadFileOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::upload_file(id, options)?).await
    }

    async fn star_project(&self, id: &Identifier) -> Result<Value, ApiError> {
        self.send(request::project_action(Operation::StarProject, id)?)
            .await
    }

    async fn unstar_project(&self, id: &Identifier) -> Result<Value, ApiError> {
        self.send(request::project_action(Operation::UnstarProject, id)?)
            .await
    }

    async fn archive_project(&self, id: &Identifier) -> Result<Value, ApiError> {
        self.send(request::project_action(Operation::ArchiveProject, id)?)
            .await
    }

    async fn unarchive_project(&self, id: &Identifier) -> Result<Value, ApiError> {
        self.send(request::project_action(Operation::UnarchiveProject, id)?)
            .await
    }

    async fn delete_project(&self, id: &Identifier) -> Result<Value, ApiError> {
        self.send(request::project_action(Operation::DeleteProject, id)?)
            .await
    }

    async fn list_users(&self, options: &ListUsersOptions) -> Result<Value, ApiError> {
        self.send(request::list_users(options)?).await
    }

    /// Numeric ID of the user with exactly this username.
    ///
    /// # Errors
    ///
    /// `NotFound` if no user has that username.
    async fn resolve_user(&self, username: &str) -> Result<i64, ApiError> {
        let found = self.send(request::find_user(username)?).await?;
        found
            .as_array()
            .and_then(|users| users.first())
            .and_then(|user| user.get("id"))
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::NotFound(format!("user '{}'", username)))
    }

    /// Numeric user ID for an identifier, looking usernames up.
    async fn user_id(&self, user: &Identifier) -> Result<i64, ApiError> {
        match user {
            Identifier::Numeric(id) => Ok(*id),
            Identifier::Path(username) => self.resolve_user(username).await,
        }
    }

    async fn get_user(&self, id: i64) -> Result<Value, ApiError> {
        self.send(request::get_user(id)?).await
    }

    async fn create_user(&self, options: &CreateUserOptions) -> Result<Value, ApiError> {
        self.send(request::create_user(options)?).await
    }

    async fn modify_user(&self, id: i64, options: &ModifyUserOptions) -> Result<Value, ApiError> {
        self.send(request::modify_user(id, options)?).await
    }

    async fn delete_user(&self, id: i64, options: &DeleteUserOptions) -> Result<Value, ApiError> {
        self.send(request::delete_user(id, options)?).await
    }

    /// Numeric user ID when a user is given; `None` means the authenticated
    /// user.
    async fn owner_id(&self, user: Option<&Identifier>) -> Result<Option<i64>, ApiError> {
        match user {
            Some(user) => Ok(Some(self.user_id(user).await?)),
            None => Ok(None),
        }
    }

    async fn list_ssh_keys(&self, user: Option<i64>) -> Result<Value, ApiError> {
        self.send(request::list_ssh_keys(user)?).await
    }

    async fn get_ssh_key(&self, key_id: i64) -> Result<Value, ApiError> {
        self.send(request::get_ssh_key(key_id)?).await
    }

    async fn add_ssh_key(
        &self,
        user: Option<i64>,
        options: &AddSshKeyOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::add_ssh_key(user, options)?).await
    }

    async fn delete_ssh_key(&self, user: Option<i64>, key_id: i64) -> Result<Value, ApiError> {
        self.send(request::delete_ssh_key(user, key_id)?).await
    }

    async fn list_emails(&self, user: Option<i64>) -> Result<Value, ApiError> {
        self.send(request::list_emails(user)?).await
    }

    async fn get_email(&self, email_id: i64) -> Result<Value, ApiError> {
        self.send(request::get_email(email_id)?).await
    }

    async fn add_email(
        &self,
        user: Option<i64>,
        options: &AddEmailOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::add_email(user, options)?).await
    }

    async fn delete_email(&self, user: Option<i64>, email_id: i64) -> Result<Value, ApiError> {
        self.send(request::delete_email(user, email_id)?).await
    }

    async fn list_impersonation_tokens(
        &self,
        user: i64,
        options: &GetImpersonationTokensOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::list_impersonation_tokens(user, options)?)
            .await
    }

    async fn get_impersonation_token(&self, user: i64, token_id: i64) -> Result<Value, ApiError> {
        self.send(request::get_impersonation_token(user, token_id)?)
            .await
    }

    async fn create_impersonation_token(
        &self,
        user: i64,
        options: &CreateImpersonationTokenOptions,
    ) -> Result<Value, ApiError> {
        self.send(request::create_impersonation_token(user, options)?)
            .await
    }

    async fn revoke_impersonation_token(
        &self,
        user: i64,
        token_id: i64,
    ) -> Result<Value, ApiError> {
        self.send(request::revoke_impersonation_token(user, token_id)?)
            .await
    }

    async fn user_activities(&self, options: &UserActivitiesOptions) -> Result<Value, ApiError> {
        self.send(request::user_activities(options)?).await
    }
}
