//! api::request
//!
//! Description of a single REST call: operation, method, path and parameters.
//!
//! Requests are built from bound options structs. Path identifiers are
//! URL-encoded; parameters are the options serialized to JSON with absent
//! fields omitted. GET and DELETE parameters travel as query, everything else
//! as body.

use serde::Serialize;
use serde_json::{Map, Value};

use super::options::{
    AddEmailOptions, AddSshKeyOptions, CreateImpersonationTokenOptions, CreateProjectOptions,
    CreateUserOptions, DeleteUserOptions, EditProjectOptions, ForkProjectOptions,
    GetImpersonationTokensOptions, GetProjectOptions, ListForksOptions, ListProjectsOptions,
    ListUsersOptions, ModifyUserOptions, ShareWithGroupOptions, UploadFileOptions,
    UserActivitiesOptions,
};
use super::traits::ApiError;
use crate::core::types::Identifier;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether parameters are sent as query string rather than body.
    pub fn uses_query(self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Operations the command layer performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListProjects,
    GetProject,
    CreateProject,
    EditProject,
    ForkProject,
    ShareProject,
    UnshareProject,
    ListForks,
    UploadFile,
    StarProject,
    UnstarProject,
    ArchiveProject,
    UnarchiveProject,
    DeleteProject,
    ListUsers,
    FindUser,
    GetUser,
    CreateUser,
    ModifyUser,
    DeleteUser,
    ListSshKeys,
    GetSshKey,
    AddSshKey,
    DeleteSshKey,
    ListEmails,
    GetEmail,
    AddEmail,
    DeleteEmail,
    ListImpersonationTokens,
    GetImpersonationToken,
    CreateImpersonationToken,
    RevokeImpersonationToken,
    UserActivities,
}

/// A fully described REST call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub operation: Operation,
    pub method: Method,
    /// Path below the API base, starting with `/`
    pub path: String,
    /// JSON object of parameters; empty when there are none
    pub params: Map<String, Value>,
}

impl ApiRequest {
    fn new(operation: Operation, method: Method, path: String) -> Self {
        Self {
            operation,
            method,
            path,
            params: Map::new(),
        }
    }

    fn with_params<T: Serialize>(mut self, options: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(options).map_err(|e| ApiError::Encode(e.to_string()))? {
            Value::Object(mut params) => {
                params.retain(|_, value| !value.is_null());
                self.params = params;
            }
            Value::Null => {}
            other => {
                return Err(ApiError::Encode(format!(
                    "parameters must serialize to an object, got {}",
                    other
                )))
            }
        }
        Ok(self)
    }
}

fn project_path(id: &Identifier) -> String {
    format!("/projects/{}", id.url_segment())
}

/// `/users/:id` for a given user, `/user` for the authenticated one.
fn owner_path(user: Option<i64>) -> String {
    match user {
        Some(id) => format!("/users/{}", id),
        None => "/user".to_string(),
    }
}

pub fn list_projects(options: &ListProjectsOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::ListProjects, Method::Get, "/projects".to_string())
        .with_params(options)
}

pub fn get_project(id: &Identifier, options: &GetProjectOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::GetProject, Method::Get, project_path(id)).with_params(options)
}

pub fn create_project(options: &CreateProjectOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::CreateProject, Method::Post, "/projects".to_string())
        .with_params(options)
}

pub fn edit_project(id: &Identifier, options: &EditProjectOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::EditProject, Method::Put, project_path(id)).with_params(options)
}

pub fn fork_project(id: &Identifier, options: &ForkProjectOptions) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/fork", project_path(id));
    ApiRequest::new(Operation::ForkProject, Method::Post, path).with_params(options)
}

pub fn share_project(
    id: &Identifier,
    options: &ShareWithGroupOptions,
) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/share", project_path(id));
    ApiRequest::new(Operation::ShareProject, Method::Post, path).with_params(options)
}

pub fn unshare_project(id: &Identifier, group_id: i64) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/share/{}", project_path(id), group_id);
    Ok(ApiRequest::new(Operation::UnshareProject, Method::Delete, path))
}

pub fn list_forks(id: &Identifier, options: &ListForksOptions) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/forks", project_path(id));
    ApiRequest::new(Operation::ListForks, Method::Get, path).with_params(options)
}

/// Upload of a local file for use in descriptions and comments.
///
/// The body names the file; reading and multipart encoding are left to the
/// transport.
pub fn upload_file(id: &Identifier, options: &UploadFileOptions) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/uploads", project_path(id));
    ApiRequest::new(Operation::UploadFile, Method::Post, path).with_params(options)
}

/// Parameterless project actions: star, unstar, archive, unarchive, delete.
pub fn project_action(operation: Operation, id: &Identifier) -> Result<ApiRequest, ApiError> {
    let base = project_path(id);
    let (method, path) = match operation {
        Operation::StarProject => (Method::Post, format!("{}/star", base)),
        Operation::UnstarProject => (Method::Post, format!("{}/unstar", base)),
        Operation::ArchiveProject => (Method::Post, format!("{}/archive", base)),
        Operation::UnarchiveProject => (Method::Post, format!("{}/unarchive", base)),
        Operation::DeleteProject => (Method::Delete, base),
        other => {
            return Err(ApiError::Unsupported(format!(
                "{:?} is not a project action",
                other
            )))
        }
    };
    Ok(ApiRequest::new(operation, method, path))
}

pub fn list_users(options: &ListUsersOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::ListUsers, Method::Get, "/users".to_string()).with_params(options)
}

/// Lookup of users by exact username.
pub fn find_user(username: &str) -> Result<ApiRequest, ApiError> {
    let mut request = ApiRequest::new(Operation::FindUser, Method::Get, "/users".to_string());
    request
        .params
        .insert("username".to_string(), Value::String(username.to_string()));
    Ok(request)
}

pub fn get_user(id: i64) -> Result<ApiRequest, ApiError> {
    Ok(ApiRequest::new(
        Operation::GetUser,
        Method::Get,
        format!("/users/{}", id),
    ))
}

pub fn create_user(options: &CreateUserOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::CreateUser, Method::Post, "/users".to_string()).with_params(options)
}

pub fn modify_user(id: i64, options: &ModifyUserOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::ModifyUser, Method::Put, format!("/users/{}", id))
        .with_params(options)
}

pub fn delete_user(id: i64, options: &DeleteUserOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(Operation::DeleteUser, Method::Delete, format!("/users/{}", id))
        .with_params(options)
}

pub fn list_ssh_keys(user: Option<i64>) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/keys", owner_path(user));
    Ok(ApiRequest::new(Operation::ListSshKeys, Method::Get, path))
}

pub fn get_ssh_key(key_id: i64) -> Result<ApiRequest, ApiError> {
    Ok(ApiRequest::new(
        Operation::GetSshKey,
        Method::Get,
        format!("/user/keys/{}", key_id),
    ))
}

pub fn add_ssh_key(user: Option<i64>, options: &AddSshKeyOptions) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/keys", owner_path(user));
    ApiRequest::new(Operation::AddSshKey, Method::Post, path).with_params(options)
}

pub fn delete_ssh_key(user: Option<i64>, key_id: i64) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/keys/{}", owner_path(user), key_id);
    Ok(ApiRequest::new(Operation::DeleteSshKey, Method::Delete, path))
}

pub fn list_emails(user: Option<i64>) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/emails", owner_path(user));
    Ok(ApiRequest::new(Operation::ListEmails, Method::Get, path))
}

pub fn get_email(email_id: i64) -> Result<ApiRequest, ApiError> {
    Ok(ApiRequest::new(
        Operation::GetEmail,
        Method::Get,
        format!("/user/emails/{}", email_id),
    ))
}

pub fn add_email(user: Option<i64>, options: &AddEmailOptions) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/emails", owner_path(user));
    ApiRequest::new(Operation::AddEmail, Method::Post, path).with_params(options)
}

pub fn delete_email(user: Option<i64>, email_id: i64) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/emails/{}", owner_path(user), email_id);
    Ok(ApiRequest::new(Operation::DeleteEmail, Method::Delete, path))
}

fn tokens_path(user: i64) -> String {
    format!("/users/{}/impersonation_tokens", user)
}

pub fn list_impersonation_tokens(
    user: i64,
    options: &GetImpersonationTokensOptions,
) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(
        Operation::ListImpersonationTokens,
        Method::Get,
        tokens_path(user),
    )
    .with_params(options)
}

pub fn get_impersonation_token(user: i64, token_id: i64) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/{}", tokens_path(user), token_id);
    Ok(ApiRequest::new(
        Operation::GetImpersonationToken,
        Method::Get,
        path,
    ))
}

pub fn create_impersonation_token(
    user: i64,
    options: &CreateImpersonationTokenOptions,
) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(
        Operation::CreateImpersonationToken,
        Method::Post,
        tokens_path(user),
    )
    .with_params(options)
}

pub fn revoke_impersonation_token(user: i64, token_id: i64) -> Result<ApiRequest, ApiError> {
    let path = format!("{}/{}", tokens_path(user), token_id);
    Ok(ApiRequest::new(
        Operation::RevokeImpersonationToken,
        Method::Delete,
        path,
    ))
}

pub fn user_activities(options: &UserActivitiesOptions) -> Result<ApiRequest, ApiError> {
    ApiRequest::new(
        Operation::UserActivities,
        Method::Get,
        "/user/activities".to_string(),
    )
    .with_params(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn path_identifiers_are_encoded() {
        let request = share_project(
            &Identifier::parse("group/project"),
            &ShareWithGroupOptions::default(),
        )
        .unwrap();
        assert_eq!(request.path, "/projects/group%2Fproject/share");
        assert_eq!(request.method, Method::Post);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let options = ShareWithGroupOptions {
            id: Some(Identifier::Numeric(10)),
            group_id: Some(3),
            group_access: Some(30),
            expires_at: NaiveDate::from_ymd_opt(2016, 9, 26),
        };
        let request = share_project(&Identifier::Numeric(10), &options).unwrap();
        assert_eq!(
            Value::Object(request.params),
            serde_json::json!({
                "group_id": 3,
                "group_access": 30,
                "expires_at": "2016-09-26"
            })
        );

        let empty = list_projects(&ListProjectsOptions::default()).unwrap();
        assert!(empty.params.is_empty());
    }

    #[test]
    fn project_actions() {
        let id = Identifier::Numeric(5);
        let delete = project_action(Operation::DeleteProject, &id).unwrap();
        assert_eq!((delete.method, delete.path.as_str()), (Method::Delete, "/projects/5"));

        let star = project_action(Operation::StarProject, &id).unwrap();
        assert_eq!(star.path, "/projects/5/star");

        assert!(project_action(Operation::ListUsers, &id).is_err());
    }

    #[test]
    fn find_user_queries_username() {
        let request = find_user("alice").unwrap();
        assert_eq!(request.path, "/users");
        assert_eq!(request.params["username"], "alice");
        assert!(request.method.uses_query());
    }

    #[test]
    fn owner_defaults_to_authenticated_user() {
        assert_eq!(list_ssh_keys(None).unwrap().path, "/user/keys");
        assert_eq!(list_ssh_keys(Some(4)).unwrap().path, "/users/4/keys");

        let delete = delete_email(Some(4), 9).unwrap();
        assert_eq!((delete.method, delete.path.as_str()), (Method::Delete, "/users/4/emails/9"));
        assert_eq!(delete_email(None, 9).unwrap().path, "/user/emails/9");
    }

    #[test]
    fn token_state_is_a_query_parameter() {
        let options = GetImpersonationTokensOptions {
            user: Some(Identifier::Numeric(2)),
            impersonation_token_id: None,
            state: Some("active".to_string()),
        };
        let request = list_impersonation_tokens(2, &options).unwrap();
        assert_eq!(request.path, "/users/2/impersonation_tokens");
        assert_eq!(Value::Object(request.params), serde_json::json!({"state": "active"}));

        let revoke = revoke_impersonation_token(2, 5).unwrap();
        assert_eq!(revoke.path, "/users/2/impersonation_tokens/5");
        assert!(revoke.params.is_empty());
    }

    #[test]
    fn unshare_puts_group_in_path() {
        let request = unshare_project(&Identifier::parse("a/b"), 7).unwrap();
        assert_eq!(request.path, "/projects/a%2Fb/share/7");
        assert_eq!(request.method, Method::Delete);
    }
}
