//! api::options
//!
//! Option structs passed to API calls.
//!
//! Every field is optional; `None` means "not sent". Identifiers that end up
//! in the request path are carried in `id` and skipped during serialization.
//! Field names are the REST API's parameter names, which is also what the
//! command declarations bind against.

use chrono::NaiveDate;
use serde::Serialize;

use crate::bind_target;
use crate::core::types::Identifier;

/// Filters for listing projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListProjectsOptions {
    pub archived: Option<bool>,
    pub visibility: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub simple: Option<bool>,
    pub owned: Option<bool>,
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub statistics: Option<bool>,
    pub with_issues_enabled: Option<bool>,
    pub with_merge_requests_enabled: Option<bool>,
}

bind_target!(ListProjectsOptions {
    archived,
    visibility,
    order_by,
    sort,
    search,
    simple,
    owned,
    membership,
    starred,
    statistics,
    with_issues_enabled,
    with_merge_requests_enabled,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetProjectOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    pub statistics: Option<bool>,
}

bind_target!(GetProjectOptions { id, statistics });

/// Attributes of a new project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateProjectOptions {
    pub name: Option<String>,
    pub path: Option<String>,
    pub default_branch: Option<String>,
    pub namespace_id: Option<i64>,
    pub description: Option<String>,
    pub issues_enabled: Option<bool>,
    pub merge_requests_enabled: Option<bool>,
    pub jobs_enabled: Option<bool>,
    pub wiki_enabled: Option<bool>,
    pub snippets_enabled: Option<bool>,
    pub resolve_outdated_diff_discussions: Option<bool>,
    pub container_registry_enabled: Option<bool>,
    pub shared_runners_enabled: Option<bool>,
    pub visibility: Option<String>,
    pub import_url: Option<String>,
    pub public_jobs: Option<bool>,
    pub only_allow_merge_if_pipeline_succeeds: Option<bool>,
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,
    pub tag_list: Option<Vec<String>>,
    /// Path of the avatar image file
    pub avatar: Option<String>,
    pub printing_merge_request_link_enabled: Option<bool>,
    pub ci_config_path: Option<String>,
}

bind_target!(CreateProjectOptions {
    name,
    path,
    default_branch,
    namespace_id,
    description,
    issues_enabled,
    merge_requests_enabled,
    jobs_enabled,
    wiki_enabled,
    snippets_enabled,
    resolve_outdated_diff_discussions,
    container_registry_enabled,
    shared_runners_enabled,
    visibility,
    import_url,
    public_jobs,
    only_allow_merge_if_pipeline_succeeds,
    only_allow_merge_if_all_discussions_are_resolved,
    lfs_enabled,
    request_access_enabled,
    tag_list,
    avatar,
    printing_merge_request_link_enabled,
    ci_config_path,
});

/// Attributes to change on an existing project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditProjectOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub default_branch: Option<String>,
    pub description: Option<String>,
    pub issues_enabled: Option<bool>,
    pub merge_requests_enabled: Option<bool>,
    pub jobs_enabled: Option<bool>,
    pub wiki_enabled: Option<bool>,
    pub snippets_enabled: Option<bool>,
    pub resolve_outdated_diff_discussions: Option<bool>,
    pub container_registry_enabled: Option<bool>,
    pub shared_runners_enabled: Option<bool>,
    pub visibility: Option<String>,
    pub import_url: Option<String>,
    pub public_jobs: Option<bool>,
    pub only_allow_merge_if_pipeline_succeeds: Option<bool>,
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    pub lfs_enabled: Option<bool>,
    pub request_access_enabled: Option<bool>,
    pub tag_list: Option<Vec<String>>,
    pub ci_config_path: Option<String>,
}

bind_target!(EditProjectOptions {
    id,
    name,
    path,
    default_branch,
    description,
    issues_enabled,
    merge_requests_enabled,
    jobs_enabled,
    wiki_enabled,
    snippets_enabled,
    resolve_outdated_diff_discussions,
    container_registry_enabled,
    shared_runners_enabled,
    visibility,
    import_url,
    public_jobs,
    only_allow_merge_if_pipeline_succeeds,
    only_allow_merge_if_all_discussions_are_resolved,
    lfs_enabled,
    request_access_enabled,
    tag_list,
    ci_config_path,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForkProjectOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    /// Target namespace, by ID or path
    pub namespace: Option<Identifier>,
}

bind_target!(ForkProjectOptions { id, namespace });

/// Grant a group access to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShareWithGroupOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    pub group_id: Option<i64>,
    /// Numeric access level code
    pub group_access: Option<i64>,
    pub expires_at: Option<NaiveDate>,
}

bind_target!(ShareWithGroupOptions {
    id,
    group_id,
    group_access,
    expires_at,
});

/// Just a project reference, for parameterless actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectRef {
    #[serde(skip)]
    pub id: Option<Identifier>,
}

bind_target!(ProjectRef { id });

/// Filters for listing the forks of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListForksOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    pub archived: Option<bool>,
    pub visibility: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub simple: Option<bool>,
    pub owned: Option<bool>,
    pub membership: Option<bool>,
    pub starred: Option<bool>,
    pub statistics: Option<bool>,
    pub with_issues_enabled: Option<bool>,
    pub with_merge_requests_enabled: Option<bool>,
}

bind_target!(ListForksOptions {
    id,
    archived,
    visibility,
    order_by,
    sort,
    search,
    simple,
    owned,
    membership,
    starred,
    statistics,
    with_issues_enabled,
    with_merge_requests_enabled,
});

/// Remove a group's access to a project. Both values go into the path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnshareProjectOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    #[serde(skip)]
    pub group_id: Option<i64>,
}

bind_target!(UnshareProjectOptions { id, group_id });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadFileOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
    /// Local path of the file to upload
    pub file: Option<String>,
}

bind_target!(UploadFileOptions { id, file });

/// Filters for listing users.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListUsersOptions {
    pub active: Option<bool>,
    pub blocked: Option<bool>,
    pub search: Option<String>,
    pub username: Option<String>,
    pub extern_uid: Option<String>,
    pub provider: Option<String>,
    pub external: Option<bool>,
    pub created_before: Option<String>,
    pub created_after: Option<String>,
    pub custom_attribute_key: Option<String>,
    pub custom_attribute_value: Option<String>,
}

bind_target!(ListUsersOptions {
    active,
    blocked,
    search,
    username,
    extern_uid,
    provider,
    external,
    created_before,
    created_after,
    custom_attribute_key,
    custom_attribute_value,
});

/// A user selected by numeric ID or by username.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetUserOptions {
    pub id: Option<i64>,
    pub username: Option<String>,
}

bind_target!(GetUserOptions { id, username });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateUserOptions {
    pub email: Option<String>,
    pub password: Option<String>,
    pub reset_password: Option<bool>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub skype: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website_url: Option<String>,
    pub organization: Option<String>,
    pub projects_limit: Option<i64>,
    pub extern_uid: Option<String>,
    pub provider: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub admin: Option<bool>,
    pub can_create_group: Option<bool>,
    pub external: Option<bool>,
}

bind_target!(CreateUserOptions {
    email,
    password,
    reset_password,
    username,
    name,
    skype,
    linkedin,
    twitter,
    website_url,
    organization,
    projects_limit,
    extern_uid,
    provider,
    bio,
    location,
    admin,
    can_create_group,
    external,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModifyUserOptions {
    /// User ID or username
    #[serde(skip)]
    pub id: Option<Identifier>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub skype: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website_url: Option<String>,
    pub organization: Option<String>,
    pub projects_limit: Option<i64>,
    pub extern_uid: Option<String>,
    pub provider: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub admin: Option<bool>,
    pub can_create_group: Option<bool>,
    pub external: Option<bool>,
}

bind_target!(ModifyUserOptions {
    id,
    email,
    password,
    username,
    name,
    skype,
    linkedin,
    twitter,
    website_url,
    organization,
    projects_limit,
    extern_uid,
    provider,
    bio,
    location,
    admin,
    can_create_group,
    external,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteUserOptions {
    /// User ID or username
    #[serde(skip)]
    pub id: Option<Identifier>,
    pub hard_delete: Option<bool>,
}

bind_target!(DeleteUserOptions { id, hard_delete });

/// Whose SSH keys to list; the authenticated user when `id` is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListSshKeysOptions {
    #[serde(skip)]
    pub id: Option<Identifier>,
}

bind_target!(ListSshKeysOptions { id });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetSshKeyOptions {
    #[serde(skip)]
    pub key_id: Option<i64>,
}

bind_target!(GetSshKeyOptions { key_id });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddSshKeyOptions {
    /// Owner of the new key; the authenticated user when absent
    #[serde(skip)]
    pub user: Option<Identifier>,
    pub title: Option<String>,
    pub key: Option<String>,
}

bind_target!(AddSshKeyOptions { user, title, key });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteSshKeyOptions {
    #[serde(skip)]
    pub user: Option<Identifier>,
    #[serde(skip)]
    pub key_id: Option<i64>,
}

bind_target!(DeleteSshKeyOptions { user, key_id });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListEmailsOptions {
    #[serde(skip)]
    pub user_id: Option<Identifier>,
}

bind_target!(ListEmailsOptions { user_id });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetEmailOptions {
    #[serde(skip)]
    pub email_id: Option<i64>,
}

bind_target!(GetEmailOptions { email_id });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddEmailOptions {
    #[serde(skip)]
    pub user_id: Option<Identifier>,
    pub email: Option<String>,
}

bind_target!(AddEmailOptions { user_id, email });

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeleteEmailOptions {
    #[serde(skip)]
    pub user_id: Option<Identifier>,
    #[serde(skip)]
    pub email_id: Option<i64>,
}

bind_target!(DeleteEmailOptions { user_id, email_id });

/// One impersonation token of a user, or all of them filtered by state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetImpersonationTokensOptions {
    #[serde(skip)]
    pub user: Option<Identifier>,
    #[serde(skip)]
    pub impersonation_token_id: Option<i64>,
    /// `all`, `active` or `inactive`
    pub state: Option<String>,
}

bind_target!(GetImpersonationTokensOptions {
    user,
    impersonation_token_id,
    state,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateImpersonationTokenOptions {
    #[serde(skip)]
    pub user: Option<Identifier>,
    pub name: Option<String>,
    pub expires_at: Option<NaiveDate>,
    pub scopes: Option<Vec<String>>,
}

bind_target!(CreateImpersonationTokenOptions {
    user,
    name,
    expires_at,
    scopes,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevokeImpersonationTokenOptions {
    #[serde(skip)]
    pub user_id: Option<Identifier>,
    #[serde(skip)]
    pub impersonation_token_id: Option<i64>,
}

bind_target!(RevokeImpersonationTokenOptions {
    user_id,
    impersonation_token_id,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserActivitiesOptions {
    /// Earliest activity date to include
    pub from: Option<NaiveDate>,
}

bind_target!(UserActivitiesOptions { from });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::BindTarget;

    #[test]
    fn slots_cover_every_field() {
        let names: Vec<&str> = ShareWithGroupOptions::slots()
            .iter()
            .map(|slot| slot.field())
            .collect();
        assert_eq!(names, vec!["id", "group_id", "group_access", "expires_at"]);
        assert_eq!(CreateUserOptions::slots().len(), 18);
    }

    #[test]
    fn token_scopes_serialize_as_array() {
        let options = CreateImpersonationTokenOptions {
            user: Some(Identifier::Numeric(3)),
            name: Some("ci".to_string()),
            expires_at: NaiveDate::from_ymd_opt(2031, 1, 1),
            scopes: Some(vec!["api".to_string(), "read_user".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({
                "name": "ci",
                "expires_at": "2031-01-01",
                "scopes": ["api", "read_user"]
            })
        );
    }

    #[test]
    fn path_id_is_not_serialized() {
        let options = ForkProjectOptions {
            id: Some(Identifier::Numeric(1)),
            namespace: Some(Identifier::parse("team")),
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"namespace": "team"})
        );
    }
}
