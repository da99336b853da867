//! api
//!
//! The remote API seam used by commands.
//!
//! # Modules
//!
//! - [`traits`] - The `GitlabApi` trait and `ApiError`
//! - [`options`] - Option structs that flags are bound into
//! - [`request`] - Per-operation request construction
//! - [`mock`] - Recording mock for tests
//! - [`preview`] - Renders requests instead of sending them

pub mod mock;
pub mod options;
pub mod preview;
pub mod request;
pub mod traits;

pub use options::{
    AddEmailOptions, AddSshKeyOptions, CreateImpersonationTokenOptions, CreateProjectOptions,
    CreateUserOptions, DeleteEmailOptions, DeleteSshKeyOptions, DeleteUserOptions,
    EditProjectOptions, ForkProjectOptions, GetEmailOptions, GetImpersonationTokensOptions,
    GetProjectOptions, GetSshKeyOptions, GetUserOptions, ListEmailsOptions, ListForksOptions,
    ListProjectsOptions, ListSshKeysOptions, ListUsersOptions, ModifyUserOptions, ProjectRef,
    RevokeImpersonationTokenOptions, ShareWithGroupOptions, UnshareProjectOptions,
    UploadFileOptions, UserActivitiesOptions,
};
pub use request::{ApiRequest, Method, Operation};
pub use traits::{ApiError, GitlabApi};
