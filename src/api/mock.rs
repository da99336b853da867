//! api::mock
//!
//! Mock API implementation for deterministic testing.
//!
//! # Design
//!
//! `MockGitlab` records every request it receives and answers with a
//! document echoing the request. Username lookups are served from a seeded
//! user table. A single operation can be configured to fail.
//!
//! # Example
//!
//! ```
//! use rlab::api::mock::MockGitlab;
//! use rlab::api::{ApiError, GitlabApi, Operation};
//! use rlab::core::types::Identifier;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let api = MockGitlab::new()
//!     .with_user("alice", 7)
//!     .fail_on(Operation::DeleteProject, ApiError::NotFound("project".into()));
//!
//! assert_eq!(api.user_id(&Identifier::parse("alice")).await.unwrap(), 7);
//! assert!(api.delete_project(&Identifier::Numeric(1)).await.is_err());
//! # });
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::request::{ApiRequest, Operation};
use super::traits::{ApiError, GitlabApi};

/// Mock API for testing.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockGitlab {
    inner: Arc<Mutex<MockGitlabInner>>,
}

#[derive(Debug, Default)]
struct MockGitlabInner {
    /// Known users by username.
    users: BTreeMap<String, i64>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<(Operation, ApiError)>,
    /// Recorded requests for verification.
    operations: Vec<ApiRequest>,
}

impl MockGitlab {
    /// Create a new empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockGitlabInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a user for username lookups.
    pub fn with_user(self, username: &str, id: i64) -> Self {
        self.state().users.insert(username.to_string(), id);
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, operation: Operation, error: ApiError) -> Self {
        self.state().fail_on = Some((operation, error));
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.state().fail_on = None;
    }

    /// Get all recorded requests, in order.
    pub fn operations(&self) -> Vec<ApiRequest> {
        self.state().operations.clone()
    }

    /// The most recent request, if any.
    pub fn last_operation(&self) -> Option<ApiRequest> {
        self.state().operations.last().cloned()
    }

    /// Clear recorded requests.
    pub fn clear_operations(&self) {
        self.state().operations.clear();
    }
}

#[async_trait]
impl GitlabApi for MockGitlab {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let mut state = self.state();
        state.operations.push(request.clone());

        if let Some((operation, error)) = &state.fail_on {
            if *operation == request.operation {
                return Err(error.clone());
            }
        }

        if request.operation == Operation::FindUser {
            let username = request.params.get("username").and_then(Value::as_str);
            let users: Vec<Value> = state
                .users
                .iter()
                .filter(|(name, _)| Some(name.as_str()) == username)
                .map(|(name, id)| json!({"id": id, "username": name}))
                .collect();
            return Ok(Value::Array(users));
        }

        Ok(json!({
            "operation": request.operation,
            "method": request.method,
            "path": request.path,
            "params": request.params,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::options::{ListProjectsOptions, ShareWithGroupOptions};
    use crate::api::request::Method;
    use crate::core::types::Identifier;

    #[tokio::test]
    async fn records_requests() {
        let api = MockGitlab::new();
        let options = ShareWithGroupOptions {
            group_id: Some(3),
            group_access: Some(40),
            ..Default::default()
        };
        let response = api
            .share_project(&Identifier::Numeric(10), &options)
            .await
            .unwrap();

        assert_eq!(response["path"], "/projects/10/share");
        assert_eq!(response["params"]["group_access"], 40);

        let operations = api.operations();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].operation, Operation::ShareProject);
        assert_eq!(operations[0].method, Method::Post);
    }

    #[tokio::test]
    async fn fail_on_only_affects_that_operation() {
        let api = MockGitlab::new().fail_on(
            Operation::ListProjects,
            ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            },
        );

        let err = api
            .list_projects(&ListProjectsOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert!(api.star_project(&Identifier::Numeric(1)).await.is_ok());

        api.clear_fail_on();
        assert!(api
            .list_projects(&ListProjectsOptions::default())
            .await
            .is_ok());
        assert_eq!(api.operations().len(), 3);
    }

    #[tokio::test]
    async fn resolves_seeded_users() {
        let api = MockGitlab::new().with_user("alice", 7).with_user("bob", 8);

        assert_eq!(api.user_id(&Identifier::parse("bob")).await.unwrap(), 8);
        assert_eq!(api.user_id(&Identifier::Numeric(3)).await.unwrap(), 3);
        assert!(matches!(
            api.user_id(&Identifier::parse("carol")).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let api = MockGitlab::new();
        let clone = api.clone();
        clone.archive_project(&Identifier::Numeric(2)).await.unwrap();
        assert_eq!(
            api.last_operation().map(|op| op.path),
            Some("/projects/2/archive".to_string())
        );
        api.clear_operations();
        assert!(clone.operations().is_empty());
    }
}
