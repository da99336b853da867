//! api::preview
//!
//! An API implementation that renders requests instead of sending them.
//!
//! The response of every call is a document describing the request that
//! would go over the wire:
//!
//! ```json
//! {
//!   "method": "POST",
//!   "url": "https://gitlab.com/api/v4/projects/group%2Fproject/share",
//!   "body": { "group_id": 3, "group_access": 30 }
//! }
//! ```
//!
//! Parameters appear under `query` for GET and DELETE, under `body`
//! otherwise, and are left out entirely when there are none.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::request::ApiRequest;
use super::traits::{ApiError, GitlabApi};
use crate::core::config::Config;

#[derive(Debug, Clone)]
pub struct PreviewApi {
    base: String,
}

impl PreviewApi {
    /// Preview against the API base of `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_base(config.api_base())
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Describe a request as JSON.
    pub fn render(&self, request: &ApiRequest) -> Value {
        let mut document = Map::new();
        document.insert("method".to_string(), Value::String(request.method.to_string()));
        document.insert(
            "url".to_string(),
            Value::String(format!("{}{}", self.base, request.path)),
        );
        if !request.params.is_empty() {
            let key = if request.method.uses_query() {
                "query"
            } else {
                "body"
            };
            document.insert(key.to_string(), Value::Object(request.params.clone()));
        }
        Value::Object(document)
    }
}

#[async_trait]
impl GitlabApi for PreviewApi {
    fn name(&self) -> &'static str {
        "preview"
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        tracing::debug!(operation = ?request.operation, path = %request.path, "rendering request");
        Ok(self.render(&request))
    }

    async fn resolve_user(&self, username: &str) -> Result<i64, ApiError> {
        Err(ApiError::Unsupported(format!(
            "cannot look up user '{}' without a server, pass the numeric user id",
            username
        )))
    }
}
