//! HTTP client for the users API
//!
//! Two single-shot requests against a json-server style backend:
//! `GET /users?email=...` for the uniqueness check and `POST /users` to
//! create a record. No retries and no caching.

use super::{ApiError, UsersApi};
use crate::state::{SubmissionRecord, User};
use async_trait::async_trait;
use std::time::Duration;

/// Default users API address
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the users API
#[derive(Debug, Clone)]
pub struct UsersClient {
    /// Base address without a trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl UsersClient {
    /// Create a new client for `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection endpoint for users
    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let url = self.users_url();
        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl UsersApi for UsersClient {
    async fn check_exists(&self, email: &str) -> Result<bool, ApiError> {
        let url = self.users_url();
        let request = self.client.get(&url).query(&[("email", email)]);
        let matches: Vec<serde_json::Value> = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode { url, source: e })?;

        tracing::debug!(email, matches = matches.len(), "email lookup finished");
        Ok(!matches.is_empty())
    }

    async fn create(&self, record: &SubmissionRecord) -> Result<User, ApiError> {
        let url = self.users_url();
        let request = self.client.post(&url).json(record);
        let user: User = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode { url, source: e })?;

        tracing::debug!(id = %user.id, "user created");
        Ok(user)
    }
}
