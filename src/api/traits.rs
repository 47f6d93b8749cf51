//! Trait abstraction for the users API to enable mocking in tests

use super::ApiError;
use crate::state::{SubmissionRecord, User};
use async_trait::async_trait;

/// Users API operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Whether at least one stored user has exactly this email
    async fn check_exists(&self, email: &str) -> Result<bool, ApiError>;

    /// Store a new user and return the created representation
    async fn create(&self, record: &SubmissionRecord) -> Result<User, ApiError>;
}
