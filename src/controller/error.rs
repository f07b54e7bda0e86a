//! Errors surfaced to the user by controller operations

use crate::api::ApiError;
use thiserror::Error;

/// Every failure is local: the caller shows a notice and stays interactive.
/// Nothing is retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// A privileged action was attempted with no session
    #[error("Sign in required")]
    AuthRequired,

    /// Transport failure or non-2xx response
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Empty content, blank username, unknown entity
    #[error("{0}")]
    ValidationFailed(String),

    /// Client-side affordance check (the server enforces the same rule)
    #[error("Not allowed: {0}")]
    Forbidden(String),
}

impl From<ApiError> for ActionError {
    fn from(e: ApiError) -> Self {
        ActionError::RequestFailed(e.to_string())
    }
}
