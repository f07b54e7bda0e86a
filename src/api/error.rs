//! API error types

use thiserror::Error;

/// Errors that can occur talking to the community API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, broken body stream
    #[error("network error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Server answered 2xx but the body was not what we expected
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// 401/403: missing, wrong, or insufficient credential
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
