use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, CopyError>;

/// Rejection of a request before any backend work is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("image count must be 1 or 2, got {0}")]
    ImageCountOutOfRange(u32),
    #[error("unrecognized {field}: '{value}'")]
    UnknownOption { field: &'static str, value: String },
}

/// Classification of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    Timeout,
    Auth,
    MalformedResponse,
    EmptyResponse,
    Unavailable,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Auth => "auth",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Other => "other",
        }
    }

    /// Auth failures will not go away by asking again; everything else might.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::Auth)
    }

    /// Maps an HTTP status code from a generation service to a kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ErrorKind::Auth,
            408 | 504 => ErrorKind::Timeout,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::Unavailable,
            _ => ErrorKind::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed call to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("no response within {}s", after.as_secs_f32()),
        )
    }

    pub fn empty(what: &str) -> Self {
        Self::new(ErrorKind::EmptyResponse, format!("backend returned no {}", what))
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            ErrorKind::Timeout
        } else if let Some(status) = e.status() {
            ErrorKind::from_status(status.as_u16())
        } else if e.is_decode() {
            ErrorKind::MalformedResponse
        } else if e.is_connect() {
            ErrorKind::Unavailable
        } else {
            ErrorKind::Other
        };
        BackendError::new(kind, e.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Unavailable);
        assert_eq!(ErrorKind::from_status(504), ErrorKind::Timeout);
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Other);
    }

    #[test]
    fn test_only_auth_is_unrecoverable() {
        assert!(!ErrorKind::Auth.is_recoverable());
        assert!(ErrorKind::RateLimited.is_recoverable());
        assert!(ErrorKind::Timeout.is_recoverable());
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::timeout(Duration::from_secs(30));
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.to_string(), "timeout: no response within 30s");
    }

    #[test]
    fn test_validation_error_wraps_into_copy_error() {
        let err: CopyError = ValidationError::ImageCountOutOfRange(3).into();
        assert_eq!(err.to_string(), "image count must be 1 or 2, got 3");
    }
}
