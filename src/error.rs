use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Prompt composition error: {0}")]
    PromptComposition(String),
    #[error("Backend '{backend}' failed: {reason}")]
    BackendCall {
        backend: String,
        reason: BackendFailure,
    },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// Why a single backend attempt did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendFailure {
    Status(u16),
    Timeout(Duration),
    Transport(String),
    EmptyBody,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFailure::Status(code) => write!(f, "non-success status {}", code),
            BackendFailure::Timeout(limit) => {
                write!(f, "timed out after {}ms", limit.as_millis())
            }
            BackendFailure::Transport(msg) => write!(f, "transport error: {}", msg),
            BackendFailure::EmptyBody => write!(f, "empty response body"),
        }
    }
}

impl LogoError {
    pub fn backend(backend: impl Into<String>, reason: BackendFailure) -> Self {
        LogoError::BackendCall {
            backend: backend.into(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_names_backend_and_cause() {
        let err = LogoError::backend("flux", BackendFailure::Status(503));
        assert_eq!(err.to_string(), "Backend 'flux' failed: non-success status 503");

        let err = LogoError::backend("sdxl", BackendFailure::Timeout(Duration::from_millis(1500)));
        assert_eq!(err.to_string(), "Backend 'sdxl' failed: timed out after 1500ms");
    }
}
