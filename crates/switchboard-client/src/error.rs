//! Error types for the client shim.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a [`ServiceClient`](crate::ServiceClient) call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// The input could not be serialized as JSON.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call was cancelled through its context.
    #[error("call cancelled")]
    Cancelled,

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Error code from the error body, empty when the body had none.
        code: String,
        /// Message from the error body, or the raw body text.
        message: String,
    },

    /// A 2xx response body was not the expected JSON.
    #[error("failed to decode response ({status}): {source}")]
    Decode {
        /// Response status.
        status: StatusCode,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the response status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns `true` for errors raised before or while reaching the server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            code: "DESERIALIZATION_ERROR".to_string(),
            message: "bad json".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 400 Bad Request: bad json");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_cancelled_has_no_status() {
        assert_eq!(ClientError::Cancelled.status(), None);
        assert_eq!(ClientError::config("x").status(), None);
    }
}
