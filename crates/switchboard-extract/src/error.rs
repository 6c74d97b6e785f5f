//! Decode error types.
//!
//! Every failure while turning a request into a typed input is an
//! [`ExtractionError`]. It records which channel was being read and maps to a
//! 400-class HTTP status.

use http::StatusCode;
use std::fmt;
use switchboard_core::ErrorBody;

/// Source of extraction (which input channel was being read).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// URL query string
    Query,
    /// URL-encoded form body
    Form,
    /// JSON request body
    Body,
    /// Content-Type header
    ContentType,
    /// The merged input being converted to its typed form
    Input,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Form => write!(f, "form"),
            Self::Body => write!(f, "body"),
            Self::ContentType => write!(f, "content-type"),
            Self::Input => write!(f, "input"),
        }
    }
}

/// Error that occurs while decoding a request.
///
/// # Example
///
/// ```rust
/// use switchboard_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::invalid_type(ExtractionSource::Query, "overwrite", "expected a boolean");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.source(), ExtractionSource::Query);
/// assert!(err.to_string().contains("overwrite"));
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    field: Option<String>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Value cannot be coerced to the declared field type
    InvalidType,
    /// Channel payload is malformed
    DeserializationFailed,
    /// Body is too large
    PayloadTooLarge,
    /// Content-Type is unsupported
    UnsupportedMediaType,
}

impl ExtractionError {
    /// Creates an error for a value that cannot be coerced to its field type.
    #[must_use]
    pub fn invalid_type(
        source: ExtractionSource,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::InvalidType,
            message: format!("invalid {source} parameter '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for a malformed payload.
    #[must_use]
    pub fn deserialization_failed(source: ExtractionSource, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::DeserializationFailed,
            message: format!("failed to deserialize {source}: {error}"),
            field: None,
        }
    }

    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!(
                "payload too large: max {max_size} bytes, got {actual_size} bytes"
            ),
            field: None,
        }
    }

    /// Creates an error for a streamed body that crossed the size limit
    /// before its full length was known.
    #[must_use]
    pub fn body_limit_exceeded(max_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes"),
            field: None,
        }
    }

    /// Creates an error for an unsupported content type.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual_str = actual.unwrap_or("none");
        Self {
            extraction_source: ExtractionSource::ContentType,
            kind: ExtractionErrorKind::UnsupportedMediaType,
            message: format!(
                "unsupported content type: expected {expected}, got '{actual_str}'"
            ),
            field: None,
        }
    }

    /// Returns the channel that was being read.
    #[must_use]
    pub fn source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::InvalidType | ExtractionErrorKind::DeserializationFailed => {
                StatusCode::BAD_REQUEST
            }
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the error code used in error bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::InvalidType => "INVALID_PARAMETER",
            ExtractionErrorKind::DeserializationFailed => "DESERIALIZATION_FAILED",
            ExtractionErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ExtractionErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        }
    }

    /// Converts this error into a serializable error body.
    #[must_use]
    pub fn to_body(&self, request_id: Option<&str>) -> ErrorBody {
        ErrorBody {
            code: self.error_code().to_string(),
            message: self.message.clone(),
            request_id: request_id.map(ToString::to_string),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_error() {
        let err = ExtractionError::invalid_type(ExtractionSource::Body, "count", "expected integer");

        assert_eq!(err.source(), ExtractionSource::Body);
        assert_eq!(err.field(), Some("count"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("count"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_deserialization_failed_error() {
        let err = ExtractionError::deserialization_failed(
            ExtractionSource::Body,
            "expected value at line 1 column 2",
        );

        assert_eq!(err.field(), None);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
        assert!(err.to_string().starts_with("failed to deserialize body"));
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = ExtractionError::payload_too_large(1024, 2048);

        assert_eq!(err.source(), ExtractionSource::Body);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_unsupported_media_type_error() {
        let err = ExtractionError::unsupported_media_type("application/json", Some("text/plain"));

        assert_eq!(err.source(), ExtractionSource::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA_TYPE");
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn test_all_errors_are_client_errors() {
        let errors = [
            ExtractionError::invalid_type(ExtractionSource::Query, "a", "b"),
            ExtractionError::deserialization_failed(ExtractionSource::Form, "x"),
            ExtractionError::payload_too_large(1, 2),
            ExtractionError::body_limit_exceeded(1),
            ExtractionError::unsupported_media_type("application/json", None),
        ];
        for err in errors {
            assert!(err.status_code().is_client_error(), "{err}");
        }
    }

    #[test]
    fn test_to_body() {
        let err = ExtractionError::deserialization_failed(ExtractionSource::Body, "bad json");
        let body = err.to_body(Some("req-9"));
        assert_eq!(body.code, "DESERIALIZATION_FAILED");
        assert_eq!(body.message, err.message());
        assert_eq!(body.request_id.as_deref(), Some("req-9"));
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Form.to_string(), "form");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::ContentType.to_string(), "content-type");
        assert_eq!(ExtractionSource::Input.to_string(), "input");
    }
}
