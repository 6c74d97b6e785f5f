//! Response encoding.
//!
//! | Builder | Status | Body |
//! |---------|--------|------|
//! | [`JsonResponse`] | 200 unless overridden | the serialized output |
//! | [`ErrorResponse`] | from the error | `{"code", "message", "request_id"}` |
//!
//! Both set `Content-Type: application/json`. An output that fails to
//! serialize becomes a 500 error response instead of a panic.

use crate::ExtractionError;
use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;
use switchboard_core::{ErrorBody, ServiceError};

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Encodes a service output as a `200 OK` JSON response.
///
/// ```rust
/// use switchboard_extract::response::encode;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct RepeatOutput {
///     message: String,
/// }
///
/// let response = encode(&RepeatOutput { message: "abc".into() });
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.body().as_ref(), br#"{"message":"abc"}"#);
/// ```
#[must_use]
pub fn encode<T: Serialize>(output: &T) -> Response<Bytes> {
    JsonResponse::new(output).into_response()
}

/// JSON response builder.
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the data.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match serde_json::to_vec(&self.data) {
            Ok(body) => json_response(self.status, body),
            Err(e) => ErrorResponse::internal_error(format!("failed to encode output: {e}"))
                .into_response(),
        }
    }
}

/// Error response builder.
///
/// # Example
///
/// ```rust
/// use switchboard_extract::response::ErrorResponse;
/// use switchboard_core::ServiceError;
/// use http::StatusCode;
///
/// let response = ErrorResponse::from_service_error(&ServiceError::internal("boom"))
///     .with_request_id("req-1")
///     .into_response();
///
/// assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    status: StatusCode,
    body: ErrorBody,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::new(code, message),
        }
    }

    /// Creates a 500 Internal Server Error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Creates a 504 Gateway Timeout.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", message)
    }

    /// Creates the response for a decode failure.
    #[must_use]
    pub fn from_extraction_error(error: &ExtractionError) -> Self {
        Self {
            status: error.status_code(),
            body: error.to_body(None),
        }
    }

    /// Creates the response for a failed service call.
    #[must_use]
    pub fn from_service_error(error: &ServiceError) -> Self {
        Self {
            status: error.status_code(),
            body: error.to_body(None),
        }
    }

    /// Sets the request ID for error tracking.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.body.request_id = Some(request_id.into());
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error body.
    #[must_use]
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let body = serde_json::to_vec(&self.body).unwrap_or_else(|_| {
            br#"{"code":"INTERNAL_ERROR","message":"failed to encode error"}"#.to_vec()
        });
        json_response(self.status, body)
    }
}

impl From<&ExtractionError> for ErrorResponse {
    fn from(error: &ExtractionError) -> Self {
        Self::from_extraction_error(error)
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(error: &ServiceError) -> Self {
        Self::from_service_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractionSource;
    use serde::ser::Error as _;
    use serde_json::json;

    #[derive(Serialize)]
    struct RepeatOutput {
        message: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        overwrite: bool,
    }

    fn body_json(response: &Response<Bytes>) -> serde_json::Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_encode_output() {
        let response = encode(&RepeatOutput {
            message: "bar".into(),
            overwrite: true,
        });

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_json(&response), json!({"message": "bar", "overwrite": true}));
    }

    #[test]
    fn test_encode_respects_serde_attributes() {
        let response = encode(&RepeatOutput {
            message: "bar".into(),
            overwrite: false,
        });
        assert_eq!(body_json(&response), json!({"message": "bar"}));
    }

    #[test]
    fn test_json_response_custom_status() {
        let response = JsonResponse::new(json!({"ok": true}))
            .with_status(StatusCode::ACCEPTED)
            .into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_unserializable_output_is_internal_error() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(S::Error::custom("broken"))
            }
        }

        let response = encode(&Broken);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(&response)["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn test_extraction_error_response() {
        let err = ExtractionError::deserialization_failed(ExtractionSource::Body, "bad json");
        let response = ErrorResponse::from(&err).with_request_id("req-1").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(&response);
        assert_eq!(body["code"], "DESERIALIZATION_FAILED");
        assert_eq!(body["request_id"], "req-1");
        assert!(body["message"].as_str().unwrap().contains("bad json"));
    }

    #[test]
    fn test_service_error_response() {
        let err = ServiceError::internal("database unreachable");
        let response = ErrorResponse::from(&err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(&response);
        assert_eq!(body["message"], "database unreachable");
        assert!(body.get("request_id").is_none());
    }

    #[test]
    fn test_timeout_response() {
        let response = ErrorResponse::timeout("request timed out").into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(&response)["code"], "TIMEOUT");
    }
}
