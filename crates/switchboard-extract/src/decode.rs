//! Request decoding.
//!
//! [`RequestDecoder`] turns a buffered request into a typed input:
//!
//! 1. The body size is checked against [`DecoderConfig::max_body_size`].
//! 2. The query string is parsed regardless of method.
//! 3. The `Content-Type` is classified (see [`crate::media`]). Unsupported
//!    types fail the request, except on `GET` where the header is ignored.
//! 4. The body is parsed as form data (`POST`/`PUT`/`PATCH` only) or as a
//!    JSON object. An empty body leaves its channel empty.
//! 5. The channels are merged (see [`crate::merge`]) and handed to serde.

use crate::media::{classify, MediaKind};
use crate::{
    merge, ExtractionContext, ExtractionError, ExtractionSource, InputSchema, RawSources,
};
use http::Method;
use serde_json::Value;

/// Default maximum body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest accepted body, in bytes.
    pub max_body_size: usize,
    /// Parse object-shaped bodies as JSON even without a content type.
    pub sniff_untyped_json: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            sniff_untyped_json: false,
        }
    }
}

impl DecoderConfig {
    /// Sets the maximum body size.
    #[must_use]
    pub const fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Enables or disables JSON sniffing for untyped bodies.
    #[must_use]
    pub const fn with_sniff_untyped_json(mut self, sniff: bool) -> Self {
        self.sniff_untyped_json = sniff;
        self
    }
}

/// Decodes requests into typed inputs.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use switchboard_extract::{ExtractionContext, FieldKind, FieldSpec, InputSchema, RequestDecoder};
/// use http::Method;
///
/// #[derive(Debug, Default, Deserialize)]
/// #[serde(default)]
/// struct RepeatInput {
///     message: String,
///     overwrite: bool,
/// }
///
/// impl InputSchema for RepeatInput {
///     const FIELDS: &'static [FieldSpec] = &[
///         FieldSpec::new("message", FieldKind::String),
///         FieldSpec::new("overwrite", FieldKind::Bool).guarded(),
///     ];
/// }
///
/// let ctx = ExtractionContext::builder()
///     .method(Method::POST)
///     .uri("/?overwrite=true".parse().unwrap())
///     .header("content-type", "APPLICATION/json; charset=utf-8")
///     .body(r#"{"message": "bar"}"#)
///     .build();
///
/// let input: RepeatInput = RequestDecoder::default().decode(&ctx).unwrap();
/// assert_eq!(input.message, "bar");
/// assert!(input.overwrite);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestDecoder {
    config: DecoderConfig,
}

impl RequestDecoder {
    /// Creates a decoder with the given settings.
    #[must_use]
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Returns the decoder settings.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Collects the query, form and JSON channels of a request.
    ///
    /// # Errors
    ///
    /// Fails if the body is too large, the content type is unsupported on a
    /// non-`GET` request, or a body or query string is malformed.
    pub fn raw_sources(&self, ctx: &ExtractionContext) -> Result<RawSources, ExtractionError> {
        let body = ctx.body();
        if body.len() > self.config.max_body_size {
            return Err(ExtractionError::payload_too_large(
                self.config.max_body_size,
                body.len(),
            ));
        }

        let mut sources = RawSources::new();
        if let Some(query) = ctx.query_string() {
            sources = sources.with_query_string(query)?;
        }

        let media = match classify(ctx.content_type()) {
            Ok(media) => media,
            Err(_) if *ctx.method() == Method::GET => MediaKind::None,
            Err(e) => return Err(e),
        };

        if body.is_empty() {
            return Ok(sources);
        }

        match media {
            MediaKind::Form if ctx.accepts_form_body() => sources.with_form_body(body),
            MediaKind::Form => Ok(sources),
            MediaKind::Json => sources.with_json_body(body),
            MediaKind::None if self.config.sniff_untyped_json && looks_like_object(body) => {
                // An untyped body that fails to parse is ignored like any other untyped body.
                Ok(sources.clone().with_json_body(body).unwrap_or(sources))
            }
            MediaKind::None => Ok(sources),
        }
    }

    /// Decodes a request into a typed input.
    ///
    /// # Errors
    ///
    /// Fails under the conditions of [`RequestDecoder::raw_sources`], when a
    /// value cannot be coerced to its field kind, or when the merged fields
    /// do not deserialize into `T`.
    pub fn decode<T: InputSchema>(&self, ctx: &ExtractionContext) -> Result<T, ExtractionError> {
        let sources = self.raw_sources(ctx)?;
        let merged = merge(&sources, T::FIELDS)?;
        serde_json::from_value(Value::Object(merged)).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Input, e.to_string())
        })
    }
}

fn looks_like_object(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, FieldSpec, Scalar};
    use http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct RepeatInput {
        message: String,
        overwrite: bool,
        times: Option<i64>,
    }

    impl InputSchema for RepeatInput {
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::new("message", FieldKind::String),
            FieldSpec::new("overwrite", FieldKind::Bool).guarded(),
            FieldSpec::new("times", FieldKind::Integer),
        ];
    }

    fn request(method: Method, uri: &str, content_type: &str, body: &str) -> ExtractionContext {
        ExtractionContext::builder()
            .method(method)
            .uri(uri.parse().unwrap())
            .header("content-type", content_type)
            .body(body.to_string())
            .build()
    }

    fn decode(ctx: &ExtractionContext) -> Result<RepeatInput, ExtractionError> {
        RequestDecoder::default().decode(ctx)
    }

    #[test]
    fn test_get_without_body() {
        let input = decode(&request(Method::GET, "/", "", "")).unwrap();
        assert_eq!(input, RepeatInput::default());
    }

    #[test]
    fn test_get_query_message() {
        let input = decode(&request(Method::GET, "/?message=foobar", "", "")).unwrap();
        assert_eq!(input.message, "foobar");
    }

    #[test]
    fn test_json_body_any_case() {
        for content_type in ["application/json", "applicaTION/json; charset=utf-8"] {
            let ctx = request(Method::POST, "/", content_type, r#"{"message": "bar"}"#);
            assert_eq!(decode(&ctx).unwrap().message, "bar", "{content_type}");
        }
    }

    #[test]
    fn test_untyped_json_body_is_ignored() {
        let ctx = request(Method::POST, "/", "", r#"{"message": "bar"}"#);
        assert_eq!(decode(&ctx).unwrap().message, "");
    }

    #[test]
    fn test_untyped_json_body_sniffed_when_enabled() {
        let decoder = RequestDecoder::new(DecoderConfig::default().with_sniff_untyped_json(true));
        let ctx = request(Method::POST, "/", "", "  {\"message\": \"bar\"}");
        let input: RepeatInput = decoder.decode(&ctx).unwrap();
        assert_eq!(input.message, "bar");

        let ctx = request(Method::POST, "/", "", "{not json");
        let input: RepeatInput = decoder.decode(&ctx).unwrap();
        assert_eq!(input.message, "");
    }

    #[test]
    fn test_query_guard_survives_json_without_key() {
        let ctx = request(
            Method::POST,
            "/?overwrite=true",
            "application/json",
            r#"{"message": "bar"}"#,
        );
        let input = decode(&ctx).unwrap();
        assert_eq!(input.message, "bar");
        assert!(input.overwrite);
    }

    #[test]
    fn test_explicit_json_overrides_guard() {
        let ctx = request(
            Method::POST,
            "/?overwrite=true",
            "application/json",
            r#"{"message": "bar", "overwrite": false}"#,
        );
        assert!(!decode(&ctx).unwrap().overwrite);
    }

    #[test]
    fn test_form_post() {
        let ctx = request(
            Method::POST,
            "/",
            "application/x-www-form-urlencoded",
            "message=foobar&times=3",
        );
        let input = decode(&ctx).unwrap();
        assert_eq!(input.message, "foobar");
        assert_eq!(input.times, Some(3));
    }

    #[test]
    fn test_form_body_ignored_on_get() {
        let ctx = request(
            Method::GET,
            "/",
            "application/x-www-form-urlencoded",
            "message=foobar",
        );
        assert_eq!(decode(&ctx).unwrap().message, "");
    }

    #[test]
    fn test_form_body_on_put_and_patch() {
        for method in [Method::PUT, Method::PATCH] {
            let ctx = request(
                method.clone(),
                "/?message=from-query",
                "application/x-www-form-urlencoded",
                "message=foobar",
            );
            assert_eq!(decode(&ctx).unwrap().message, "foobar", "{method}");
        }
    }

    #[test]
    fn test_form_body_ignored_on_delete() {
        let ctx = request(
            Method::DELETE,
            "/?message=from-query",
            "application/x-www-form-urlencoded",
            "message=foobar",
        );
        assert_eq!(decode(&ctx).unwrap().message, "from-query");
    }

    #[test]
    fn test_json_body_on_get() {
        let ctx = request(Method::GET, "/", "application/json", r#"{"message": "bar"}"#);
        assert_eq!(decode(&ctx).unwrap().message, "bar");
    }

    #[test]
    fn test_empty_json_body_is_absent() {
        let ctx = request(Method::POST, "/?message=q", "application/json", "");
        assert_eq!(decode(&ctx).unwrap().message, "q");
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let ctx = request(Method::POST, "/", "application/json", r#"{"message": "#);
        let err = decode(&ctx).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.source(), ExtractionSource::Body);
    }

    #[test]
    fn test_json_type_mismatch_is_bad_request() {
        let ctx = request(Method::POST, "/", "application/json", r#"{"times": "three"}"#);
        let err = decode(&ctx).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.field(), Some("times"));
    }

    #[test]
    fn test_unsupported_content_type() {
        let ctx = request(Method::POST, "/", "text/plain", "hello");
        let err = decode(&ctx).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let ctx = request(Method::GET, "/?message=hi", "text/plain", "hello");
        assert_eq!(decode(&ctx).unwrap().message, "hi");
    }

    #[test]
    fn test_body_too_large() {
        let decoder = RequestDecoder::new(DecoderConfig::default().with_max_body_size(8));
        let ctx = request(Method::POST, "/", "application/json", r#"{"message": "too long"}"#);
        let err = decoder.decode::<RepeatInput>(&ctx).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_absent_option_field_is_none() {
        let ctx = request(Method::POST, "/", "application/json", r#"{"message": "x"}"#);
        assert_eq!(decode(&ctx).unwrap().times, None);
    }

    #[test]
    fn test_field_default_applies() {
        #[derive(Debug, Deserialize)]
        struct Greeting {
            greeting: String,
        }

        impl InputSchema for Greeting {
            const FIELDS: &'static [FieldSpec] = &[FieldSpec::new("greeting", FieldKind::String)
                .default_value(Scalar::Str("hello"))];
        }

        let ctx = request(Method::GET, "/", "", "");
        let input: Greeting = RequestDecoder::default().decode(&ctx).unwrap();
        assert_eq!(input.greeting, "hello");
    }

    #[test]
    fn test_missing_required_field_fails_as_input_error() {
        #[derive(Debug, Deserialize)]
        struct Required {
            #[allow(dead_code)]
            name: String,
        }

        impl InputSchema for Required {
            const FIELDS: &'static [FieldSpec] = &[FieldSpec::new("name", FieldKind::String)];
        }

        let ctx = request(Method::GET, "/", "", "");
        let err = RequestDecoder::default().decode::<Required>(&ctx).unwrap_err();
        assert_eq!(err.source(), ExtractionSource::Input);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
