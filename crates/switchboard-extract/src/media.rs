//! Content-Type classification.
//!
//! Classifies a declared `Content-Type` into the decode strategy the request
//! decoder should use. Matching ignores ASCII case and anything after the
//! first `;`, so `APPLICATION/json; charset=utf-8` is JSON.

use crate::{ExtractionError, ExtractionSource};

/// Decode strategy selected from a request's `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
    /// No (or an empty) content type; the body is not read
    None,
}

/// Returns the media type portion of a content type, without parameters.
///
/// ```rust
/// use switchboard_extract::media::essence;
///
/// assert_eq!(essence(" text/html ; charset=utf-8"), "text/html");
/// assert_eq!(essence(""), "");
/// ```
#[must_use]
pub fn essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// Classifies a content type.
///
/// Absent or blank values classify as [`MediaKind::None`].
///
/// # Errors
///
/// Returns an unsupported media type error for any other non-empty value
/// that is neither JSON nor URL-encoded form data.
///
/// ```rust
/// use switchboard_extract::media::{classify, MediaKind};
///
/// assert_eq!(classify(Some("applicaTION/json; charset=utf-8")).unwrap(), MediaKind::Json);
/// assert_eq!(classify(Some("")).unwrap(), MediaKind::None);
/// assert_eq!(classify(None).unwrap(), MediaKind::None);
/// assert!(classify(Some("text/plain")).is_err());
/// ```
pub fn classify(content_type: Option<&str>) -> Result<MediaKind, ExtractionError> {
    let Some(media_type) = content_type.map(essence).filter(|m| !m.is_empty()) else {
        return Ok(MediaKind::None);
    };

    if media_type.eq_ignore_ascii_case(mime::APPLICATION_JSON.essence_str()) {
        Ok(MediaKind::Json)
    } else if media_type.eq_ignore_ascii_case(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()) {
        Ok(MediaKind::Form)
    } else {
        Err(ExtractionError::unsupported_media_type(
            "application/json or application/x-www-form-urlencoded",
            content_type,
        ))
    }
}
