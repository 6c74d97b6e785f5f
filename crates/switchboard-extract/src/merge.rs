//! Field merging across query, form and JSON channels.
//!
//! For each [`FieldSpec`] the merge starts from the field's default, applies
//! the string tier (form value, else query value) and then the JSON body:
//!
//! | Field | JSON key absent / `null` | JSON zero value | JSON non-zero value |
//! |-------|--------------------------|-----------------|---------------------|
//! | plain | string tier kept | string tier kept | JSON wins |
//! | guarded | string tier kept | JSON wins | JSON wins |
//!
//! Values are coerced to the field's [`FieldKind`]. String channels use the
//! usual textual forms; JSON values must already have the declared type.
//! Fields that no channel supplies and that have no default are left out of
//! the merged object.

use crate::sources::json_type_name;
use crate::{ExtractionError, ExtractionSource, FieldKind, FieldSpec, RawSources};
use serde_json::{Map, Number, Value};

/// Merges the channels of one request into a JSON object keyed by logical
/// field names.
///
/// # Errors
///
/// Returns an error when a supplied value cannot be coerced to its field's
/// declared kind.
///
/// # Example
///
/// ```rust
/// use switchboard_extract::{merge, FieldKind, FieldSpec, RawSources};
/// use serde_json::json;
///
/// const FIELDS: &[FieldSpec] = &[
///     FieldSpec::new("message", FieldKind::String),
///     FieldSpec::new("overwrite", FieldKind::Bool).guarded(),
/// ];
///
/// let sources = RawSources::new()
///     .with_query_string("overwrite=true")
///     .unwrap()
///     .with_json_body(br#"{"message": "bar"}"#)
///     .unwrap();
///
/// let merged = merge(&sources, FIELDS).unwrap();
/// assert_eq!(merged["message"], json!("bar"));
/// assert_eq!(merged["overwrite"], json!(true));
/// ```
pub fn merge(
    sources: &RawSources,
    fields: &[FieldSpec],
) -> Result<Map<String, Value>, ExtractionError> {
    let mut merged = Map::with_capacity(fields.len());
    for field in fields {
        if let Some(value) = resolve(sources, field)? {
            merged.insert(field.name().to_string(), value);
        }
    }
    Ok(merged)
}

fn resolve(sources: &RawSources, field: &FieldSpec) -> Result<Option<Value>, ExtractionError> {
    let mut value = field.default().map(|scalar| scalar.to_json());

    let key = field.query_name();
    let text = sources
        .form(key)
        .map(|raw| (raw, ExtractionSource::Form))
        .or_else(|| sources.query(key).map(|raw| (raw, ExtractionSource::Query)));
    if let Some((raw, source)) = text {
        value = Some(coerce_str(field, raw, source)?);
    }

    if let Some(json) = sources.json(field.json_name()) {
        let json = check_json(field, json)?;
        if field.is_guarded() || !is_zero(&json) {
            value = Some(json);
        }
    }

    Ok(value)
}

/// Coerces a string-channel value to the field's kind.
///
/// # Errors
///
/// Returns an invalid type error naming `source` and the field's wire key.
pub fn coerce_str(
    field: &FieldSpec,
    raw: &str,
    source: ExtractionSource,
) -> Result<Value, ExtractionError> {
    let invalid = || {
        ExtractionError::invalid_type(
            source,
            field.query_name(),
            format!("expected {}, got '{raw}'", field.kind()),
        )
    };

    match field.kind() {
        FieldKind::String => Ok(Value::String(raw.to_string())),
        FieldKind::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(invalid),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid()),
        FieldKind::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
    }
}

/// Checks that a JSON value has the field's declared kind.
///
/// # Errors
///
/// Returns an invalid type error naming the field's JSON key.
pub fn check_json(field: &FieldSpec, value: &Value) -> Result<Value, ExtractionError> {
    let matches = match field.kind() {
        FieldKind::String => value.is_string(),
        FieldKind::Bool => value.is_boolean(),
        FieldKind::Integer => value.is_i64() || value.is_u64(),
        FieldKind::Float => value.is_number(),
    };

    if matches {
        Ok(value.clone())
    } else {
        Err(ExtractionError::invalid_type(
            ExtractionSource::Body,
            field.json_name(),
            format!("expected {}, got {}", field.kind(), json_type_name(value)),
        ))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(object) => object.is_empty(),
    }
}
