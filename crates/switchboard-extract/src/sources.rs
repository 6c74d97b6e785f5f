//! Per-request raw input channels.
//!
//! [`RawSources`] holds the three untyped channels a request can carry: query
//! parameters, URL-encoded form fields and a JSON object body. Channels that
//! the request does not carry are simply empty.

use crate::{ExtractionError, ExtractionSource};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The untyped channels of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSources {
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    json: Option<Map<String, Value>>,
}

impl RawSources {
    /// Creates an empty set of channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string into the query channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the query string cannot be URL-decoded.
    pub fn with_query_string(mut self, query: &str) -> Result<Self, ExtractionError> {
        self.query = parse_pairs(query, ExtractionSource::Query)?;
        Ok(self)
    }

    /// Parses a URL-encoded body into the form channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not UTF-8 or cannot be URL-decoded.
    pub fn with_form_body(mut self, body: &[u8]) -> Result<Self, ExtractionError> {
        let body = std::str::from_utf8(body).map_err(|e| {
            ExtractionError::deserialization_failed(
                ExtractionSource::Form,
                format!("invalid UTF-8: {e}"),
            )
        })?;
        self.form = parse_pairs(body, ExtractionSource::Form)?;
        Ok(self)
    }

    /// Parses a JSON body into the JSON channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON or is not an object.
    pub fn with_json_body(mut self, body: &[u8]) -> Result<Self, ExtractionError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
        })?;

        match value {
            Value::Object(object) => {
                self.json = Some(object);
                Ok(self)
            }
            other => Err(ExtractionError::deserialization_failed(
                ExtractionSource::Body,
                format!("expected a JSON object, got {}", json_type_name(&other)),
            )),
        }
    }

    /// Inserts a query parameter, keeping an existing value for the key.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        insert_first(&mut self.query, key.into(), value.into());
        self
    }

    /// Inserts a form field, keeping an existing value for the key.
    #[must_use]
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        insert_first(&mut self.form, key.into(), value.into());
        self
    }

    /// Replaces the JSON channel with an object.
    #[must_use]
    pub fn json_object(mut self, object: Map<String, Value>) -> Self {
        self.json = Some(object);
        self
    }

    /// Returns the query value for a key.
    ///
    /// An empty value is reported as absent.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        supplied(&self.query, key)
    }

    /// Returns the form value for a key.
    ///
    /// An empty value is reported as absent.
    #[must_use]
    pub fn form(&self, key: &str) -> Option<&str> {
        supplied(&self.form, key)
    }

    /// Returns the JSON value for a key.
    ///
    /// A key set to `null` is reported as absent.
    #[must_use]
    pub fn json(&self, key: &str) -> Option<&Value> {
        self.json
            .as_ref()
            .and_then(|object| object.get(key))
            .filter(|value| !value.is_null())
    }

    /// Returns `true` if a JSON body was decoded.
    #[must_use]
    pub fn has_json(&self) -> bool {
        self.json.is_some()
    }
}

/// Returns the JSON type name of a value for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_pairs(
    input: &str,
    source: ExtractionSource,
) -> Result<HashMap<String, String>, ExtractionError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)
        .map_err(|e| ExtractionError::deserialization_failed(source, e.to_string()))?;

    let mut map = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        insert_first(&mut map, key, value);
    }
    Ok(map)
}

// The first occurrence of a key wins, even when its value is empty.
fn insert_first(map: &mut HashMap<String, String>, key: String, value: String) {
    map.entry(key).or_insert(value);
}

fn supplied<'a>(map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    map.get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}
