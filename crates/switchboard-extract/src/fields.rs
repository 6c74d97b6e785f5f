//! Input field definitions.
//!
//! An input type lists its fields as a `const` slice of [`FieldSpec`]s. Each
//! spec names the logical key (the serde name of the struct field), the
//! declared scalar type, the wire key used on each channel and whether the
//! field is guarded against being reset by a JSON body that omits it.
//!
//! # Example
//!
//! ```rust
//! use serde::Deserialize;
//! use switchboard_extract::{FieldKind, FieldSpec, InputSchema};
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct RepeatInput {
//!     message: String,
//!     #[serde(rename = "overwriteMe")]
//!     overwrite: bool,
//!     times: Option<i64>,
//! }
//!
//! impl InputSchema for RepeatInput {
//!     const FIELDS: &'static [FieldSpec] = &[
//!         FieldSpec::new("message", FieldKind::String),
//!         FieldSpec::new("overwriteMe", FieldKind::Bool)
//!             .query_key("overwrite")
//!             .guarded(),
//!         FieldSpec::new("times", FieldKind::Integer),
//!     ];
//! }
//!
//! assert_eq!(RepeatInput::FIELDS[1].query_name(), "overwrite");
//! assert_eq!(RepeatInput::FIELDS[1].json_name(), "overwriteMe");
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Declared scalar type of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// `true` / `false`
    Bool,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "number"),
        }
    }
}

/// A `const`-constructible scalar used as a field default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// String default
    Str(&'static str),
    /// Boolean default
    Bool(bool),
    /// Integer default
    Int(i64),
    /// Float default
    Float(f64),
}

impl Scalar {
    /// Converts the scalar into a JSON value.
    #[must_use]
    pub fn to_json(self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.to_string()),
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::from(i),
            Self::Float(f) => Value::from(f),
        }
    }
}

/// Definition of one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    query_key: Option<&'static str>,
    json_key: Option<&'static str>,
    default: Option<Scalar>,
    guarded: bool,
}

impl FieldSpec {
    /// Creates a field whose wire keys equal its logical name.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            query_key: None,
            json_key: None,
            default: None,
            guarded: false,
        }
    }

    /// Sets the key used on the query and form channels.
    #[must_use]
    pub const fn query_key(mut self, key: &'static str) -> Self {
        self.query_key = Some(key);
        self
    }

    /// Sets the key used in JSON bodies.
    #[must_use]
    pub const fn json_key(mut self, key: &'static str) -> Self {
        self.json_key = Some(key);
        self
    }

    /// Sets the value the merge starts from.
    ///
    /// Without a default, a field supplied by no channel is left out of the
    /// merged input entirely.
    #[must_use]
    pub const fn default_value(mut self, value: Scalar) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the field as overwrite-guarded.
    ///
    /// A guarded field only takes its JSON value when the body names the key
    /// explicitly, including when it sets the zero value.
    #[must_use]
    pub const fn guarded(mut self) -> Self {
        self.guarded = true;
        self
    }

    /// Returns the logical name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the key used on the query and form channels.
    #[must_use]
    pub const fn query_name(&self) -> &'static str {
        match self.query_key {
            Some(key) => key,
            None => self.name,
        }
    }

    /// Returns the key used in JSON bodies.
    #[must_use]
    pub const fn json_name(&self) -> &'static str {
        match self.json_key {
            Some(key) => key,
            None => self.name,
        }
    }

    /// Returns the default value, if any.
    #[must_use]
    pub const fn default(&self) -> Option<Scalar> {
        self.default
    }

    /// Returns `true` if the field is overwrite-guarded.
    #[must_use]
    pub const fn is_guarded(&self) -> bool {
        self.guarded
    }
}

/// An input type that can be decoded from query, form and JSON channels.
///
/// The merged fields are keyed by [`FieldSpec::name`] and handed to serde, so
/// field names must match the type's serde names, and fields that may be
/// absent need `#[serde(default)]` or an `Option` type.
pub trait InputSchema: DeserializeOwned + Send + 'static {
    /// Field definitions, in merge order.
    const FIELDS: &'static [FieldSpec];
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: FieldSpec = FieldSpec::new("message", FieldKind::String);
    const MAPPED: FieldSpec = FieldSpec::new("overwriteMe", FieldKind::Bool)
        .query_key("overwrite")
        .json_key("overwrite_me")
        .default_value(Scalar::Bool(false))
        .guarded();

    #[test]
    fn test_wire_names_default_to_logical_name() {
        assert_eq!(PLAIN.query_name(), "message");
        assert_eq!(PLAIN.json_name(), "message");
        assert!(!PLAIN.is_guarded());
        assert_eq!(PLAIN.default(), None);
    }

    #[test]
    fn test_explicit_mapping() {
        assert_eq!(MAPPED.name(), "overwriteMe");
        assert_eq!(MAPPED.query_name(), "overwrite");
        assert_eq!(MAPPED.json_name(), "overwrite_me");
        assert_eq!(MAPPED.kind(), FieldKind::Bool);
        assert_eq!(MAPPED.default(), Some(Scalar::Bool(false)));
        assert!(MAPPED.is_guarded());
    }

    #[test]
    fn test_scalar_to_json() {
        assert_eq!(Scalar::Str("x").to_json(), Value::from("x"));
        assert_eq!(Scalar::Bool(true).to_json(), Value::Bool(true));
        assert_eq!(Scalar::Int(-3).to_json(), Value::from(-3));
        assert_eq!(Scalar::Float(1.5).to_json(), Value::from(1.5));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FieldKind::Bool.to_string(), "boolean");
        assert_eq!(FieldKind::Float.to_string(), "number");
    }
}
