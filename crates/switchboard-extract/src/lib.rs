//! # Switchboard Extract
//!
//! Request decoding and response encoding for switchboard service shims.
//!
//! A request can carry input on three channels. This crate reconciles them
//! into one typed input value:
//!
//! | Channel | Carried by | Value types |
//! |---------|------------|-------------|
//! | Query | URL query string, any method | strings, coerced per field |
//! | Form | `application/x-www-form-urlencoded` body on `POST`/`PUT`/`PATCH` | strings, coerced per field |
//! | JSON | `application/json` body, any method | typed JSON scalars |
//!
//! Form and query form one string tier (form wins when both carry a key).
//! The JSON channel is applied on top. A JSON zero value does not override a
//! plain field, while a field marked [`FieldSpec::guarded`] takes any value
//! the JSON body names explicitly and keeps its string-tier value otherwise.
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use switchboard_extract::{
//!     response, ExtractionContext, FieldKind, FieldSpec, InputSchema, RequestDecoder,
//! };
//! use http::Method;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct RepeatInput {
//!     message: String,
//!     overwrite: bool,
//! }
//!
//! impl InputSchema for RepeatInput {
//!     const FIELDS: &'static [FieldSpec] = &[
//!         FieldSpec::new("message", FieldKind::String),
//!         FieldSpec::new("overwrite", FieldKind::Bool).guarded(),
//!     ];
//! }
//!
//! #[derive(Serialize)]
//! struct RepeatOutput {
//!     message: String,
//! }
//!
//! let ctx = ExtractionContext::builder()
//!     .method(Method::GET)
//!     .uri("/?message=foobar".parse().unwrap())
//!     .build();
//!
//! let input: RepeatInput = RequestDecoder::default().decode(&ctx).unwrap();
//! let response = response::encode(&RepeatOutput { message: input.message });
//! assert_eq!(response.body().as_ref(), br#"{"message":"foobar"}"#);
//! ```
//!
//! ## Error Handling
//!
//! Every decode failure is an [`ExtractionError`] carrying the channel that
//! was being read and a 400, 413 or 415 status.

#![doc(html_root_url = "https://docs.rs/switchboard-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod decode;
mod error;
mod fields;
pub mod media;
mod merge;
pub mod response;
mod sources;

pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use decode::{DecoderConfig, RequestDecoder, DEFAULT_MAX_BODY_SIZE};
pub use error::{ExtractionError, ExtractionSource};
pub use fields::{FieldKind, FieldSpec, InputSchema, Scalar};
pub use media::MediaKind;
pub use merge::{check_json, coerce_str, merge};
pub use response::{encode, ErrorResponse, JsonResponse};
pub use sources::RawSources;
