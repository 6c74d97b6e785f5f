//! # Switchboard
//!
//! **Generic HTTP binding for single-method services**
//!
//! A service is one async method taking a typed input and returning a typed
//! output. Switchboard binds it to HTTP on both ends:
//!
//! - **Server shim** – decodes the input from the query string, a form body
//!   and a JSON body, invokes the service and encodes the output as JSON
//! - **Client shim** – sends the input as JSON and decodes the output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use serde::Deserialize;
//! use switchboard::prelude::*;
//!
//! #[derive(Default, Deserialize)]
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
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&LogConfig::development())?;
//!
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:8080").build();
//!     let handler = ServiceHandler::new("Repeat", RepeatService).with_config(&config);
//!
//!     Server::bind(config, handler).await?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → Content Negotiator → Request Decoder (Field Merger) → Service
//!                                                                    ↓
//! Response ←──────────────────────────── Response Encoder ←──────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/switchboard/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use switchboard_core as core;

// Re-export decoding and encoding
pub use switchboard_extract as extract;

// Re-export server shim
pub use switchboard_server as server;

// Re-export client shim
pub use switchboard_client as client;

// Re-export logging and metrics
pub use switchboard_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    pub use switchboard_core::{
        ErrorBody, FnService, RequestId, Service, ServiceContext, ServiceError, ServiceResult,
    };

    // Field definitions and decoding
    pub use switchboard_extract::{
        DecoderConfig, ExtractionError, FieldKind, FieldSpec, InputSchema, RequestDecoder, Scalar,
    };

    // Response builders
    pub use switchboard_extract::response::{ErrorResponse, JsonResponse};

    pub use switchboard_server::{Server, ServerConfig, ServiceHandler, ShutdownSignal};

    pub use switchboard_client::{ClientConfig, ClientError, ServiceClient};

    pub use switchboard_telemetry::{init_logging, LogConfig};
}
