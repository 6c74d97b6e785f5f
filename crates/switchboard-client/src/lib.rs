//! # Switchboard Client
//!
//! Calls single-method services hosted by `switchboard-server`.
//!
//! - [`ServiceClient`] - encodes the input as JSON, issues the request and
//!   decodes the output
//! - [`ClientConfig`] - base URL, timeout and user agent, loadable from
//!   TOML/JSON files and the environment
//! - [`ClientError`] - transport, cancellation, status and decode failures
//!
//! ## Example
//!
//! ```rust,ignore
//! use switchboard_client::{ClientConfig, ServiceClient};
//! use switchboard_core::ServiceContext;
//!
//! let client = ServiceClient::new(ClientConfig::new("http://localhost:8080"))?;
//! let output: RepeatOutput = client
//!     .call_default(&ServiceContext::new(), "/repeat", &RepeatInput::new("abc"))
//!     .await?;
//! ```

#![doc(html_root_url = "https://docs.rs/switchboard-client/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod config;
mod error;

pub use client::ServiceClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
