//! # Switchboard Core
//!
//! Core types shared by the switchboard server and client shims:
//!
//! - [`Service`] - The single-method service capability a shim binds to HTTP
//! - [`FnService`] - Closure-backed [`Service`]
//! - [`ServiceContext`] - Per-call context with a request ID and cancellation
//! - [`RequestId`] - UUID v7 request identifier
//! - [`ServiceError`] - Failure type returned by services
//! - [`ErrorBody`] - JSON error body carried by failed responses

#![doc(html_root_url = "https://docs.rs/switchboard-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod service;

pub use context::{RequestId, ServiceContext};
pub use error::{ErrorBody, ErrorCategory, ServiceError, ServiceResult};
pub use service::{FnService, Service};
