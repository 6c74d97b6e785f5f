//! Observability for switchboard services.
//!
//! - **Logging**: `tracing-subscriber` setup with JSON or pretty output
//! - **Metrics**: request counters and latency histograms through the
//!   `metrics` facade
//!
//! The crate installs no exporter. Host applications that want metrics
//! install a `metrics` recorder of their choice.
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! switchboard_telemetry::metrics::describe_metrics();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{record_request, InFlightGuard};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
