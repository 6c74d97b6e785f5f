//! Structured logging for switchboard services.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and a
//! JSON or pretty fmt layer. The server shim emits one span per request
//! carrying the field names in [`fields`].
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::info!(operation = "Repeat", "service ready");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. "info", "switchboard_server=debug").
    pub level: String,

    /// Let a `RUST_LOG` directive replace `level`.
    pub respect_rust_log: bool,

    /// JSON lines instead of the pretty multi-line format.
    pub json_format: bool,

    /// Log span open and close events.
    pub span_events: bool,

    /// Include file and line of the callsite.
    pub file_line_info: bool,

    /// Include the target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at `debug`, with span events and callsites.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            respect_rust_log: true,
            json_format: false,
            span_events: true,
            file_line_info: true,
            include_target: true,
        }
    }

    /// JSON lines at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            respect_rust_log: true,
            json_format: true,
            span_events: false,
            file_line_info: false,
            include_target: true,
        }
    }

    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Ignores `RUST_LOG` and always uses the configured level.
    #[must_use]
    pub fn ignore_rust_log(mut self) -> Self {
        self.respect_rust_log = false;
        self
    }

    fn directive<'a>(&'a self, rust_log: Option<&'a str>) -> &'a str {
        match rust_log.map(str::trim) {
            Some(directive) if self.respect_rust_log && !directive.is_empty() => directive,
            _ => &self.level,
        }
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initializes the global logging subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = create_env_filter(config.directive(rust_log.as_deref()))?;

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(config.fmt_span())
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json_format {
        layer.json().boxed()
    } else {
        layer.pretty().boxed()
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns an error if the directive string is invalid.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Standard log field names.
pub mod fields {
    /// Request ID field name.
    pub const REQUEST_ID: &str = "request_id";

    /// Service operation field name.
    pub const OPERATION: &str = "operation";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// Error field name.
    pub const ERROR: &str = "error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_production() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert!(config.span_events);
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_with_level() {
        let config = LogConfig::production().with_level("switchboard_server=trace");
        assert_eq!(config.level, "switchboard_server=trace");
    }

    #[test]
    fn test_rust_log_replaces_level() {
        let config = LogConfig::production();
        assert_eq!(config.directive(Some("switchboard=trace")), "switchboard=trace");
        assert_eq!(config.directive(Some("  ")), "info");
        assert_eq!(config.directive(None), "info");

        let pinned = config.ignore_rust_log();
        assert_eq!(pinned.directive(Some("switchboard=trace")), "info");
    }

    #[test]
    fn test_span_events() {
        assert_eq!(LogConfig::production().fmt_span(), FmtSpan::NONE);
        assert_eq!(LogConfig::development().fmt_span(), FmtSpan::NEW | FmtSpan::CLOSE);
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let err = create_env_filter("switchboard=notalevel").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(fields::REQUEST_ID, "request_id");
        assert_eq!(fields::HTTP_STATUS, "http.status_code");
    }

    #[test]
    fn test_create_env_filter_valid() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("warn,switchboard_server=debug").is_ok());
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
