//! Request metrics.
//!
//! Metrics go through the [`metrics`] facade. Nothing is recorded until the
//! host application installs a recorder (for example a Prometheus exporter).
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `switchboard_requests_total` | Counter | `operation`, `status` | Handled requests |
//! | `switchboard_request_duration_seconds` | Histogram | `operation` | Handling latency |
//! | `switchboard_decode_failures_total` | Counter | `operation`, `source` | Rejected inputs |
//! | `switchboard_in_flight_requests` | Gauge | - | Requests being handled |

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Counter of handled requests.
pub const REQUESTS_TOTAL: &str = "switchboard_requests_total";
/// Histogram of handling latency.
pub const REQUEST_DURATION_SECONDS: &str = "switchboard_request_duration_seconds";
/// Counter of inputs rejected by the decoder.
pub const DECODE_FAILURES_TOTAL: &str = "switchboard_decode_failures_total";
/// Gauge of requests currently being handled.
pub const IN_FLIGHT_REQUESTS: &str = "switchboard_in_flight_requests";

/// Registers descriptions for all standard metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of requests handled");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Request handling duration in seconds"
    );
    describe_counter!(
        DECODE_FAILURES_TOTAL,
        "Total number of requests rejected while decoding input"
    );
    describe_gauge!(IN_FLIGHT_REQUESTS, "Number of requests currently being handled");
}

/// Records a completed request.
///
/// # Arguments
///
/// * `operation` - The service operation name
/// * `status_code` - HTTP status code of the response
/// * `duration` - Time spent handling the request
pub fn record_request(operation: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION_SECONDS, "operation" => operation.to_string())
        .record(duration.as_secs_f64());
}

/// Records a request rejected by the decoder.
///
/// `source` is the input channel that failed (e.g. "query", "body").
pub fn record_decode_failure(operation: &str, source: &str) {
    counter!(
        DECODE_FAILURES_TOTAL,
        "operation" => operation.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
}

/// Guard that tracks one in-flight request until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}
