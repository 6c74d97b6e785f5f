//! Per-call context types.
//!
//! A [`ServiceContext`] travels with every service invocation, on the server
//! side from the decoded request into the bound service and on the client
//! side into [`call`](https://docs.rs/switchboard-client) so that in-flight
//! requests can be cancelled.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

/// A unique identifier for each call, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps identifiers sortable in logs.
///
/// # Example
///
/// ```
/// use switchboard_core::RequestId;
///
/// let id = RequestId::new();
/// let parsed = RequestId::parse(&id.to_string()).unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses a request ID from its hyphenated string form.
    ///
    /// Returns `None` when the value is not a UUID.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Cancellation-aware context handed to every service call.
///
/// Cloning a context is cheap and every clone shares the same cancellation
/// state: cancelling any clone cancels them all.
///
/// # Example
///
/// ```
/// use switchboard_core::ServiceContext;
///
/// let ctx = ServiceContext::new().with_operation("Repeat");
/// let observer = ctx.clone();
///
/// ctx.cancel();
/// assert!(observer.is_cancelled());
/// assert_eq!(observer.operation(), Some("Repeat"));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceContext {
    request_id: RequestId,
    operation: Option<String>,
    cancellation: CancellationToken,
    started_at: Instant,
}

impl ServiceContext {
    /// Creates a context with a fresh request ID and no cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context carrying the given request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            operation: None,
            cancellation: CancellationToken::new(),
            started_at: Instant::now(),
        }
    }

    /// Creates a context that is cancelled whenever `parent` is cancelled.
    ///
    /// Cancelling the returned context does not cancel the parent.
    #[must_use]
    pub fn child_of(parent: &Self) -> Self {
        Self {
            request_id: parent.request_id,
            operation: parent.operation.clone(),
            cancellation: parent.cancellation.child_token(),
            started_at: Instant::now(),
        }
    }

    /// Sets the operation name (e.g. `"Repeat"`).
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the operation name, if one was set.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Cancels this context and every clone or child of it.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Returns `true` once the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Returns a future that resolves when the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancellation.cancelled()
    }

    /// Returns the time elapsed since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for ServiceContext {
    fn default() -> Self {
        Self::new()
    }
}
