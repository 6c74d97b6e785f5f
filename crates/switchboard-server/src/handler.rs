//! The server shim.
//!
//! A [`ServiceHandler`] binds one [`Service`] to HTTP. Each request runs
//! `decode -> invoke -> encode` and stops at the first failure:
//!
//! | Stage | Failure | Response |
//! |-------|---------|----------|
//! | collect body | too large / unreadable / timed out | 413 / 400 / 504 |
//! | decode | [`ExtractionError`] | 400, 413 or 415; the service is not called |
//! | invoke | [`ServiceError`] | the error's status (500 for generic failures) |
//! | encode | serialization failure | 500 |
//!
//! Every response carries an `x-request-id` header, and error bodies repeat
//! the ID in their `request_id` field.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use switchboard_core::{FnService, ServiceContext, ServiceError};
//! use switchboard_extract::{FieldKind, FieldSpec, InputSchema};
//! use switchboard_server::ServiceHandler;
//!
//! #[derive(Debug, Default, Deserialize)]
//! #[serde(default)]
//! struct RepeatInput {
//!     message: String,
//! }
//!
//! impl InputSchema for RepeatInput {
//!     const FIELDS: &'static [FieldSpec] = &[FieldSpec::new("message", FieldKind::String)];
//! }
//!
//! #[derive(Serialize)]
//! struct RepeatOutput {
//!     message: String,
//! }
//!
//! let handler = ServiceHandler::new(
//!     "Repeat",
//!     FnService::new(|_ctx: ServiceContext, input: RepeatInput| async move {
//!         Ok::<_, ServiceError>(RepeatOutput { message: input.message })
//!     }),
//! );
//! assert_eq!(handler.operation(), "Repeat");
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{HeaderName, HeaderValue, Request, Response};
use http_body::Body;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use serde::Serialize;
use tracing::{field, Instrument};

use switchboard_core::{RequestId, Service, ServiceContext, ServiceError};
use switchboard_extract::{
    encode, DecoderConfig, ErrorResponse, ExtractionContext, ExtractionError, InputSchema,
    RequestDecoder,
};
use switchboard_telemetry::logging::fields;
use switchboard_telemetry::metrics::{record_decode_failure, record_request, InFlightGuard};

use crate::config::{ServerConfig, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Header carrying the request ID in both directions.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Something that turns a hyper request into a response.
///
/// [`Server`](crate::Server) hosts one `HttpHandler` on every path.
pub trait HttpHandler: Send + Sync + 'static {
    /// Handles one request.
    fn handle(&self, req: Request<Incoming>) -> impl Future<Output = HttpResponse> + Send;
}

/// Binds a single-method service to an HTTP handler.
pub struct ServiceHandler<S, I, O> {
    service: Arc<S>,
    operation: Arc<str>,
    decoder: RequestDecoder,
    request_timeout: Duration,
    _marker: PhantomData<fn(I) -> O>,
}

impl<S, I, O> Clone for ServiceHandler<S, I, O> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            operation: Arc::clone(&self.operation),
            decoder: self.decoder,
            request_timeout: self.request_timeout,
            _marker: PhantomData,
        }
    }
}

impl<S, I, O> std::fmt::Debug for ServiceHandler<S, I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandler")
            .field("operation", &self.operation)
            .field("decoder", &self.decoder)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl<S, I, O> ServiceHandler<S, I, O>
where
    S: Service<I, O>,
    I: InputSchema,
    O: Serialize + Send + 'static,
{
    /// Creates a handler for `service`, named `operation` in logs and metrics.
    #[must_use]
    pub fn new(operation: impl Into<Arc<str>>, service: S) -> Self {
        Self {
            service: Arc::new(service),
            operation: operation.into(),
            decoder: RequestDecoder::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            _marker: PhantomData,
        }
    }

    /// Applies the decoder settings and request timeout of a server config.
    #[must_use]
    pub fn with_config(self, config: &ServerConfig) -> Self {
        self.with_decoder(config.decoder())
            .with_request_timeout(config.request_timeout())
    }

    /// Sets the decoder settings.
    #[must_use]
    pub fn with_decoder(mut self, config: DecoderConfig) -> Self {
        self.decoder = RequestDecoder::new(config);
        self
    }

    /// Sets the timeout for body collection and for the service call.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Handles one request.
    pub async fn handle<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let started = Instant::now();
        let _in_flight = InFlightGuard::new();

        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(RequestId::parse)
            .unwrap_or_default();

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            operation = %self.operation,
            http.method = %req.method(),
            http.path = %req.uri().path(),
            http.status_code = field::Empty,
        );

        let ctx = ServiceContext::with_request_id(request_id).with_operation(&*self.operation);
        let mut response = self
            .run(&ctx, req)
            .instrument(span.clone())
            .await
            .map(Full::new);

        let status = response.status();
        span.record(fields::HTTP_STATUS, status.as_u16());
        record_request(&self.operation, status.as_u16(), started.elapsed());

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
        }
        response
    }

    async fn run<B>(&self, ctx: &ServiceContext, req: Request<B>) -> Response<Bytes>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let request_id = ctx.request_id().to_string();

        let extraction = match self.collect(req).await {
            Ok(extraction) => extraction,
            Err(error) => return error.with_request_id(request_id).into_response(),
        };

        let input: I = match self.decoder.decode(&extraction) {
            Ok(input) => input,
            Err(e) => {
                return self
                    .reject_input(&e)
                    .with_request_id(request_id)
                    .into_response();
            }
        };

        // Dropping the request future (e.g. on client disconnect) cancels the call.
        let _cancel_on_drop = CancelOnDrop(ctx);
        let result = match tokio::time::timeout(self.request_timeout, self.service.call(ctx, input))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                ctx.cancel();
                Err(ServiceError::timeout(format!(
                    "service call exceeded {:?}",
                    self.request_timeout
                )))
            }
        };

        match result {
            Ok(output) => encode(&output),
            Err(e) => {
                if e.status_code().is_server_error() {
                    tracing::error!(error = %e, "service call failed");
                } else {
                    tracing::warn!(error = %e, "service call rejected input");
                }
                ErrorResponse::from(&e)
                    .with_request_id(request_id)
                    .into_response()
            }
        }
    }

    async fn collect<B>(&self, req: Request<B>) -> Result<ExtractionContext, ErrorResponse>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let max = self.decoder.config().max_body_size;
        let (parts, body) = req.into_parts();

        let declared = parts
            .headers
            .get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(declared) = declared.filter(|len| *len > max) {
            return Err(self.reject_input(&ExtractionError::payload_too_large(max, declared)));
        }

        let collected =
            tokio::time::timeout(self.request_timeout, Limited::new(body, max).collect()).await;

        match collected {
            Ok(Ok(collected)) => Ok(ExtractionContext::from_parts(parts, collected.to_bytes())),
            Ok(Err(e)) if e.is::<LengthLimitError>() => {
                Err(self.reject_input(&ExtractionError::body_limit_exceeded(max)))
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read request body");
                Err(ErrorResponse::new(
                    http::StatusCode::BAD_REQUEST,
                    "BODY_READ_ERROR",
                    format!("failed to read request body: {e}"),
                ))
            }
            Err(_) => {
                tracing::warn!("request body collection timed out");
                Err(ErrorResponse::timeout("request body collection timed out"))
            }
        }
    }

    fn reject_input(&self, error: &ExtractionError) -> ErrorResponse {
        tracing::debug!(error = %error, source = %error.source(), "rejected request input");
        record_decode_failure(&self.operation, &error.source().to_string());
        ErrorResponse::from(error)
    }
}

impl<S, I, O> HttpHandler for ServiceHandler<S, I, O>
where
    S: Service<I, O>,
    I: InputSchema,
    O: Serialize + Send + 'static,
{
    fn handle(&self, req: Request<Incoming>) -> impl Future<Output = HttpResponse> + Send {
        ServiceHandler::handle(self, req)
    }
}

struct CancelOnDrop<'a>(&'a ServiceContext);

impl Drop for CancelOnDrop<'_> {
    fn drop(&mut self) {
        self.0.cancel();
    }
}
