//! The client shim.
//!
//! [`ServiceClient::call`] is the mirror of the server shim: the typed input
//! is always sent as a JSON body, and the JSON response is decoded into the
//! typed output. Non-2xx responses surface the server's [`ErrorBody`].

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use switchboard_core::{ErrorBody, ServiceContext};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const REQUEST_ID_HEADER: &str = "x-request-id";
const APPLICATION_JSON: &str = "application/json";

/// HTTP client calling single-method services.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client from a validated configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::config(format!("failed to create client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calls the service at `path` with `method`.
    ///
    /// The call is abandoned with [`ClientError::Cancelled`] as soon as `ctx`
    /// is cancelled, even while the response is still being read.
    pub async fn call<I, O>(
        &self,
        ctx: &ServiceContext,
        method: Method,
        path: &str,
        input: &I,
    ) -> ClientResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        if ctx.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let body = serde_json::to_vec(input).map_err(ClientError::Encode)?;
        let url = self.url(path);
        tracing::debug!(
            request_id = %ctx.request_id(),
            http.method = %method,
            url = %url,
            "calling service"
        );

        let request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .header(REQUEST_ID_HEADER, ctx.request_id().to_string())
            .body(body);

        tokio::select! {
            biased;
            () = ctx.cancelled() => {
                tracing::debug!(request_id = %ctx.request_id(), "call cancelled");
                Err(ClientError::Cancelled)
            }
            result = Self::execute(request) => result,
        }
    }

    /// Calls the service at `path` with POST.
    pub async fn call_default<I, O>(
        &self,
        ctx: &ServiceContext,
        path: &str,
        input: &I,
    ) -> ClientResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(ctx, Method::POST, path, input).await
    }

    async fn execute<O: DeserializeOwned>(request: reqwest::RequestBuilder) -> ClientResult<O> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { status, source })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let (code, message) = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error) => (error.code, error.message),
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            };
            (String::new(), message)
        }
    };

    tracing::debug!(status = %status, code = %code, message = %message, "service call failed");
    ClientError::Status {
        status,
        code,
        message,
    }
}
