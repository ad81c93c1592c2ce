//! Authenticated REST client shared by every resource client of a host.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::Instrument;

use crate::auth::BasicAuth;
use crate::error::{Error, Result};
use crate::observability::request_span;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Returns true for statuses the transport layer rejects before any
/// operation-specific dispatch runs.
#[must_use]
pub fn is_transport_failure(status: u16) -> bool {
    status == 400 || status == 401 || status >= 500
}

/// REST client bound to one host and one set of credentials.
///
/// Cloning is cheap; clones share the underlying transport.
#[derive(Clone)]
pub struct RestClient {
    host: Arc<str>,
    auth: BasicAuth,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("host", &self.host)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Creates a client for `host` sending requests through `transport`.
    #[must_use]
    pub fn new(host: impl Into<String>, auth: BasicAuth, transport: Arc<dyn Transport>) -> Self {
        Self {
            host: Arc::from(host.into()),
            auth,
            transport,
        }
    }

    /// The host this client talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The credentials this client authenticates with.
    #[must_use]
    pub fn auth(&self) -> &BasicAuth {
        &self.auth
    }

    /// Sends a request and applies the transport-level status policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] for 400, 401 and server errors, or
    /// [`Error::Transport`] when no response was received. Every other status
    /// is handed back for the caller to dispatch.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        request.path = request.path.trim_start_matches('/').to_string();
        let span = request_span(&request.method, &self.host, &request.path);
        let method = request.method.clone();

        async move {
            tracing::debug!(query = ?request.query, "sending request");
            let response = self.transport.execute(request).await?;
            tracing::Span::current().record("status", response.status);

            if is_transport_failure(response.status) {
                tracing::error!(
                    method = %method,
                    status = response.status,
                    url = %response.url,
                    body = %response.body,
                    "request rejected"
                );
                return Err(Error::Http {
                    status: response.status,
                    body: response.body,
                    url: response.url,
                });
            }

            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Sends a GET without a body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::send`].
    pub async fn get(&self, path: impl Into<String>) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path)).await
    }

    /// Sends a POST with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::send`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).with_json(body)?).await
    }

    /// Sends a PATCH with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::send`].
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse> {
        self.send(ApiRequest::patch(path).with_json(body)?).await
    }

    /// Sends a PUT with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::send`].
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<ApiResponse> {
        self.send(ApiRequest::put(path).with_json(body)?).await
    }

    /// Sends a DELETE without a body.
    ///
    /// # Errors
    ///
    /// See [`RestClient::send`].
    pub async fn delete(&self, path: impl Into<String>) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Returns true when both clients share the same transport instance.
    #[must_use]
    pub fn same_transport(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.transport, &other.transport)
    }
}
