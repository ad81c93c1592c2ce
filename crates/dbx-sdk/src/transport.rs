//! HTTP transport abstraction.
//!
//! A [`Transport`] turns an [`ApiRequest`] into an [`ApiResponse`] and nothing
//! more: it never interprets status codes. Status dispatch lives in
//! [`crate::rest`]; throttling retries live in [`crate::retry`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
pub use reqwest::Method;
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::BasicAuth;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::retry::Retrying;

/// A request against the REST API, relative to the transport's host.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path without host, for example `api/2.0/instance-profiles/list`.
    pub path: String,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// JSON body. Sent for every method, including GET.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request without query or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets the JSON body from a serializable value.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `body` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// A raw response: status, body text and the URL that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Full request URL.
    pub url: String,
    /// Parsed `Retry-After` header, when the server sent a numeric one.
    pub retry_after: Option<Duration>,
}

impl ApiResponse {
    /// Creates a response without a `Retry-After` hint.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            url: url.into(),
            retry_after: None,
        }
    }

    /// Returns true when the response carries `status`.
    #[must_use]
    pub fn is(&self, status: u16) -> bool {
        self.status == status
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error naming the URL if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            Error::serialization(format!("failed to decode response from {}: {e}", self.url))
        })
    }
}

/// Executes requests against one host with one set of credentials.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when no HTTP response was received.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request).await
    }
}

/// `reqwest`-backed HTTPS transport with Basic authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth: BasicAuth,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Creates a transport for `https://{host}`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be constructed.
    pub fn new(host: &str, auth: BasicAuth, config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .https_only(true)
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("https://{host}"),
            auth,
        })
    }

    /// Returns the absolute URL for a request path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .basic_auth(&self.auth.username, Some(&self.auth.password));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport_with_source(format!("{} {url} failed", request.method), e)
        })?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.map_err(|e| {
            Error::transport_with_source(format!("failed to read response body from {url}"), e)
        })?;

        tracing::debug!(status, url = %url, "received response");

        Ok(ApiResponse {
            status,
            body,
            url,
            retry_after,
        })
    }
}

/// Parses a delay-seconds `Retry-After` value. HTTP dates are ignored.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Builds the transport a root client uses for one host.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Creates a transport for `host` authenticated with `auth`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be constructed.
    fn connect(&self, host: &str, auth: &BasicAuth) -> Result<Arc<dyn Transport>>;
}

/// Connector producing retrying HTTPS transports.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: ClientConfig,
}

impl HttpConnector {
    /// Creates a connector using `config` for timeouts and retries.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Connector for HttpConnector {
    fn connect(&self, host: &str, auth: &BasicAuth) -> Result<Arc<dyn Transport>> {
        let transport = HttpTransport::new(host, auth.clone(), &self.config)?;
        Ok(Arc::new(Retrying::new(transport, self.config.retry.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builders_set_method_query_and_body() {
        let request = ApiRequest::delete("api/2.1/unity-catalog/catalogs/main")
            .with_query("force", true)
            .with_json(&serde_json::json!({"metastore_id": "m"}))
            .expect("body");

        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.query, vec![("force".to_string(), "true".to_string())]);
        assert_eq!(request.body, Some(serde_json::json!({"metastore_id": "m"})));
    }

    #[test]
    fn response_json_reports_url_on_failure() {
        let response = ApiResponse::new(200, "not json", "https://h/api/x");
        let err = response.json::<Value>().expect_err("invalid body");
        assert!(err.to_string().contains("https://h/api/x"));
    }

    #[test]
    fn retry_after_accepts_only_delay_seconds() {
        assert_eq!(parse_retry_after(" 7 "), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn http_transport_joins_paths_without_double_slash() {
        let transport = HttpTransport::new(
            "accounts.cloud.databricks.com",
            BasicAuth::new("u", "p"),
            &ClientConfig::default(),
        )
        .expect("transport");

        assert_eq!(
            transport.url_for("/api/2.0/accounts/a/credentials"),
            "https://accounts.cloud.databricks.com/api/2.0/accounts/a/credentials"
        );
        let debug = format!("{transport:?}");
        assert!(!debug.contains("\"p\""));
    }
}
