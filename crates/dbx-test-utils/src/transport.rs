//! Scripted transport with request recording.
//!
//! Responses are scripted per `(method, path)`. Each route answers its
//! scripted responses in order and keeps repeating the last one; unscripted
//! routes answer 404 with an empty body.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dbx_sdk::auth::BasicAuth;
use dbx_sdk::transport::{ApiRequest, ApiResponse, Connector, Method, Transport};
use dbx_sdk::Result;
use serde_json::Value;

/// Host reported in response URLs when none is given.
pub const TEST_HOST: &str = "test.cloud.databricks.com";

/// A request the transport received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Path without a leading `/`.
    pub path: String,
    /// Query parameters in order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Value of query parameter `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Body, panicking if the request had none.
    pub fn json(&self) -> &Value {
        self.body.as_ref().expect("request has a JSON body")
    }
}

/// One scripted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedResponse {
    /// Status code.
    pub status: u16,
    /// Raw body.
    pub body: String,
    /// `Retry-After` hint.
    pub retry_after: Option<Duration>,
}

impl ScriptedResponse {
    /// Response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            retry_after: None,
        }
    }

    /// Response with an empty body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            retry_after: None,
        }
    }

    /// Adds a `Retry-After` hint.
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

type Route = (Method, String);

#[derive(Debug, Default)]
struct State {
    routes: HashMap<Route, VecDeque<ScriptedResponse>>,
    requests: Vec<RecordedRequest>,
}

/// In-memory [`Transport`] that answers scripted responses and records
/// every request. Clones share state.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    host: Arc<str>,
    state: Arc<Mutex<State>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

impl RecordingTransport {
    /// Creates a transport reporting [`TEST_HOST`] in response URLs.
    pub fn new() -> Self {
        Self::for_host(TEST_HOST)
    }

    /// Creates a transport reporting `host` in response URLs.
    pub fn for_host(host: &str) -> Self {
        Self {
            host: Arc::from(host),
            state: Arc::default(),
        }
    }

    /// Scripts a JSON response for `method path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.respond_with(method, path, ScriptedResponse::json(status, &body))
    }

    /// Scripts an empty-body response for `method path`.
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) -> &Self {
        self.respond_with(method, path, ScriptedResponse::empty(status))
    }

    /// Appends `response` to the script of `method path`.
    pub fn respond_with(&self, method: Method, path: &str, response: ScriptedResponse) -> &Self {
        self.state
            .lock()
            .expect("lock")
            .routes
            .entry((method, normalize(path)))
            .or_default()
            .push_back(response);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().expect("lock").requests.clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().expect("lock").requests.last().cloned()
    }

    /// Requests sent to `method path`.
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        let path = normalize(path);
        self.state
            .lock()
            .expect("lock")
            .requests
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Forgets recorded requests; scripts are kept.
    pub fn clear_requests(&self) {
        self.state.lock().expect("lock").requests.clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let path = normalize(&request.path);
        let url = format!("https://{}/{path}", self.host);
        let mut state = self.state.lock().expect("lock");
        state.requests.push(RecordedRequest {
            method: request.method.clone(),
            path: path.clone(),
            query: request.query,
            body: request.body,
        });

        let scripted = match state.routes.get_mut(&(request.method, path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(match scripted {
            Some(scripted) => {
                let mut response = ApiResponse::new(scripted.status, scripted.body, url);
                response.retry_after = scripted.retry_after;
                response
            }
            None => ApiResponse::new(404, "", url),
        })
    }
}

/// Connector handing out one shared [`RecordingTransport`] and recording
/// every `(host, credentials)` pair it was asked to connect.
#[derive(Debug, Clone, Default)]
pub struct RecordingConnector {
    transport: RecordingTransport,
    connections: Arc<Mutex<Vec<(String, BasicAuth)>>>,
}

impl RecordingConnector {
    /// Creates a connector over `transport`.
    pub fn new(transport: RecordingTransport) -> Self {
        Self {
            transport,
            connections: Arc::default(),
        }
    }

    /// The shared transport.
    pub fn transport(&self) -> &RecordingTransport {
        &self.transport
    }

    /// Hosts and credentials connected so far, in order.
    pub fn connections(&self) -> Vec<(String, BasicAuth)> {
        self.connections.lock().expect("lock").clone()
    }
}

impl Connector for RecordingConnector {
    fn connect(&self, host: &str, auth: &BasicAuth) -> Result<Arc<dyn Transport>> {
        self.connections
            .lock()
            .expect("lock")
            .push((host.to_string(), auth.clone()));
        Ok(Arc::new(self.transport.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripts_repeat_last_response_and_unscripted_routes_are_404() {
        let transport = RecordingTransport::new();
        transport
            .respond_empty(Method::GET, "/a", 429)
            .respond_empty(Method::GET, "a", 200);

        let statuses = [
            transport.execute(ApiRequest::get("a")).await.expect("a").status,
            transport.execute(ApiRequest::get("a")).await.expect("a").status,
            transport.execute(ApiRequest::get("a")).await.expect("a").status,
            transport.execute(ApiRequest::get("b")).await.expect("b").status,
        ];

        assert_eq!(statuses, [429, 200, 200, 404]);
        assert_eq!(transport.requests_to(&Method::GET, "/a").len(), 3);
    }
}
