//! Error types and result aliases for the control-plane client.
//!
//! Every fallible operation in this crate returns [`Result`]. The variants map
//! onto the outcomes a REST round trip can have once the two deliberate
//! 404 normalizations (list → empty, get → absent) are taken out:
//! misconfiguration, an HTTP status the operation does not accept, a resource
//! that vanished, a rejected delete, or a failure below the HTTP layer.

use std::fmt;
use std::time::Duration;

use crate::transport::ApiResponse;

/// The result type used throughout the client.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the control plane.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client could not be configured (for example no credentials for a host).
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The API answered with a status code the operation does not handle.
    #[error("unexpected API response: status {status}, url {url}, body: {body}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
        /// Request URL.
        url: String,
    },

    /// A resource that a record refers to no longer exists.
    #[error("{resource_type} {id} does not exist anymore")]
    ResourceGone {
        /// The type of resource that disappeared.
        resource_type: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A delete targeted a resource that does not exist.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// The type of resource that was not found.
        resource_type: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A delete was rejected because the resource is still in use.
    #[error("conflict: {body}")]
    Conflict {
        /// Raw response body describing the conflict.
        body: String,
    },

    /// The transport rejected the request (400, 401 or a server error).
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
        /// Request URL.
        url: String,
    },

    /// The request never produced an HTTP response.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request or response body could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// Invalid input was provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A long-running wait was cancelled by the caller.
    #[error("{operation} was cancelled")]
    Cancelled {
        /// The operation that was waiting.
        operation: String,
    },

    /// A long-running wait exceeded its deadline.
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        /// The operation that was waiting.
        operation: String,
        /// How long the operation waited before giving up.
        elapsed: Duration,
    },
}

impl Error {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unexpected-response error from a raw API response.
    #[must_use]
    pub fn unexpected(response: &ApiResponse) -> Self {
        Self::UnexpectedResponse {
            status: response.status,
            body: response.body.clone(),
            url: response.url.clone(),
        }
    }

    /// Creates a resource-gone error.
    #[must_use]
    pub fn resource_gone(resource_type: &'static str, id: impl fmt::Display) -> Self {
        Self::ResourceGone {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a transport error without a source.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error with a source cause.
    #[must_use]
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedResponse { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
