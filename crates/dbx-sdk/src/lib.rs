//! # dbx-sdk
//!
//! Typed client for the account and workspace control-plane REST APIs.
//!
//! The crate turns HTTP round trips into typed records and typed errors using
//! one convention everywhere: each operation accepts a small set of response
//! statuses and maps each of them to a value, an absence or an error (see
//! [`dispatch`]).
//!
//! - **Root clients**: [`AccountClient`] for account resources and
//!   [`WorkspaceClient`] for workspace resources, created and cached by a
//!   [`ClientRegistry`]
//! - **Resource clients**: one per collection, reached from a root client
//! - **Bound records**: every returned record is a [`Bound`] that can refresh,
//!   update or delete itself
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbx_sdk::{BasicAuth, ClientConfig, ClientRegistry};
//!
//! # async fn run() -> dbx_sdk::Result<()> {
//! let registry = ClientRegistry::new(ClientConfig::from_env()?);
//! let workspace = registry.workspace(
//!     "dbc-1234.cloud.databricks.com",
//!     Some(BasicAuth::new("admin", "secret")),
//! )?;
//! for catalog in workspace.unity_catalog().catalogs().list().await? {
//!     println!("{}", catalog.name);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod account;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod embedded_json;
pub mod error;
pub mod observability;
pub mod registry;
pub mod resource;
pub mod rest;
pub mod retry;
pub mod transport;
pub mod types;
pub mod unity_catalog;
pub mod workspace;

pub use account::AccountClient;
pub use auth::{BasicAuth, CredentialProvider, Netrc, NetrcFile, StaticCredentials};
pub use config::{ClientConfig, PollConfig, RetryConfig};
pub use error::{Error, Result};
pub use registry::ClientRegistry;
pub use resource::Bound;
pub use transport::{ApiRequest, ApiResponse, Connector, Transport};
pub use unity_catalog::UnityCatalogClient;
pub use workspace::WorkspaceClient;

/// Cancellation token accepted by long-running waits.
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::resource::{Bound, Resource, ResourceOps};
    pub use crate::types::*;
    pub use crate::{
        AccountClient, BasicAuth, CancellationToken, ClientConfig, ClientRegistry, Error, Result,
        WorkspaceClient,
    };
}
