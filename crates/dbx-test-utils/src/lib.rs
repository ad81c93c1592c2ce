//! Shared test utilities for the dbx crates.
//!
//! This crate provides:
//! - [`RecordingTransport`]: scripted responses with request recording
//! - [`RecordingConnector`]: a connector for registry tests
//! - Fixture builders for every wire record
//! - Root clients wired to a recording transport
//!
//! # Example
//!
//! ```rust,ignore
//! use dbx_test_utils::{workspace_client, RecordingTransport};
//!
//! #[tokio::test]
//! async fn lists_nothing() {
//!     let transport = RecordingTransport::new();
//!     let workspace = workspace_client(&transport);
//!     assert!(workspace.instance_profiles().list().await.unwrap().is_empty());
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
// Test utilities use expect/unwrap for cleaner test code - panics are acceptable in tests
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

pub mod fixtures;
pub mod transport;

pub use fixtures::*;
pub use transport::*;

/// Initialize test logging (call once per test module).
pub fn init_test_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("dbx_sdk=debug".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}
