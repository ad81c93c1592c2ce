//! # dbx-cli
//!
//! Command-line front end over `dbx-sdk`.
//!
//! ## Commands
//!
//! - `dbx account` - Provision and inspect account resources
//! - `dbx catalog` - Inspect catalogs, schemas and metastores
//! - `dbx policy` - Create and list cluster policies
//! - `dbx permissions` - Show and grant object permissions
//!
//! ## Configuration
//!
//! Flags fall back to environment variables:
//!
//! - `DBX_ACCOUNT_ID` - Account id for `dbx account`
//! - `DBX_WORKSPACE_HOST` - Workspace host for workspace commands
//! - `DBX_USERNAME` / `DBX_PASSWORD` - Credentials; netrc is used when unset
//!
//! Transport settings (`DBX_MAX_RETRIES`, `DBX_POLL_INTERVAL_SECS`, ...) are
//! read by [`dbx_sdk::ClientConfig::from_env`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dbx_sdk::{AccountClient, BasicAuth, ClientConfig, ClientRegistry, WorkspaceClient};
use uuid::Uuid;

/// Account and workspace provisioning from the command line.
#[derive(Debug, Parser)]
#[command(name = "dbx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account id.
    #[arg(long, env = "DBX_ACCOUNT_ID", global = true)]
    pub account_id: Option<Uuid>,

    /// Workspace host, e.g. `dbc-1234.cloud.databricks.com`.
    #[arg(long, env = "DBX_WORKSPACE_HOST", global = true)]
    pub workspace_host: Option<String>,

    /// User name.
    #[arg(long, env = "DBX_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password or token.
    #[arg(long, env = "DBX_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        let auth = match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(BasicAuth::new(username, password)),
            _ => None,
        };
        Config {
            account_id: self.account_id,
            workspace_host: self.workspace_host.clone(),
            auth,
            format: self.format.clone(),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision and inspect account resources.
    Account(commands::account::AccountArgs),
    /// Inspect catalogs, schemas and metastores.
    Catalog(commands::catalog::CatalogArgs),
    /// Create and list cluster policies.
    Policy(commands::policies::PolicyArgs),
    /// Show and grant object permissions.
    Permissions(commands::permissions::PermissionsArgs),
}

/// Output format.
#[derive(Debug, Clone, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Table output.
    Table,
}

/// CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Account id.
    pub account_id: Option<Uuid>,
    /// Workspace host.
    pub workspace_host: Option<String>,
    /// Explicit credentials; `None` defers to netrc.
    pub auth: Option<BasicAuth>,
    /// Output format.
    pub format: OutputFormat,
}

impl Config {
    /// Builds a client registry from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is invalid.
    pub fn registry(&self) -> Result<ClientRegistry> {
        let config = ClientConfig::from_env().context("Invalid DBX_* environment")?;
        Ok(ClientRegistry::new(config))
    }

    /// Account client for the configured account.
    ///
    /// # Errors
    ///
    /// Returns an error if no account id is configured or no credentials
    /// resolve.
    pub fn account_client(&self, registry: &ClientRegistry) -> Result<AccountClient> {
        let account_id = self
            .account_id
            .context("Account ID is required. Set DBX_ACCOUNT_ID or use --account-id")?;
        registry
            .account(account_id, self.auth.clone())
            .context("Failed to create account client")
    }

    /// Workspace client for the configured host.
    ///
    /// # Errors
    ///
    /// Returns an error if no host is configured or no credentials resolve.
    pub fn workspace_client(&self, registry: &ClientRegistry) -> Result<WorkspaceClient> {
        let host = self
            .workspace_host
            .as_deref()
            .context("Workspace host is required. Set DBX_WORKSPACE_HOST or use --workspace-host")?;
        registry
            .workspace(host, self.auth.clone())
            .context("Failed to create workspace client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_from_flags() {
        let cli = Cli::parse_from([
            "dbx",
            "--workspace-host",
            "dbc-1.cloud.databricks.com",
            "--username",
            "token",
            "--password",
            "dapi-1",
            "--format",
            "json",
            "catalog",
            "catalogs",
        ]);

        let config = cli.config();
        assert_eq!(config.workspace_host.as_deref(), Some("dbc-1.cloud.databricks.com"));
        assert_eq!(config.auth, Some(BasicAuth::new("token", "dapi-1")));
        assert!(matches!(config.format, OutputFormat::Json));
    }

    #[test]
    fn test_partial_credentials_defer_to_netrc() {
        let cli = Cli::parse_from(["dbx", "--username", "token", "catalog", "metastores"]);
        assert!(cli.config().auth.is_none());
    }

    #[test]
    fn test_missing_account_id_is_reported() {
        let config = Config::default();
        let registry = ClientRegistry::with_parts(
            ClientConfig::default(),
            std::sync::Arc::new(dbx_sdk::transport::HttpConnector::new(ClientConfig::default())),
            std::sync::Arc::new(dbx_sdk::StaticCredentials::new()),
        );
        let err = config.account_client(&registry).expect_err("no account id");
        assert!(err.to_string().contains("DBX_ACCOUNT_ID"));
    }
}
