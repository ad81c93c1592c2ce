//! Account command - provision and inspect account resources.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use dbx_sdk::types::{CreateNetwork, CreateWorkspace, Workspace, WorkspaceStatus};
use dbx_sdk::{AccountClient, Bound, CancellationToken};
use owo_colors::OwoColorize;
use tabled::Tabled;

use crate::output::{or_dash, print_json, print_table, status_colored, timestamp};
use crate::{Config, OutputFormat};

/// Arguments for the account command.
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account action.
    #[command(subcommand)]
    pub action: AccountAction,
}

/// Account actions.
#[derive(Debug, Subcommand)]
pub enum AccountAction {
    /// List resources of one kind.
    List {
        /// Resource kind.
        #[arg(value_enum)]
        kind: ResourceKind,
    },
    /// Show one workspace.
    Workspace {
        /// Workspace id.
        workspace_id: i64,
    },
    /// Create credentials, storage, an optional network and a workspace.
    Provision(ProvisionArgs),
}

/// Account-level resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    /// Cross-account credentials.
    Credentials,
    /// Root bucket storage configurations.
    Storage,
    /// Customer-managed networks.
    Networks,
    /// Workspaces.
    Workspaces,
}

/// Arguments for `account provision`.
#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Workspace name; also prefixes the supporting resources.
    #[arg(long)]
    pub name: String,

    /// AWS region.
    #[arg(long, default_value = "us-west-2")]
    pub region: String,

    /// Pricing tier.
    #[arg(long, default_value = "PREMIUM")]
    pub pricing_tier: String,

    /// Cross-account IAM role.
    #[arg(long)]
    pub role_arn: String,

    /// Root bucket name.
    #[arg(long)]
    pub bucket: String,

    /// VPC for a customer-managed network.
    #[arg(long, requires = "subnets")]
    pub vpc_id: Option<String>,

    /// Subnet of the network; repeat for each subnet.
    #[arg(long = "subnet")]
    pub subnets: Vec<String>,

    /// Security group of the network; repeat for each group.
    #[arg(long = "security-group")]
    pub security_groups: Vec<String>,

    /// Return as soon as the workspace has been requested.
    #[arg(long)]
    pub no_wait: bool,
}

/// Execute the account command.
///
/// # Errors
///
/// Returns an error if the account id or credentials are missing, or an API
/// request fails.
pub async fn execute(args: AccountArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let account = config.account_client(&registry)?;

    match args.action {
        AccountAction::List { kind } => list(&account, kind, config).await,
        AccountAction::Workspace { workspace_id } => {
            let workspace = account
                .workspaces()
                .get_by_id(workspace_id)
                .await?
                .with_context(|| format!("Workspace {workspace_id} not found"))?;
            show_workspace(&workspace, config)
        }
        AccountAction::Provision(args) => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });
            let poll = registry.config().provisioning.clone();
            let workspace = provision(&account, &args, &poll, &cancel).await?;
            show_workspace(&workspace, config)
        }
    }
}

async fn provision(
    account: &AccountClient,
    args: &ProvisionArgs,
    poll: &dbx_sdk::PollConfig,
    cancel: &CancellationToken,
) -> Result<Bound<Workspace>> {
    let credentials = account
        .credentials()
        .create(&format!("{}-credentials", args.name), &args.role_arn)
        .await
        .context("Failed to create credentials")?;
    eprintln!("{} credentials {}", "created".green(), credentials.credentials_id);

    let storage = account
        .storage_configurations()
        .create(&format!("{}-storage", args.name), &args.bucket)
        .await
        .context("Failed to create storage configuration")?;
    eprintln!(
        "{} storage configuration {}",
        "created".green(),
        storage.storage_configuration_id
    );

    let mut request = CreateWorkspace::new(
        args.name.clone(),
        args.region.clone(),
        args.pricing_tier.clone(),
        credentials.credentials_id,
        storage.storage_configuration_id,
    );

    if let Some(vpc_id) = &args.vpc_id {
        let network = account
            .networks()
            .create(&CreateNetwork {
                network_name: format!("{}-network", args.name),
                vpc_id: vpc_id.clone(),
                subnet_ids: args.subnets.clone(),
                security_group_ids: args.security_groups.clone(),
                vpc_endpoints: None,
            })
            .await
            .context("Failed to create network")?;
        eprintln!("{} network {}", "created".green(), network.network_id);
        request.network_id = Some(network.network_id);
    }

    let mut workspace = account
        .workspaces()
        .create(&request)
        .await
        .context("Failed to create workspace")?;
    eprintln!("{} workspace {}", "requested".green(), workspace.workspace_id);

    if !args.no_wait {
        eprintln!("waiting for workspace {} ...", workspace.workspace_id);
        workspace
            .wait_on_provisioning(poll, cancel)
            .await
            .context("Workspace did not finish provisioning")?;
        if workspace.workspace_status != WorkspaceStatus::Running {
            anyhow::bail!(
                "Workspace {} ended in {}: {}",
                workspace.workspace_id,
                workspace.workspace_status,
                workspace.workspace_status_message.as_deref().unwrap_or("no message")
            );
        }
    }

    Ok(workspace)
}

async fn list(account: &AccountClient, kind: ResourceKind, config: &Config) -> Result<()> {
    #[derive(Tabled)]
    struct ResourceRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Detail")]
        detail: String,
        #[tabled(rename = "Created")]
        created: String,
    }

    let (json, rows) = match kind {
        ResourceKind::Credentials => {
            let items = account.credentials().list().await?;
            let rows = items
                .iter()
                .map(|c| ResourceRow {
                    id: c.credentials_id.to_string(),
                    name: c.credentials_name.clone(),
                    detail: c.aws_credentials.sts_role.role_arn.clone(),
                    created: timestamp(c.creation_time),
                })
                .collect::<Vec<_>>();
            (serde_json::to_value(&items)?, rows)
        }
        ResourceKind::Storage => {
            let items = account.storage_configurations().list().await?;
            let rows = items
                .iter()
                .map(|s| ResourceRow {
                    id: s.storage_configuration_id.to_string(),
                    name: s.storage_configuration_name.clone(),
                    detail: s.root_bucket_info.bucket_name.clone(),
                    created: timestamp(s.creation_time),
                })
                .collect::<Vec<_>>();
            (serde_json::to_value(&items)?, rows)
        }
        ResourceKind::Networks => {
            let items = account.networks().list().await?;
            let rows = items
                .iter()
                .map(|n| ResourceRow {
                    id: n.network_id.to_string(),
                    name: n.network_name.clone(),
                    detail: format!("{} ({})", n.vpc_id, or_dash(n.vpc_status.as_deref())),
                    created: timestamp(n.creation_time),
                })
                .collect::<Vec<_>>();
            (serde_json::to_value(&items)?, rows)
        }
        ResourceKind::Workspaces => {
            let items = account.workspaces().list().await?;
            let rows = items
                .iter()
                .map(|w| ResourceRow {
                    id: w.workspace_id.to_string(),
                    name: w.workspace_name.clone(),
                    detail: w.workspace_status.to_string(),
                    created: timestamp(w.creation_time),
                })
                .collect::<Vec<_>>();
            (serde_json::to_value(&items)?, rows)
        }
    };

    match config.format {
        OutputFormat::Json => print_json(&json)?,
        OutputFormat::Table => print_table(rows, "No resources found"),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No resources found");
            }
            for row in rows {
                println!("  {} {} {}", row.id, row.name.bold(), row.detail.dimmed());
            }
        }
    }
    Ok(())
}

fn show_workspace(workspace: &Bound<Workspace>, config: &Config) -> Result<()> {
    match config.format {
        OutputFormat::Json => print_json(workspace)?,
        OutputFormat::Text | OutputFormat::Table => {
            println!("Workspace: {}", workspace.workspace_id);
            println!("Name: {}", workspace.workspace_name);
            println!(
                "Status: {}",
                status_colored(workspace.workspace_status.as_str())
            );
            if let Some(message) = &workspace.workspace_status_message {
                println!("Message: {message}");
            }
            println!("Region: {}", workspace.aws_region);
            match workspace.workspace_host() {
                Ok(host) => println!("Host: {host}"),
                Err(_) => println!("Host: -"),
            }
            println!("Created: {}", timestamp(workspace.creation_time));
        }
    }
    Ok(())
}
