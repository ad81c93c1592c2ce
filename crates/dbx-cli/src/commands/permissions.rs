//! Permissions command - show and grant object permissions.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use dbx_sdk::types::{ObjectPermission, Permissions};
use owo_colors::OwoColorize;
use tabled::Tabled;

use crate::output::{print_json, print_table};
use crate::{Config, OutputFormat};

/// Arguments for the permissions command.
#[derive(Debug, Args)]
pub struct PermissionsArgs {
    /// Permissions action.
    #[command(subcommand)]
    pub action: PermissionsAction,
}

/// Permissions actions.
#[derive(Debug, Subcommand)]
pub enum PermissionsAction {
    /// Show the access control list of an object.
    Show(ObjectArgs),
    /// Add grants to an object.
    Grant(GrantArgs),
}

/// Object addressed by type and id, e.g. `clusters 0123-456789-abc`.
#[derive(Debug, Args)]
pub struct ObjectArgs {
    /// Object type path, e.g. `clusters`, `jobs`, `sql/warehouses`.
    pub object_type: String,
    /// Object id.
    pub object_id: String,
}

/// Arguments for `permissions grant`.
#[derive(Debug, Args)]
pub struct GrantArgs {
    /// Object to grant on.
    #[command(flatten)]
    pub object: ObjectArgs,

    /// Permission level, e.g. `CAN_MANAGE`.
    #[arg(long)]
    pub level: String,

    /// Users to grant; repeatable.
    #[arg(long = "user")]
    pub users: Vec<String>,

    /// Groups to grant; repeatable.
    #[arg(long = "group")]
    pub groups: Vec<String>,

    /// Service principals to grant; repeatable.
    #[arg(long = "service-principal")]
    pub service_principals: Vec<String>,
}

impl GrantArgs {
    fn access_control_list(&self) -> Vec<ObjectPermission> {
        let users = self
            .users
            .iter()
            .map(|name| ObjectPermission::user(name, &self.level));
        let groups = self
            .groups
            .iter()
            .map(|name| ObjectPermission::group(name, &self.level));
        let principals = self
            .service_principals
            .iter()
            .map(|name| ObjectPermission::service_principal(name, &self.level));
        users.chain(groups).chain(principals).collect()
    }
}

/// Execute the permissions command.
///
/// # Errors
///
/// Returns an error if the object does not exist, no principal is given, or
/// an API request fails.
pub async fn execute(args: PermissionsArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let permissions = config.workspace_client(&registry)?.permissions();

    match args.action {
        PermissionsAction::Show(object) => {
            let acl = permissions
                .get(&object.object_type, &object.object_id)
                .await?
                .with_context(|| {
                    format!("{} {} not found", object.object_type, object.object_id)
                })?;
            show(&acl, config)
        }
        PermissionsAction::Grant(args) => {
            let grants = args.access_control_list();
            if grants.is_empty() {
                anyhow::bail!("Pass at least one --user, --group or --service-principal");
            }
            let acl = permissions
                .grant(&args.object.object_type, &args.object.object_id, &grants)
                .await?;
            if matches!(config.format, OutputFormat::Text) {
                println!("{} {} {}", "Granted".green(), args.level, grants.len());
            }
            show(&acl, config)
        }
    }
}

fn show(acl: &Permissions, config: &Config) -> Result<()> {
    #[derive(Tabled)]
    struct GrantRow {
        #[tabled(rename = "Principal")]
        principal: String,
        #[tabled(rename = "Levels")]
        levels: String,
    }

    let rows: Vec<GrantRow> = acl
        .access_control_list
        .iter()
        .map(|entry| GrantRow {
            principal: entry
                .principal()
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            levels: entry
                .all_permissions
                .iter()
                .map(|p| {
                    if p.inherited {
                        format!("{} (inherited)", p.permission_level)
                    } else {
                        p.permission_level.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    match config.format {
        OutputFormat::Json => print_json(acl)?,
        OutputFormat::Table => print_table(rows, "No grants"),
        OutputFormat::Text => {
            println!("{} {}", acl.object_type.bold(), acl.object_id);
            for row in rows {
                println!("  {} {}", row.principal, row.levels.dimmed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_builds_one_entry_per_principal() {
        use clap::Parser;

        #[derive(Parser)]
        struct TestCli {
            #[command(subcommand)]
            action: PermissionsAction,
        }

        let cli = TestCli::parse_from([
            "test",
            "grant",
            "clusters",
            "c1",
            "--level",
            "CAN_RESTART",
            "--user",
            "ann@example.com",
            "--group",
            "ops",
        ]);
        let PermissionsAction::Grant(args) = cli.action else {
            panic!("expected grant");
        };
        assert_eq!(
            args.access_control_list(),
            vec![
                ObjectPermission::user("ann@example.com", "CAN_RESTART"),
                ObjectPermission::group("ops", "CAN_RESTART"),
            ]
        );
    }
}
