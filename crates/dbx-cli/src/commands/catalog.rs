//! Catalog command - inspect Unity Catalog objects.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use tabled::Tabled;

use crate::output::{or_dash, print_json, print_table, timestamp};
use crate::{Config, OutputFormat};

/// Arguments for the catalog command.
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog action.
    #[command(subcommand)]
    pub action: CatalogAction,
}

/// Catalog actions.
#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// List catalogs.
    Catalogs,
    /// List the schemas of a catalog.
    Schemas {
        /// Catalog name.
        catalog: String,
    },
    /// List metastores.
    Metastores,
    /// Show one catalog.
    Show {
        /// Catalog name.
        name: String,
    },
    /// Show the metastore assigned to the workspace.
    Assignment,
}

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Execute the catalog command.
///
/// # Errors
///
/// Returns an error if the workspace host or credentials are missing, or an
/// API request fails.
pub async fn execute(args: CatalogArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let catalog = config.workspace_client(&registry)?.unity_catalog();

    match args.action {
        CatalogAction::Catalogs => {
            let catalogs = catalog.catalogs().list().await?;
            let rows = catalogs
                .iter()
                .map(|c| ObjectRow {
                    name: c.name.clone(),
                    owner: or_dash(c.owner.as_deref()),
                    comment: or_dash(c.comment.as_deref()),
                    created: c.created_at.map_or_else(|| "-".to_string(), timestamp),
                })
                .collect();
            render(&catalogs, rows, "No catalogs found", config)
        }
        CatalogAction::Schemas { catalog: name } => {
            let schemas = catalog.schemas().list(&name).await?;
            let rows = schemas
                .iter()
                .map(|s| ObjectRow {
                    name: s.reference().to_string(),
                    owner: or_dash(s.owner.as_deref()),
                    comment: or_dash(s.comment.as_deref()),
                    created: s.created_at.map_or_else(|| "-".to_string(), timestamp),
                })
                .collect();
            render(&schemas, rows, "No schemas found", config)
        }
        CatalogAction::Metastores => {
            let metastores = catalog.metastores().list().await?;
            let rows = metastores
                .iter()
                .map(|m| ObjectRow {
                    name: format!("{} ({})", m.name, m.metastore_id),
                    owner: or_dash(m.owner.as_deref()),
                    comment: or_dash(m.storage_root.as_deref()),
                    created: m.created_at.map_or_else(|| "-".to_string(), timestamp),
                })
                .collect();
            render(&metastores, rows, "No metastores found", config)
        }
        CatalogAction::Show { name } => {
            let found = catalog
                .catalogs()
                .get_by_name(&name)
                .await?
                .with_context(|| format!("Catalog {name} not found"))?;
            match config.format {
                OutputFormat::Json => print_json(&found)?,
                OutputFormat::Text | OutputFormat::Table => {
                    println!("Catalog: {}", found.name.bold());
                    println!("Metastore: {}", found.metastore_id);
                    println!("Type: {}", or_dash(found.catalog_type.as_deref()));
                    println!("Owner: {}", or_dash(found.owner.as_deref()));
                    println!("Storage: {}", or_dash(found.storage_location.as_deref()));
                    if !found.properties.is_empty() {
                        println!("Properties:");
                        for (key, value) in &found.properties {
                            println!("  {key} = {value}");
                        }
                    }
                }
            }
            Ok(())
        }
        CatalogAction::Assignment => {
            let assignment = catalog.metastores().current_assignment().await?;
            match (&config.format, assignment) {
                (OutputFormat::Json, assignment) => print_json(&assignment)?,
                (_, None) => println!("{}", "No metastore assigned".yellow()),
                (_, Some(assignment)) => {
                    println!("Workspace: {}", assignment.workspace_id);
                    println!("Metastore: {}", assignment.metastore_id);
                    println!(
                        "Default catalog: {}",
                        or_dash(assignment.default_catalog_name.as_deref())
                    );
                }
            }
            Ok(())
        }
    }
}

fn render<T: serde::Serialize>(
    records: &[T],
    rows: Vec<ObjectRow>,
    empty: &str,
    config: &Config,
) -> Result<()> {
    match config.format {
        OutputFormat::Json => print_json(records)?,
        OutputFormat::Table => print_table(rows, empty),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("{empty}");
            }
            for row in rows {
                println!("  {} {}", row.name.bold(), row.comment.dimmed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_takes_catalog_name() {
        use clap::Parser;

        #[derive(Parser)]
        struct TestCli {
            #[command(subcommand)]
            action: CatalogAction,
        }

        let cli = TestCli::parse_from(["test", "schemas", "main"]);
        assert!(matches!(cli.action, CatalogAction::Schemas { catalog } if catalog == "main"));
    }
}
