//! Policy command - create and list cluster policies.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use dbx_sdk::types::{PolicyDefinition, PolicyElement};
use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::Tabled;

use crate::output::{or_dash, print_json, print_table};
use crate::{Config, OutputFormat};

/// Arguments for the policy command.
#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Policy action.
    #[command(subcommand)]
    pub action: PolicyAction,
}

/// Policy actions.
#[derive(Debug, Subcommand)]
pub enum PolicyAction {
    /// List cluster policies.
    List,
    /// Create a cluster policy.
    Create(CreatePolicyArgs),
    /// Grant `CAN_USE` on a policy.
    Grant(GrantUseArgs),
}

/// Arguments for `policy create`.
#[derive(Debug, Args)]
pub struct CreatePolicyArgs {
    /// Policy name.
    #[arg(long)]
    pub name: String,

    /// Description.
    #[arg(long)]
    pub description: Option<String>,

    /// Derive from this policy family; rules become family overrides.
    #[arg(long)]
    pub family: Option<String>,

    /// Pin an attribute: `path=value`. Values are parsed as JSON when possible.
    #[arg(long = "fixed", value_name = "PATH=VALUE")]
    pub fixed: Vec<String>,

    /// Bound a numeric attribute: `path=min:max`, either side may be empty.
    #[arg(long = "range", value_name = "PATH=MIN:MAX")]
    pub ranges: Vec<String>,

    /// Restrict an attribute to a list: `path=a,b,c`.
    #[arg(long = "allow", value_name = "PATH=A,B")]
    pub allowlists: Vec<String>,
}

/// Arguments for `policy grant`.
#[derive(Debug, Args)]
pub struct GrantUseArgs {
    /// Policy id.
    pub policy_id: String,

    /// User to grant.
    #[arg(long)]
    pub user: Option<String>,

    /// Group to grant.
    #[arg(long)]
    pub group: Option<String>,

    /// Service principal to grant.
    #[arg(long)]
    pub service_principal: Option<String>,
}

/// Execute the policy command.
///
/// # Errors
///
/// Returns an error if a rule cannot be parsed or an API request fails.
pub async fn execute(args: PolicyArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let policies = config.workspace_client(&registry)?.cluster_policies();

    match args.action {
        PolicyAction::List => {
            #[derive(Tabled)]
            struct PolicyRow {
                #[tabled(rename = "ID")]
                id: String,
                #[tabled(rename = "Name")]
                name: String,
                #[tabled(rename = "Family")]
                family: String,
                #[tabled(rename = "Rules")]
                rules: usize,
            }

            let listed = policies.list(None, None).await?;
            match config.format {
                OutputFormat::Json => print_json(&listed)?,
                OutputFormat::Table => print_table(
                    listed
                        .iter()
                        .map(|p| PolicyRow {
                            id: p.policy_id.clone(),
                            name: p.name.clone(),
                            family: or_dash(p.policy_family_id.as_deref()),
                            rules: p.definition.len(),
                        })
                        .collect(),
                    "No policies found",
                ),
                OutputFormat::Text => {
                    if listed.is_empty() {
                        println!("No policies found");
                    }
                    for policy in &listed {
                        println!("  {} {}", policy.policy_id, policy.name.bold());
                    }
                }
            }
            Ok(())
        }
        PolicyAction::Create(args) => {
            let definition = parse_rules(&args)?;
            let policy = match &args.family {
                Some(family) => {
                    policies
                        .create_with_family(&args.name, family, definition, args.description.clone())
                        .await?
                }
                None => {
                    policies
                        .create(&args.name, definition, args.description.clone())
                        .await?
                }
            };
            match config.format {
                OutputFormat::Json => print_json(&policy)?,
                OutputFormat::Text | OutputFormat::Table => {
                    println!("{} policy {} ({})", "Created".green(), policy.name, policy.policy_id);
                }
            }
            Ok(())
        }
        PolicyAction::Grant(args) => {
            if args.user.is_none() && args.group.is_none() && args.service_principal.is_none() {
                anyhow::bail!("Pass at least one of --user, --group or --service-principal");
            }
            let policy = policies
                .get_by_id(&args.policy_id)
                .await?
                .with_context(|| format!("Policy {} not found", args.policy_id))?;
            let permissions = policy
                .grant_use(
                    args.user.as_deref(),
                    args.group.as_deref(),
                    args.service_principal.as_deref(),
                )
                .await?;
            match config.format {
                OutputFormat::Json => print_json(&permissions)?,
                OutputFormat::Text | OutputFormat::Table => {
                    println!(
                        "{} CAN_USE on {}; {} entries",
                        "Granted".green(),
                        policy.policy_id,
                        permissions.access_control_list.len()
                    );
                }
            }
            Ok(())
        }
    }
}

fn parse_rules(args: &CreatePolicyArgs) -> Result<PolicyDefinition> {
    let mut definition = PolicyDefinition::new();
    for rule in &args.fixed {
        let (path, value) = split_rule(rule)?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
        definition.insert(path.to_string(), PolicyElement::fixed(value));
    }
    for rule in &args.ranges {
        let (path, bounds) = split_rule(rule)?;
        let (min, max) = bounds
            .split_once(':')
            .with_context(|| format!("Range `{rule}` must look like path=min:max"))?;
        definition.insert(
            path.to_string(),
            PolicyElement::range(parse_bound(min)?, parse_bound(max)?),
        );
    }
    for rule in &args.allowlists {
        let (path, values) = split_rule(rule)?;
        definition.insert(
            path.to_string(),
            PolicyElement::allowlist(values.split(',').map(|v| Value::from(v.trim()))),
        );
    }
    Ok(definition)
}

fn split_rule(rule: &str) -> Result<(&str, &str)> {
    rule.split_once('=')
        .filter(|(path, _)| !path.is_empty())
        .with_context(|| format!("Rule `{rule}` must look like path=value"))
}

fn parse_bound(bound: &str) -> Result<Option<i64>> {
    let bound = bound.trim();
    if bound.is_empty() {
        return Ok(None);
    }
    bound
        .parse()
        .map(Some)
        .with_context(|| format!("Range bound `{bound}` is not an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_args(fixed: &[&str], ranges: &[&str], allowlists: &[&str]) -> CreatePolicyArgs {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        CreatePolicyArgs {
            name: "p".to_string(),
            description: None,
            family: None,
            fixed: owned(fixed),
            ranges: owned(ranges),
            allowlists: owned(allowlists),
        }
    }

    #[test]
    fn test_parse_rules() {
        let definition = parse_rules(&create_args(
            &["spark_version=13.3.x-scala2.12", "autotermination_minutes=30"],
            &["num_workers=:10"],
            &["node_type_id=i3.xlarge, i3.2xlarge"],
        ))
        .expect("rules");

        assert_eq!(
            definition["spark_version"],
            PolicyElement::fixed("13.3.x-scala2.12")
        );
        assert_eq!(definition["autotermination_minutes"], PolicyElement::fixed(30));
        assert_eq!(definition["num_workers"], PolicyElement::range(None, Some(10)));
        assert_eq!(
            definition["node_type_id"],
            PolicyElement::allowlist([Value::from("i3.xlarge"), Value::from("i3.2xlarge")])
        );
    }

    #[test]
    fn test_malformed_rules_are_rejected() {
        assert!(parse_rules(&create_args(&["novalue"], &[], &[])).is_err());
        assert!(parse_rules(&create_args(&[], &["x=1-2"], &[])).is_err());
        assert!(parse_rules(&create_args(&[], &["x=a:"], &[])).is_err());
    }
}
