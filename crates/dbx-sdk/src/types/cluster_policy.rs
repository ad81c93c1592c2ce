//! Cluster policy records.
//!
//! Policy definitions travel as JSON documents embedded in string fields;
//! see [`crate::embedded_json`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One rule of a cluster policy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyElement {
    /// Rule kind: `fixed`, `forbidden`, `allowlist`, `blocklist`, `regex`,
    /// `range` or `unlimited`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Fixed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Hide the attribute in the cluster UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Default applied when the user sets nothing.
    #[serde(
        rename = "defaultValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    /// Whether the attribute may be omitted.
    #[serde(rename = "isOptional", default, skip_serializing_if = "Option::is_none")]
    pub is_optional: Option<bool>,
    /// Lower bound for `range` rules.
    #[serde(rename = "minValue", default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    /// Upper bound for `range` rules.
    #[serde(rename = "maxValue", default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    /// Allowed or blocked values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    /// Pattern for `regex` rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl PolicyElement {
    /// Creates a rule of `kind` with no constraints set.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            hidden: None,
            default_value: None,
            is_optional: None,
            min_value: None,
            max_value: None,
            values: None,
            pattern: None,
        }
    }

    /// A `fixed` rule pinning the attribute to `value`.
    #[must_use]
    pub fn fixed(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new("fixed")
        }
    }

    /// A `range` rule.
    #[must_use]
    pub fn range(min_value: Option<i64>, max_value: Option<i64>) -> Self {
        Self {
            min_value,
            max_value,
            ..Self::new("range")
        }
    }

    /// An `allowlist` rule.
    #[must_use]
    pub fn allowlist(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: Some(values.into_iter().collect()),
            ..Self::new("allowlist")
        }
    }

    /// Marks the attribute hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = Some(true);
        self
    }
}

/// Attribute path to rule.
pub type PolicyDefinition = BTreeMap<String, PolicyElement>;

/// A cluster policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPolicy {
    /// Identifier.
    pub policy_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The rules.
    #[serde(default, with = "crate::embedded_json")]
    pub definition: PolicyDefinition,
    /// Whether this is a built-in default policy.
    #[serde(default)]
    pub is_default: bool,
    /// Policy family this policy derives from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_family_id: Option<String>,
    /// Family version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_family_version: Option<i64>,
    /// Overrides applied on top of the family definition.
    #[serde(
        default,
        with = "crate::embedded_json::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub policy_family_definition_overrides: Option<PolicyDefinition>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_user_name: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at_timestamp: i64,
}

/// Body of a cluster policy create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateClusterPolicy {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Policy family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_family_id: Option<String>,
    /// The rules.
    #[serde(
        with = "crate::embedded_json::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub definition: Option<PolicyDefinition>,
    /// Overrides on top of the family definition.
    #[serde(
        with = "crate::embedded_json::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub policy_family_definition_overrides: Option<PolicyDefinition>,
}

impl CreateClusterPolicy {
    /// A standalone policy.
    #[must_use]
    pub fn standalone(
        name: impl Into<String>,
        definition: PolicyDefinition,
        description: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            policy_family_id: None,
            definition: Some(definition),
            policy_family_definition_overrides: None,
        }
    }

    /// A policy derived from a family.
    #[must_use]
    pub fn with_family(
        name: impl Into<String>,
        policy_family_id: impl Into<String>,
        overrides: PolicyDefinition,
        description: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            policy_family_id: Some(policy_family_id.into()),
            definition: None,
            policy_family_definition_overrides: Some(overrides),
        }
    }
}

/// Body of a cluster policy edit request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditClusterPolicy {
    /// Policy to edit.
    pub policy_id: String,
    /// Display name; always required by the edit endpoint.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement rules.
    #[serde(
        with = "crate::embedded_json::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub definition: Option<PolicyDefinition>,
    /// Replacement family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_family_id: Option<String>,
    /// Replacement family overrides.
    #[serde(
        with = "crate::embedded_json::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub policy_family_definition_overrides: Option<PolicyDefinition>,
}

/// Changes applied by a bound policy update. Unset fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterPolicyChanges {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New rules; ignored for family-derived policies.
    pub definition: Option<PolicyDefinition>,
    /// New family; only for family-derived policies.
    pub policy_family_id: Option<String>,
    /// New overrides; only for family-derived policies.
    pub policy_family_definition_overrides: Option<PolicyDefinition>,
}

impl ClusterPolicyChanges {
    /// Builds the edit request that applies these changes to `policy`.
    ///
    /// Standalone policies resend their definition; family-derived policies
    /// resend their family id and overrides instead.
    #[must_use]
    pub fn edit_request(self, policy: &ClusterPolicy) -> EditClusterPolicy {
        let name = self.name.unwrap_or_else(|| policy.name.clone());
        let description = self.description.or_else(|| policy.description.clone());
        match &policy.policy_family_id {
            None => EditClusterPolicy {
                policy_id: policy.policy_id.clone(),
                name,
                description,
                definition: Some(
                    self.definition
                        .unwrap_or_else(|| policy.definition.clone()),
                ),
                policy_family_id: None,
                policy_family_definition_overrides: None,
            },
            Some(family) => EditClusterPolicy {
                policy_id: policy.policy_id.clone(),
                name,
                description,
                definition: None,
                policy_family_id: Some(self.policy_family_id.unwrap_or_else(|| family.clone())),
                policy_family_definition_overrides: self
                    .policy_family_definition_overrides
                    .or_else(|| policy.policy_family_definition_overrides.clone()),
            },
        }
    }
}

/// Sort direction for policy listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Sort key for policy listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortColumn {
    /// By name.
    PolicyName,
    /// By creation time.
    PolicyCreationTime,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn standalone() -> ClusterPolicy {
        ClusterPolicy {
            policy_id: "ABC".to_string(),
            name: "p".to_string(),
            description: Some("d".to_string()),
            definition: BTreeMap::from([("k".to_string(), PolicyElement::fixed("v"))]),
            is_default: false,
            policy_family_id: None,
            policy_family_version: None,
            policy_family_definition_overrides: None,
            creator_user_name: None,
            created_at_timestamp: 0,
        }
    }

    #[test]
    fn definition_is_sent_as_spaced_json_string() {
        let body = serde_json::to_value(CreateClusterPolicy::standalone(
            "p",
            BTreeMap::from([("k".to_string(), PolicyElement::fixed("v"))]),
            None,
        ))
        .expect("encode");

        assert_eq!(
            body,
            json!({"name": "p", "definition": r#"{"k": {"type": "fixed", "value": "v"}}"#})
        );
    }

    #[test]
    fn policy_parses_embedded_definition() {
        let policy: ClusterPolicy = serde_json::from_value(json!({
            "policy_id": "ABC",
            "name": "p",
            "definition": "{\"spark_version\": {\"type\": \"range\", \"maxValue\": 10}}",
            "created_at_timestamp": 1
        }))
        .expect("decode");

        assert_eq!(
            policy.definition["spark_version"],
            PolicyElement::range(None, Some(10))
        );
        assert!(policy.policy_family_definition_overrides.is_none());
    }

    #[test]
    fn standalone_changes_keep_current_definition() {
        let edit = ClusterPolicyChanges {
            name: Some("renamed".to_string()),
            ..ClusterPolicyChanges::default()
        }
        .edit_request(&standalone());

        assert_eq!(edit.name, "renamed");
        assert_eq!(edit.description.as_deref(), Some("d"));
        assert_eq!(edit.definition, Some(standalone().definition));
        assert!(edit.policy_family_id.is_none());
    }

    #[test]
    fn family_changes_resend_family_and_overrides() {
        let mut policy = standalone();
        policy.policy_family_id = Some("personal-vm".to_string());
        policy.policy_family_definition_overrides = Some(BTreeMap::new());

        let overrides = BTreeMap::from([("x".to_string(), PolicyElement::new("forbidden"))]);
        let edit = ClusterPolicyChanges {
            policy_family_definition_overrides: Some(overrides.clone()),
            definition: Some(BTreeMap::new()),
            ..ClusterPolicyChanges::default()
        }
        .edit_request(&policy);

        assert!(edit.definition.is_none());
        assert_eq!(edit.policy_family_id.as_deref(), Some("personal-vm"));
        assert_eq!(edit.policy_family_definition_overrides, Some(overrides));
    }

    #[test]
    fn sort_fields_use_wire_names() {
        assert_eq!(serde_json::to_value(SortOrder::Desc).expect("encode"), json!("DESC"));
        assert_eq!(
            serde_json::to_value(SortColumn::PolicyCreationTime).expect("encode"),
            json!("POLICY_CREATION_TIME")
        );
    }
}
