use std::fmt;

use serde::{Deserialize, Serialize};

/// The identity an access control entry applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    /// A user, by user name.
    User(String),
    /// A group, by group name.
    Group(String),
    /// A service principal, by application name.
    ServicePrincipal(String),
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(name) => write!(f, "user:{name}"),
            Self::Group(name) => write!(f, "group:{name}"),
            Self::ServicePrincipal(name) => write!(f, "service_principal:{name}"),
        }
    }
}

/// One effective permission of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Level such as `CAN_USE` or `CAN_MANAGE`.
    pub permission_level: String,
    /// Whether the permission is inherited from a parent object.
    #[serde(default)]
    pub inherited: bool,
    /// Objects the permission is inherited from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from_object: Option<Vec<String>>,
}

/// Access control entry of one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    /// Set for user entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Set for group entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Set for service principal entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal_name: Option<String>,
    /// Effective permissions.
    #[serde(default)]
    pub all_permissions: Vec<Permission>,
}

impl AccessControl {
    /// Returns the principal of this entry.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        if let Some(name) = &self.user_name {
            Some(Principal::User(name.clone()))
        } else if let Some(name) = &self.group_name {
            Some(Principal::Group(name.clone()))
        } else {
            self.service_principal_name
                .as_ref()
                .map(|name| Principal::ServicePrincipal(name.clone()))
        }
    }

    /// Returns true when the principal holds `level`, directly or inherited.
    #[must_use]
    pub fn has_level(&self, level: &str) -> bool {
        self.all_permissions
            .iter()
            .any(|p| p.permission_level == level)
    }
}

/// The access control list of a securable object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Object path, for example `/cluster-policies/ABC`.
    pub object_id: String,
    /// Object type, for example `cluster-policy`.
    pub object_type: String,
    /// Entries per principal.
    #[serde(default)]
    pub access_control_list: Vec<AccessControl>,
}

impl Permissions {
    /// Splits `object_id` into the path type and id used by the permissions
    /// endpoints: `/sql/warehouses/w1` becomes `("sql/warehouses", "w1")`.
    #[must_use]
    pub fn object_path(&self) -> (&str, &str) {
        split_object_id(&self.object_id)
    }

    /// Returns the entry for `principal`, if present.
    #[must_use]
    pub fn entry_for(&self, principal: &Principal) -> Option<&AccessControl> {
        self.access_control_list
            .iter()
            .find(|entry| entry.principal().as_ref() == Some(principal))
    }
}

pub(crate) fn split_object_id(object_id: &str) -> (&str, &str) {
    match object_id.rsplit_once('/') {
        Some((object_type, id)) => (object_type.trim_start_matches('/'), id),
        None => ("", object_id),
    }
}

/// One assignable permission level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevel {
    /// Level name.
    pub permission_level: String,
    /// What the level allows.
    #[serde(default)]
    pub description: String,
}

/// Assignable levels of an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevels {
    /// The levels.
    #[serde(default)]
    pub permission_levels: Vec<PermissionLevel>,
}

/// A permission to grant: one principal and one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPermission {
    /// Set for user grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Set for group grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Set for service principal grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal_name: Option<String>,
    /// Level to grant.
    pub permission_level: String,
}

impl ObjectPermission {
    /// Grants `level` to `principal`.
    #[must_use]
    pub fn new(principal: Principal, level: impl Into<String>) -> Self {
        let mut permission = Self {
            user_name: None,
            group_name: None,
            service_principal_name: None,
            permission_level: level.into(),
        };
        match principal {
            Principal::User(name) => permission.user_name = Some(name),
            Principal::Group(name) => permission.group_name = Some(name),
            Principal::ServicePrincipal(name) => permission.service_principal_name = Some(name),
        }
        permission
    }

    /// Grants `level` to a user.
    #[must_use]
    pub fn user(user_name: impl Into<String>, level: impl Into<String>) -> Self {
        Self::new(Principal::User(user_name.into()), level)
    }

    /// Grants `level` to a group.
    #[must_use]
    pub fn group(group_name: impl Into<String>, level: impl Into<String>) -> Self {
        Self::new(Principal::Group(group_name.into()), level)
    }

    /// Grants `level` to a service principal.
    #[must_use]
    pub fn service_principal(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self::new(Principal::ServicePrincipal(name.into()), level)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn permissions(object_id: &str) -> Permissions {
        Permissions {
            object_id: object_id.to_string(),
            object_type: "x".to_string(),
            access_control_list: Vec::new(),
        }
    }

    #[test]
    fn object_path_splits_at_last_slash() {
        assert_eq!(
            permissions("/cluster-policies/ABC").object_path(),
            ("cluster-policies", "ABC")
        );
        assert_eq!(
            permissions("/sql/warehouses/w1").object_path(),
            ("sql/warehouses", "w1")
        );
        assert_eq!(
            permissions("/authorization/tokens").object_path(),
            ("authorization", "tokens")
        );
    }

    #[test]
    fn object_permission_serializes_one_principal() {
        assert_eq!(
            serde_json::to_value(ObjectPermission::group("admins", "CAN_USE")).expect("encode"),
            json!({"group_name": "admins", "permission_level": "CAN_USE"})
        );
    }

    #[test]
    fn access_control_reports_principal_and_levels() {
        let entry: AccessControl = serde_json::from_value(json!({
            "service_principal_name": "etl",
            "all_permissions": [{"permission_level": "CAN_USE", "inherited": false}]
        }))
        .expect("decode");

        assert_eq!(
            entry.principal(),
            Some(Principal::ServicePrincipal("etl".to_string()))
        );
        assert!(entry.has_level("CAN_USE"));
        assert!(!entry.has_level("CAN_MANAGE"));
    }
}
