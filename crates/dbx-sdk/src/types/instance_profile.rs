use serde::{Deserialize, Serialize};

/// An instance profile registered in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceProfile {
    /// Instance profile ARN; also the identity.
    pub instance_profile_arn: String,
    /// Backing IAM role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_role_arn: Option<String>,
    /// Whether the profile is a meta instance profile.
    #[serde(default)]
    pub is_meta_instance_profile: bool,
}

impl InstanceProfile {
    /// True when `reference` is this profile's ARN or its trailing name.
    #[must_use]
    pub fn matches(&self, reference: &str) -> bool {
        self.instance_profile_arn == reference
            || self
                .instance_profile_arn
                .strip_suffix(reference)
                .is_some_and(|prefix| prefix.ends_with('/'))
    }
}

/// Body of an instance profile registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateInstanceProfile {
    /// Instance profile ARN.
    pub instance_profile_arn: String,
    /// Backing IAM role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_role_arn: Option<String>,
    /// Whether the profile is a meta instance profile.
    pub is_meta_instance_profile: bool,
    /// Skip the platform's validation of the profile.
    pub skip_validation: bool,
}

impl CreateInstanceProfile {
    /// Registers `instance_profile_arn` with validation and no IAM role.
    #[must_use]
    pub fn new(instance_profile_arn: impl Into<String>) -> Self {
        Self {
            instance_profile_arn: instance_profile_arn.into(),
            iam_role_arn: None,
            is_meta_instance_profile: false,
            skip_validation: false,
        }
    }

    pub(crate) fn to_record(&self) -> InstanceProfile {
        InstanceProfile {
            instance_profile_arn: self.instance_profile_arn.clone(),
            iam_role_arn: self.iam_role_arn.clone(),
            is_meta_instance_profile: self.is_meta_instance_profile,
        }
    }
}

/// Body of an instance profile edit; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditInstanceProfile {
    /// New IAM role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_role_arn: Option<String>,
    /// New meta flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_meta_instance_profile: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_full_arn_or_trailing_name() {
        let profile = InstanceProfile {
            instance_profile_arn: "arn:aws:iam::123:instance-profile/data-eng".to_string(),
            iam_role_arn: None,
            is_meta_instance_profile: false,
        };

        assert!(profile.matches("arn:aws:iam::123:instance-profile/data-eng"));
        assert!(profile.matches("data-eng"));
        assert!(!profile.matches("eng"));
        assert!(!profile.matches("other"));
    }
}
