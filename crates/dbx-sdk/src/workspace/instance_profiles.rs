use async_trait::async_trait;
use serde::Serialize;

use super::WorkspaceClient;
use crate::dispatch::DeletePolicy;
use crate::error::{Error, Result};
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::types::{CreateInstanceProfile, EditInstanceProfile, InstanceProfile};

const PROFILES_PATH: &str = "api/2.0/instance-profiles";

#[derive(Serialize)]
struct EditBody<'a> {
    instance_profile_arn: &'a str,
    #[serde(flatten)]
    changes: &'a EditInstanceProfile,
}

#[derive(Serialize)]
struct RemoveBody<'a> {
    instance_profile_arn: &'a str,
}

/// Client for `api/2.0/instance-profiles`.
#[derive(Debug, Clone)]
pub struct InstanceProfilesClient {
    workspace: WorkspaceClient,
}

impl InstanceProfilesClient {
    pub(crate) fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }

    fn path(action: &str) -> String {
        format!("{PROFILES_PATH}/{action}")
    }

    /// Lists registered instance profiles.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<InstanceProfile>>> {
        let records = self
            .workspace
            .rest()
            .get(Self::path("list"))
            .await?
            .into_list(Some("instance_profiles"))?;
        Ok(bind_all(records, self))
    }

    /// Finds a profile by full ARN or by the name after the last `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get(&self, arn_or_name: &str) -> Result<Option<Bound<InstanceProfile>>> {
        Ok(self
            .fetch(&arn_or_name.to_string())
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Registers an instance profile. The service only acknowledges, so the
    /// returned record echoes the request.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn create(&self, request: &CreateInstanceProfile) -> Result<Bound<InstanceProfile>> {
        self.workspace
            .rest()
            .post(Self::path("add"), request)
            .await?
            .expect_status(200)?;
        tracing::info!(arn = %request.instance_profile_arn, "registered instance profile");
        Ok(Bound::new(request.to_record(), self.clone()))
    }

    /// Edits a profile and reads it back.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service acknowledges the edit and the
    /// profile is still listed.
    pub async fn update(
        &self,
        instance_profile_arn: &str,
        changes: &EditInstanceProfile,
    ) -> Result<Bound<InstanceProfile>> {
        let response = self
            .workspace
            .rest()
            .post(
                Self::path("edit"),
                &EditBody {
                    instance_profile_arn,
                    changes,
                },
            )
            .await?;
        response.expect_status(200)?;
        self.get(instance_profile_arn)
            .await?
            .ok_or_else(|| Error::resource_gone(InstanceProfile::KIND, instance_profile_arn))
    }

    /// Removes a profile from the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete(&self, instance_profile_arn: &str) -> Result<()> {
        let response = self
            .workspace
            .rest()
            .post(
                Self::path("remove"),
                &RemoveBody {
                    instance_profile_arn,
                },
            )
            .await?;
        DeletePolicy::Strict.check(response, InstanceProfile::KIND, instance_profile_arn)
    }
}

impl Resource for InstanceProfile {
    type Id = String;
    type Client = InstanceProfilesClient;
    const KIND: &'static str = "instance profile";

    fn id(&self) -> String {
        self.instance_profile_arn.clone()
    }
}

#[async_trait]
impl ResourceOps<InstanceProfile> for InstanceProfilesClient {
    async fn fetch(&self, id: &String) -> Result<Option<InstanceProfile>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(Bound::into_inner)
            .find(|profile| profile.matches(id)))
    }
}

#[async_trait]
impl RemoveOps<InstanceProfile> for InstanceProfilesClient {
    async fn remove(&self, id: &String) -> Result<()> {
        self.delete(id).await
    }
}

impl Bound<InstanceProfile> {
    /// Applies `changes` and replaces the local record with the service's state.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit is rejected.
    pub async fn update(&mut self, changes: &EditInstanceProfile) -> Result<()> {
        let updated = self
            .client()
            .update(&self.instance_profile_arn, changes)
            .await?;
        self.set_record(updated.into_inner());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_body_flattens_changes() {
        let changes = EditInstanceProfile {
            is_meta_instance_profile: Some(true),
            ..EditInstanceProfile::default()
        };
        let body = serde_json::to_value(EditBody {
            instance_profile_arn: "arn:x",
            changes: &changes,
        })
        .expect("encode");
        assert_eq!(
            body,
            serde_json::json!({"instance_profile_arn": "arn:x", "is_meta_instance_profile": true})
        );
    }
}
