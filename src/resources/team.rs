// src/resources/team.rs

//! `dependencytrack_team`

use std::sync::Arc;

use async_trait::async_trait;

use super::{ReadOutcome, Resource, Warning, fetch_direct, found_or_not_found};
use crate::client::{DependencyTrackApi, Team};
use crate::error::{AppError, Result};
use crate::models::TeamState;
use crate::schema::{Attribute, Schema};
use crate::utils::{parse_uuid, require_uuid};

pub struct TeamResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl TeamResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

fn to_state(team: &Team) -> TeamState {
    TeamState {
        id: Some(team.uuid.to_string()),
        name: team.name.clone(),
        permissions: team.permissions.iter().map(|p| p.name.clone()).collect(),
    }
}

#[async_trait]
impl Resource for TeamResource {
    const TYPE_NAME: &'static str = "dependencytrack_team";

    type State = TeamState;

    fn schema(&self) -> Schema {
        Schema::new("Manages a team.")
            .attribute(Attribute::computed("id", "UUID of the team"))
            .attribute(Attribute::required("name", "Name of the team"))
            .attribute(Attribute::computed(
                "permissions",
                "Permissions granted to the team",
            ))
    }

    async fn create(&self, plan: TeamState) -> Result<TeamState> {
        let request = Team {
            name: plan.name,
            ..Team::default()
        };
        let team = self
            .client
            .create_team(&request)
            .await
            .map_err(|e| AppError::client("create team", e))?;

        log::debug!("Created team {} ({})", team.name, team.uuid);
        Ok(to_state(&team))
    }

    async fn read(&self, state: TeamState) -> Result<ReadOutcome<TeamState>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        let team = fetch_direct("read team", self.client.get_team(uuid)).await?;
        Ok(team.as_ref().map(to_state).into())
    }

    async fn update(&self, plan: TeamState, prior: TeamState) -> Result<TeamState> {
        let uuid = require_uuid(prior.id.as_deref(), "id")?;
        let request = Team {
            uuid,
            name: plan.name,
            ..Team::default()
        };
        let team = self
            .client
            .update_team(&request)
            .await
            .map_err(|e| AppError::client("update team", e))?;
        Ok(to_state(&team))
    }

    async fn delete(&self, state: TeamState) -> Result<Vec<Warning>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        let request = Team {
            uuid,
            name: state.name,
            ..Team::default()
        };
        self.client
            .delete_team(&request)
            .await
            .map_err(|e| AppError::client("delete team", e))?;
        Ok(Vec::new())
    }

    async fn import(&self, id: &str) -> Result<TeamState> {
        let uuid = parse_uuid(id, "id")?;
        let seed = TeamState {
            id: Some(uuid.to_string()),
            ..TeamState::default()
        };
        found_or_not_found(self.read(seed).await?, "Team", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApi;

    fn plan(name: &str) -> TeamState {
        TeamState {
            name: name.to_string(),
            ..TeamState::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let api = FakeApi::new();
        let resource = TeamResource::new(api.clone());

        let created = resource.create(plan("Developers")).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.name, "Developers");
        assert!(created.permissions.is_empty());

        let read = resource.read(created.clone()).await.unwrap();
        assert_eq!(read, ReadOutcome::Found(created));
    }

    #[tokio::test]
    async fn test_read_reports_permissions() {
        let api = FakeApi::new();
        let uuid = api.seed_team("Auditors");
        api.add_permission_to_team("VIEW_PORTFOLIO", uuid).await.unwrap();
        let resource = TeamResource::new(api.clone());

        let state = resource.import(&uuid.to_string()).await.unwrap();
        assert_eq!(state.name, "Auditors");
        assert!(state.permissions.contains("VIEW_PORTFOLIO"));
    }

    #[tokio::test]
    async fn test_update_renames() {
        let api = FakeApi::new();
        let resource = TeamResource::new(api.clone());
        let created = resource.create(plan("Old")).await.unwrap();

        let updated = resource
            .update(plan("New"), created.clone())
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
    }

    #[tokio::test]
    async fn test_delete_then_read_is_gone() {
        let api = FakeApi::new();
        let resource = TeamResource::new(api.clone());
        let created = resource.create(plan("Temp")).await.unwrap();

        let warnings = resource.delete(created.clone()).await.unwrap();
        assert!(warnings.is_empty());
        assert!(resource.read(created).await.unwrap().is_gone());
    }

    #[tokio::test]
    async fn test_read_server_error_is_fatal() {
        let api = FakeApi::new();
        let uuid = api.seed_team("Team");
        api.fail_once("get_team", 500);
        let resource = TeamResource::new(api.clone());

        let state = TeamState {
            id: Some(uuid.to_string()),
            ..plan("Team")
        };
        let err = resource.read(state).await.unwrap_err();
        assert!(err.to_string().starts_with("Unable to read team, got error"));
    }

    #[tokio::test]
    async fn test_import_missing_is_error() {
        let api = FakeApi::new();
        let resource = TeamResource::new(api.clone());

        let err = resource
            .import("00000000-0000-0000-0000-00000000ffff")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = resource.import("nope").await.unwrap_err();
        assert_eq!(err.attribute_name(), Some("id"));
    }
}
