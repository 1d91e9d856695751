// src/resources/team_permission.rs

//! `dependencytrack_team_permission`

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ReadOutcome, Resource, Warning, replace_relation, scan};
use crate::client::DependencyTrackApi;
use crate::error::{AppError, Result};
use crate::models::TeamPermissionState;
use crate::schema::{Attribute, Schema};
use crate::utils::{id, parse_uuid};

const ID_FORMAT: &str = "team_id/permission_name";

pub struct TeamPermissionResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl TeamPermissionResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }

    async fn grant(&self, team: Uuid, name: &str) -> Result<()> {
        match self.client.add_permission_to_team(name, team).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_modified() => Err(AppError::Conflict(
                "The permission already existed on the team".to_string(),
            )),
            Err(e) if e.is_not_found() => Err(AppError::not_found(format!(
                "The permission '{name}' not found"
            ))),
            Err(e) => Err(AppError::client("create permission", e)),
        }
    }

    async fn revoke(&self, team: Uuid, name: &str) -> Result<()> {
        self.client
            .remove_permission_from_team(name, team)
            .await
            .map(|_| ())
            .map_err(|e| AppError::client("delete permission", e))
    }
}

fn to_state(team: Uuid, name: &str) -> TeamPermissionState {
    let team_id = team.to_string();
    TeamPermissionState {
        id: Some(id::encode(&[&team_id, name])),
        team_id,
        name: name.to_string(),
    }
}

#[async_trait]
impl Resource for TeamPermissionResource {
    const TYPE_NAME: &'static str = "dependencytrack_team_permission";

    type State = TeamPermissionState;

    fn schema(&self) -> Schema {
        Schema::new("Grants a permission to a team.")
            .attribute(Attribute::computed(
                "id",
                "Synthetic ID in the format team_id/permission_name",
            ))
            .attribute(Attribute::required("team_id", "UUID of the team"))
            .attribute(Attribute::required(
                "name",
                "Name of the permission, e.g. VIEW_PORTFOLIO",
            ))
    }

    async fn create(&self, plan: TeamPermissionState) -> Result<TeamPermissionState> {
        let team = parse_uuid(&plan.team_id, "team_id")?;
        self.grant(team, &plan.name).await?;
        Ok(to_state(team, &plan.name))
    }

    async fn read(&self, state: TeamPermissionState) -> Result<ReadOutcome<TeamPermissionState>> {
        let team = parse_uuid(&state.team_id, "team_id")?;
        let permissions = async {
            self.client
                .get_team(team)
                .await
                .map(|t| t.permissions)
        };
        let found = scan("read team", permissions, |p| p.name == state.name).await?;
        Ok(found.map(|p| to_state(team, &p.name)).into())
    }

    async fn update(
        &self,
        plan: TeamPermissionState,
        prior: TeamPermissionState,
    ) -> Result<TeamPermissionState> {
        let new_team = parse_uuid(&plan.team_id, "team_id")?;
        let old_team = parse_uuid(&prior.team_id, "team_id")?;
        if new_team == old_team && plan.name == prior.name {
            return Ok(to_state(new_team, &plan.name));
        }

        let new_id = id::encode(&[&new_team.to_string(), &plan.name]);
        let old_id = id::encode(&[&old_team.to_string(), &prior.name]);
        replace_relation(
            &format!("permission {new_id}"),
            &format!("permission {old_id}"),
            self.grant(new_team, &plan.name),
            self.revoke(old_team, &prior.name),
            self.revoke(new_team, &plan.name),
        )
        .await?;

        Ok(to_state(new_team, &plan.name))
    }

    async fn delete(&self, state: TeamPermissionState) -> Result<Vec<Warning>> {
        let team = parse_uuid(&state.team_id, "team_id")?;
        self.revoke(team, &state.name).await?;
        Ok(Vec::new())
    }

    async fn import(&self, import_id: &str) -> Result<TeamPermissionState> {
        let [team_id, name] = id::decode::<2>(import_id, ID_FORMAT)?;
        let team = parse_uuid(team_id, "team_id")?;
        if name.is_empty() {
            return Err(AppError::attribute("name", "permission name must not be empty"));
        }
        Ok(to_state(team, name))
    }
}
