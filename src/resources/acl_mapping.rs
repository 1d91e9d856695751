// src/resources/acl_mapping.rs

//! `dependencytrack_acl_mapping`: grants a team access to a project.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ReadOutcome, Resource, Warning, replace_relation, scan};
use crate::client::{AclMappingRequest, DependencyTrackApi, fetch_all};
use crate::error::{AppError, Result};
use crate::models::AclMappingState;
use crate::schema::{Attribute, Schema};
use crate::utils::{id, parse_uuid};

const ID_FORMAT: &str = "team_id/project_id";

pub struct AclMappingResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl AclMappingResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }

    async fn add(&self, team: Uuid, project: Uuid) -> Result<()> {
        let request = AclMappingRequest { team, project };
        self.client
            .add_acl_mapping(&request)
            .await
            .map_err(|e| match e {
                e if e.is_not_modified() => {
                    AppError::Conflict("The ACL mapping already existed".to_string())
                }
                e => AppError::client("create ACL mapping", e),
            })
    }

    async fn remove(&self, team: Uuid, project: Uuid) -> Result<()> {
        self.client
            .remove_acl_mapping(team, project)
            .await
            .map_err(|e| AppError::client("delete ACL mapping", e))
    }
}

fn keys(state: &AclMappingState) -> Result<(Uuid, Uuid)> {
    Ok((
        parse_uuid(&state.team_id, "team_id")?,
        parse_uuid(&state.project_id, "project_id")?,
    ))
}

fn to_state(team: Uuid, project: Uuid) -> AclMappingState {
    let (team_id, project_id) = (team.to_string(), project.to_string());
    AclMappingState {
        id: Some(id::encode(&[&team_id, &project_id])),
        team_id,
        project_id,
    }
}

#[async_trait]
impl Resource for AclMappingResource {
    const TYPE_NAME: &'static str = "dependencytrack_acl_mapping";

    type State = AclMappingState;

    fn schema(&self) -> Schema {
        Schema::new("Manages an ACL mapping between a team and a project.")
            .attribute(Attribute::computed("id", "Synthetic ID in the format team_id/project_id"))
            .attribute(Attribute::required("team_id", "UUID of the team"))
            .attribute(Attribute::required("project_id", "UUID of the project"))
    }

    async fn create(&self, plan: AclMappingState) -> Result<AclMappingState> {
        let (team, project) = keys(&plan)?;
        self.add(team, project).await?;
        log::debug!("Mapped project {project} to team {team}");
        Ok(to_state(team, project))
    }

    async fn read(&self, state: AclMappingState) -> Result<ReadOutcome<AclMappingState>> {
        let (team, project) = keys(&state)?;
        let projects = fetch_all(|page| self.client.list_acl_projects(team, page));
        let found = scan("read ACL mapping", projects, |p| p.uuid == project).await?;
        Ok(found.map(|_| to_state(team, project)).into())
    }

    async fn update(
        &self,
        plan: AclMappingState,
        prior: AclMappingState,
    ) -> Result<AclMappingState> {
        let (new_team, new_project) = keys(&plan)?;
        let (old_team, old_project) = keys(&prior)?;
        if (new_team, new_project) == (old_team, old_project) {
            return Ok(to_state(new_team, new_project));
        }

        let new_id = id::encode(&[&new_team.to_string(), &new_project.to_string()]);
        let old_id = id::encode(&[&old_team.to_string(), &old_project.to_string()]);
        replace_relation(
            &format!("ACL mapping {new_id}"),
            &format!("ACL mapping {old_id}"),
            self.add(new_team, new_project),
            self.remove(old_team, old_project),
            self.remove(new_team, new_project),
        )
        .await?;

        Ok(to_state(new_team, new_project))
    }

    async fn delete(&self, state: AclMappingState) -> Result<Vec<Warning>> {
        let (team, project) = keys(&state)?;
        self.remove(team, project).await?;
        Ok(Vec::new())
    }

    async fn import(&self, import_id: &str) -> Result<AclMappingState> {
        let [team_id, project_id] = id::decode::<2>(import_id, ID_FORMAT)?;
        let team = parse_uuid(team_id, "team_id")?;
        let project = parse_uuid(project_id, "project_id")?;
        Ok(to_state(team, project))
    }
}
