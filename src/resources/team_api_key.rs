// src/resources/team_api_key.rs

//! `dependencytrack_team_api_key`
//!
//! Keys are addressed by their public id. Keys created before public ids
//! existed are flagged `legacy` and can only be matched by their value.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ReadOutcome, Resource, Warning, scan};
use crate::client::{ApiKey, DependencyTrackApi, fetch_all};
use crate::error::{AppError, Result};
use crate::models::TeamApiKeyState;
use crate::schema::{Attribute, Schema};
use crate::utils::{id, non_empty, parse_uuid};

const ID_FORMAT: &str = "team_id/public_id";

pub struct TeamApiKeyResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl TeamApiKeyResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

fn find_key<'a>(keys: &'a [ApiKey], state: &TeamApiKeyState) -> Option<&'a ApiKey> {
    let by_public_id = state
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .and_then(|id| keys.iter().find(|k| !k.legacy && k.public_id == id));

    by_public_id.or_else(|| {
        let value = state.value.as_deref().filter(|v| !v.is_empty())?;
        keys.iter().find(|k| k.legacy && k.key == value)
    })
}

#[async_trait]
impl Resource for TeamApiKeyResource {
    const TYPE_NAME: &'static str = "dependencytrack_team_api_key";

    type State = TeamApiKeyState;

    fn schema(&self) -> Schema {
        Schema::new("Manages an API key of a team.")
            .attribute(Attribute::computed("id", "Public ID of the API key"))
            .attribute(Attribute::required("team_id", "UUID of the team").requires_replace())
            .attribute(Attribute::computed("value", "Value of the API key").sensitive())
            .attribute(Attribute::optional("comment", "Comment on the API key").requires_replace())
            .attribute(Attribute::computed(
                "legacy",
                "Whether the key predates public IDs",
            ))
    }

    async fn create(&self, plan: TeamApiKeyState) -> Result<TeamApiKeyState> {
        let team = parse_uuid(&plan.team_id, "team_id")?;
        let key = self
            .client
            .generate_api_key(team)
            .await
            .map_err(|e| AppError::client("create API key", e))?;

        let comment = non_empty(plan.comment);
        if let Some(comment) = &comment {
            self.client
                .update_api_key_comment(&key.public_id, comment)
                .await
                .map_err(|e| AppError::client("update API key comment", e))?;
        }

        log::debug!("Generated API key {} for team {team}", key.public_id);
        Ok(TeamApiKeyState {
            id: Some(key.public_id),
            team_id: team.to_string(),
            value: Some(key.key),
            comment,
            legacy: key.legacy,
        })
    }

    async fn read(&self, state: TeamApiKeyState) -> Result<ReadOutcome<TeamApiKeyState>> {
        let team = parse_uuid(&state.team_id, "team_id")?;
        // Keys are only listed as part of the team collection.
        let teams = fetch_all(|page| self.client.list_teams(page));
        let Some(owner) = scan("read team", teams, |t| t.uuid == team).await? else {
            return Ok(ReadOutcome::Gone);
        };

        let Some(key) = find_key(&owner.api_keys, &state) else {
            return Ok(ReadOutcome::Gone);
        };
        Ok(ReadOutcome::Found(TeamApiKeyState {
            id: Some(key.public_id.clone()),
            team_id: team.to_string(),
            comment: non_empty(key.comment.clone()),
            legacy: key.legacy,
            value: state.value,
        }))
    }

    async fn update(
        &self,
        _plan: TeamApiKeyState,
        _prior: TeamApiKeyState,
    ) -> Result<TeamApiKeyState> {
        Err(AppError::Immutable("Team API key".to_string()))
    }

    async fn delete(&self, state: TeamApiKeyState) -> Result<Vec<Warning>> {
        let id_or_key = if state.legacy {
            state.value.as_deref()
        } else {
            state.id.as_deref()
        };
        let Some(id_or_key) = id_or_key.filter(|v| !v.is_empty()) else {
            return Err(AppError::attribute(
                if state.legacy { "value" } else { "id" },
                "value is unknown",
            ));
        };

        self.client
            .delete_api_key(id_or_key)
            .await
            .map_err(|e| AppError::client("delete API key", e))?;
        Ok(Vec::new())
    }

    async fn import(&self, import_id: &str) -> Result<TeamApiKeyState> {
        let [team_id, public_id] = id::decode::<2>(import_id, ID_FORMAT)?;
        let team = parse_uuid(team_id, "team_id")?;
        if public_id.is_empty() {
            return Err(AppError::attribute("id", "public ID must not be empty"));
        }
        Ok(TeamApiKeyState {
            id: Some(public_id.to_string()),
            team_id: team.to_string(),
            ..TeamApiKeyState::default()
        })
    }
}
