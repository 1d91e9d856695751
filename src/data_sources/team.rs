use std::sync::Arc;

use async_trait::async_trait;

use super::DataSource;
use crate::client::DependencyTrackApi;
use crate::error::{AppError, Result};
use crate::models::TeamLookup;
use crate::schema::{Attribute, Schema};
use crate::utils::parse_uuid;

/// `dependencytrack_team` data source, looked up by UUID.
pub struct TeamDataSource {
    client: Arc<dyn DependencyTrackApi>,
}

impl TeamDataSource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TeamDataSource {
    const TYPE_NAME: &'static str = "dependencytrack_team";

    type Model = TeamLookup;

    fn schema(&self) -> Schema {
        Schema::new("Fetches a team.")
            .attribute(Attribute::required("id", "UUID of the team"))
            .attribute(Attribute::computed("name", "Name of the team"))
            .attribute(Attribute::computed(
                "permissions",
                "Permissions granted to the team",
            ))
    }

    async fn read(&self, config: TeamLookup) -> Result<TeamLookup> {
        let uuid = parse_uuid(&config.id, "id")?;
        let team = self
            .client
            .get_team(uuid)
            .await
            .map_err(|e| AppError::client("read team", e))?;

        Ok(TeamLookup {
            id: team.uuid.to_string(),
            name: Some(team.name),
            permissions: team.permissions.into_iter().map(|p| p.name).collect(),
        })
    }
}
