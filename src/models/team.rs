//! State records for teams and the resources hanging off a team.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// `dependencytrack_team` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamState {
    /// Team UUID (server-assigned)
    #[serde(default)]
    pub id: Option<String>,

    /// Name of the team
    pub name: String,

    /// Permissions granted to the team (read-only)
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

/// `dependencytrack_team_permission` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamPermissionState {
    /// Synthetic `team_id/name`
    #[serde(default)]
    pub id: Option<String>,

    pub team_id: String,

    /// Permission name, e.g. `VIEW_PORTFOLIO`
    pub name: String,
}

/// `dependencytrack_team_api_key` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamApiKeyState {
    /// Public id of the key, or `None` before creation
    #[serde(default)]
    pub id: Option<String>,

    pub team_id: String,

    /// Secret value, only known right after creation
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    /// Key predates public ids and is addressed by its value
    #[serde(default)]
    pub legacy: bool,
}

/// `dependencytrack_acl_mapping` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclMappingState {
    /// Synthetic `team_id/project_id`
    #[serde(default)]
    pub id: Option<String>,

    pub team_id: String,

    pub project_id: String,
}

/// `dependencytrack_team` data source model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamLookup {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub permissions: BTreeSet<String>,
}
