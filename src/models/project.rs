//! Project state record.

use serde::{Deserialize, Serialize};

/// `dependencytrack_project` resource state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectState {
    /// Project UUID (server-assigned)
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    /// Project type, e.g. `APPLICATION` or `LIBRARY`
    pub classifier: String,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub description: Option<String>,

    /// UUID of the parent project
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            classifier: String::new(),
            active: default_active(),
            description: None,
            parent_id: None,
        }
    }
}

fn default_active() -> bool {
    true
}
