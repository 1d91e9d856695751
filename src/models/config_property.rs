//! Config property state record.

use serde::{Deserialize, Serialize};

/// `dependencytrack_config_property` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigPropertyState {
    /// Synthetic `group_name/name`
    #[serde(default)]
    pub id: Option<String>,

    pub group_name: String,

    pub name: String,

    pub value: String,

    /// Value written back on destroy, takes precedence over `original_value`
    #[serde(default)]
    pub destroy_value: Option<String>,

    /// Value the property had before this resource first set it
    #[serde(default)]
    pub original_value: Option<String>,
}
