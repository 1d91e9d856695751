//! Remote records as the Dependency-Track API serializes them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to another remote object by UUID only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRef {
    pub uuid: Uuid,
}

impl ObjectRef {
    pub fn new(uuid: Uuid) -> Self {
        Self { uuid }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// API key attached to a team.
///
/// `key` carries the secret only in the response to key generation; listings
/// return it for legacy keys alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub public_id: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub legacy: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub uuid: Uuid,

    pub name: String,

    #[serde(default, skip_serializing)]
    pub permissions: Vec<Permission>,

    #[serde(default, skip_serializing)]
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub uuid: Uuid,

    pub name: String,

    #[serde(default)]
    pub classifier: String,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectRef>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            uuid: Uuid::nil(),
            name: String::new(),
            classifier: String::new(),
            active: default_active(),
            description: None,
            parent: None,
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclMappingRequest {
    pub team: Uuid,
    pub project: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPublisher {
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub uuid: Uuid,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub publisher_class: String,

    #[serde(default)]
    pub template: String,

    #[serde(default)]
    pub template_mime_type: String,

    #[serde(default)]
    pub default_publisher: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRule {
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub uuid: Uuid,

    pub name: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub notify_children: bool,

    #[serde(default)]
    pub log_successful_publish: bool,

    #[serde(default)]
    pub scope: String,

    #[serde(default)]
    pub notification_level: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<ObjectRef>,

    #[serde(default)]
    pub notify_on: Vec<String>,

    #[serde(default)]
    pub publisher: ObjectRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_config: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProperty {
    pub group_name: String,

    pub property_name: String,

    #[serde(default)]
    pub property_value: Option<String>,

    #[serde(default)]
    pub property_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigPropertyRequest {
    pub group_name: String,
    pub property_name: String,
    pub property_value: String,
}

/// Paging parameters for collection endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub page_number: u32,
    pub page_size: u32,
}

/// One page of a collection plus the server-reported total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}
