//! State records for notification publishers, rules and rule/project links.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// `dependencytrack_notification_publisher` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPublisherState {
    /// Publisher UUID (server-assigned)
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    /// Fully qualified publisher implementation class
    pub publisher_class: String,

    pub template: String,

    pub template_mime_type: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Whether the server ships this publisher (read-only)
    #[serde(default)]
    pub default_publisher: bool,
}

/// `dependencytrack_notification_rule` resource state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRuleState {
    /// Rule UUID (server-assigned)
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    pub publisher_id: String,

    /// `PORTFOLIO` or `SYSTEM`
    pub scope: String,

    /// `INFORMATIONAL`, `WARNING` or `ERROR`
    pub notification_level: String,

    #[serde(default = "enabled_default")]
    pub enabled: bool,

    #[serde(default = "enabled_default")]
    pub notify_children: bool,

    #[serde(default)]
    pub log_successful_publish: bool,

    /// Notification groups that trigger the rule
    #[serde(default)]
    pub notify_on: BTreeSet<String>,

    /// Publisher configuration as a JSON document
    #[serde(default)]
    pub publisher_config: Option<String>,
}

impl Default for NotificationRuleState {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            publisher_id: String::new(),
            scope: String::new(),
            notification_level: String::new(),
            enabled: enabled_default(),
            notify_children: enabled_default(),
            log_successful_publish: false,
            notify_on: BTreeSet::new(),
            publisher_config: None,
        }
    }
}

fn enabled_default() -> bool {
    true
}

/// `dependencytrack_notification_rule_project` resource state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRuleProjectState {
    /// Synthetic `project_id/rule_id`
    #[serde(default)]
    pub id: Option<String>,

    pub project_id: String,

    pub rule_id: String,
}

/// `dependencytrack_notification_publisher` data source model, looked up by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublisherLookup {
    pub name: String,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub publisher_class: Option<String>,

    #[serde(default)]
    pub template: Option<String>,

    #[serde(default)]
    pub template_mime_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub default_publisher: bool,
}
