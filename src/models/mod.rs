// src/models/mod.rs

//! State records exchanged with the host.
//!
//! Each resource type has one record describing both the desired state
//! handed in by the host and the state written back after a call.

mod config;
mod config_property;
mod notification;
mod project;
mod team;

pub use config::{API_KEY_ENV, HOST_ENV, ProviderConfig};
pub use config_property::ConfigPropertyState;
pub use notification::{
    NotificationPublisherState, NotificationRuleProjectState, NotificationRuleState,
    PublisherLookup,
};
pub use project::ProjectState;
pub use team::{AclMappingState, TeamApiKeyState, TeamLookup, TeamPermissionState, TeamState};
