// src/provider.rs

//! Provider entry point: owns the API client and the type registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::{DependencyTrackApi, HttpClient};
use crate::data_sources::{
    DynamicDataSource, NotificationPublisherDataSource, TeamDataSource,
};
use crate::error::{AppError, Result};
use crate::models::ProviderConfig;
use crate::resources::{
    AclMappingResource, ConfigPropertyResource, DynamicResource, NotificationPublisherResource,
    NotificationRuleProjectResource, NotificationRuleResource, ProjectResource, TeamApiKeyResource,
    TeamPermissionResource, TeamResource, Warning,
};

/// What [`Provider::apply`] did to reach the planned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyAction {
    Create,
    Update,
    Replace,
    Delete,
    NoOp,
}

/// Result of [`Provider::apply`].
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub action: ApplyAction,
    /// New state, `None` once the resource is destroyed
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

pub struct Provider {
    resources: BTreeMap<&'static str, Box<dyn DynamicResource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DynamicDataSource>>,
}

impl Provider {
    /// Validate `config` and connect an HTTP client.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(config)
            .map_err(|e| AppError::client("create Dependency-Track API client", e))?;
        log::debug!("Using Dependency-Track API at {}", client.base_url());
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build the provider around an already constructed client.
    pub fn with_client(client: Arc<dyn DependencyTrackApi>) -> Self {
        let resources: Vec<Box<dyn DynamicResource>> = vec![
            Box::new(AclMappingResource::new(client.clone())),
            Box::new(ConfigPropertyResource::new(client.clone())),
            Box::new(NotificationPublisherResource::new(client.clone())),
            Box::new(NotificationRuleResource::new(client.clone())),
            Box::new(NotificationRuleProjectResource::new(client.clone())),
            Box::new(ProjectResource::new(client.clone())),
            Box::new(TeamResource::new(client.clone())),
            Box::new(TeamApiKeyResource::new(client.clone())),
            Box::new(TeamPermissionResource::new(client.clone())),
        ];
        let data_sources: Vec<Box<dyn DynamicDataSource>> = vec![
            Box::new(NotificationPublisherDataSource::new(client.clone())),
            Box::new(TeamDataSource::new(client)),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    pub fn resource(&self, type_name: &str) -> Result<&dyn DynamicResource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| AppError::UnknownType(type_name.to_string()))
    }

    pub fn data_source(&self, type_name: &str) -> Result<&dyn DynamicDataSource> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| AppError::UnknownType(type_name.to_string()))
    }

    /// Move a resource from `prior` to `plan`.
    ///
    /// A change to a requires-replace attribute deletes and recreates the
    /// resource; a plan equal to the prior state makes no calls.
    pub async fn apply(
        &self,
        type_name: &str,
        prior: Option<Value>,
        plan: Option<Value>,
    ) -> Result<ApplyOutcome> {
        let resource = self.resource(type_name)?;

        let (prior, plan) = match (prior, plan) {
            (None, None) => {
                return Ok(ApplyOutcome {
                    action: ApplyAction::NoOp,
                    state: None,
                    warnings: Vec::new(),
                });
            }
            (None, Some(plan)) => {
                let state = resource.create(plan).await?;
                log::info!("Created {type_name}");
                return Ok(ApplyOutcome {
                    action: ApplyAction::Create,
                    state: Some(state),
                    warnings: Vec::new(),
                });
            }
            (Some(prior), None) => {
                let warnings = resource.delete(prior).await?;
                log::info!("Destroyed {type_name}");
                return Ok(ApplyOutcome {
                    action: ApplyAction::Delete,
                    state: None,
                    warnings,
                });
            }
            (Some(prior), Some(plan)) => (prior, plan),
        };

        let schema = resource.schema();
        let replaced = schema.replacement_attributes(&prior, &plan);
        if !replaced.is_empty() {
            log::info!("Replacing {type_name}: {} changed", replaced.join(", "));
            let warnings = resource.delete(prior).await?;
            let state = resource.create(plan).await?;
            return Ok(ApplyOutcome {
                action: ApplyAction::Replace,
                state: Some(state),
                warnings,
            });
        }

        if !schema.has_changes(&prior, &plan) {
            log::debug!("{type_name} is up to date");
            return Ok(ApplyOutcome {
                action: ApplyAction::NoOp,
                state: Some(prior),
                warnings: Vec::new(),
            });
        }

        let state = resource.update(plan, prior).await?;
        log::info!("Updated {type_name}");
        Ok(ApplyOutcome {
            action: ApplyAction::Update,
            state: Some(state),
            warnings: Vec::new(),
        })
    }
}
