// src/resources/config_property.rs

//! `dependencytrack_config_property`
//!
//! Config properties always exist server-side; the resource only owns their
//! value. The value found before the first write is remembered so it can be
//! put back on destroy.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ReadOutcome, Resource, Warning, scan};
use crate::client::{ConfigProperty, DependencyTrackApi, SetConfigPropertyRequest};
use crate::error::{AppError, Result};
use crate::models::ConfigPropertyState;
use crate::schema::{Attribute, Schema};
use crate::utils::id;

pub struct ConfigPropertyResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl ConfigPropertyResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }

    async fn find(&self, group_name: &str, name: &str) -> Result<Option<ConfigProperty>> {
        scan(
            "get config properties",
            self.client.list_config_properties(),
            |p| p.group_name == group_name && p.property_name == name,
        )
        .await
    }

    async fn set(&self, group_name: &str, name: &str, value: &str, action: &str) -> Result<()> {
        let request = SetConfigPropertyRequest {
            group_name: group_name.to_string(),
            property_name: name.to_string(),
            property_value: value.to_string(),
        };
        self.client
            .set_config_property(&request)
            .await
            .map(|_| ())
            .map_err(|e| AppError::client(action, e))
    }
}

#[async_trait]
impl Resource for ConfigPropertyResource {
    const TYPE_NAME: &'static str = "dependencytrack_config_property";

    type State = ConfigPropertyState;

    fn schema(&self) -> Schema {
        Schema::new("Sets the value of a config property.")
            .attribute(Attribute::computed("id", "Synthetic ID in the format group_name/name"))
            .attribute(
                Attribute::required("group_name", "Group of the config property").requires_replace(),
            )
            .attribute(Attribute::required("name", "Name of the config property").requires_replace())
            .attribute(Attribute::required("value", "Value of the config property").sensitive())
            .attribute(
                Attribute::optional("destroy_value", "Value to set when the resource is destroyed")
                    .sensitive(),
            )
            .attribute(
                Attribute::computed("original_value", "Value of the property before it was set")
                    .sensitive(),
            )
    }

    async fn create(&self, plan: ConfigPropertyState) -> Result<ConfigPropertyState> {
        let original = self.find(&plan.group_name, &plan.name).await?;
        self.set(&plan.group_name, &plan.name, &plan.value, "set config property")
            .await?;

        Ok(ConfigPropertyState {
            id: Some(id::encode(&[&plan.group_name, &plan.name])),
            original_value: original.and_then(|p| p.property_value),
            ..plan
        })
    }

    async fn read(&self, state: ConfigPropertyState) -> Result<ReadOutcome<ConfigPropertyState>> {
        let Some(property) = self.find(&state.group_name, &state.name).await? else {
            return Ok(ReadOutcome::Gone);
        };
        Ok(ReadOutcome::Found(ConfigPropertyState {
            value: property.property_value.unwrap_or_default(),
            ..state
        }))
    }

    async fn update(
        &self,
        plan: ConfigPropertyState,
        prior: ConfigPropertyState,
    ) -> Result<ConfigPropertyState> {
        // Only the value reaches the server; destroy_value lives in state alone.
        self.set(&prior.group_name, &prior.name, &plan.value, "set config property")
            .await?;

        Ok(ConfigPropertyState {
            value: plan.value,
            destroy_value: plan.destroy_value,
            ..prior
        })
    }

    async fn delete(&self, state: ConfigPropertyState) -> Result<Vec<Warning>> {
        let restore = state
            .destroy_value
            .as_deref()
            .or(state.original_value.as_deref());

        let Some(restore) = restore else {
            log::warn!(
                "Leaving config property {}/{} unchanged on destroy",
                state.group_name,
                state.name
            );
            return Ok(vec![Warning::new(
                "No value to restore",
                "Neither destroy_value nor original_value is available on destroy - \
                 the property will not be modified in Dependency-Track",
            )]);
        };

        self.set(
            &state.group_name,
            &state.name,
            restore,
            "reset config property to original value",
        )
        .await?;
        Ok(Vec::new())
    }

    async fn import(&self, _id: &str) -> Result<ConfigPropertyState> {
        Err(AppError::ImportNotSupported(
            "Importing this resource is not necessary. Instead just create a resource to set \
             the property value to what you want it to be"
                .to_string(),
        ))
    }
}
