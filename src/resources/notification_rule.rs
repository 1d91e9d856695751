// src/resources/notification_rule.rs

//! `dependencytrack_notification_rule`
//!
//! A requested publisher config is applied by a follow-up update after
//! create; without one, create is a single call.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ReadOutcome, Resource, Warning, found_or_not_found, scan};
use crate::client::{DependencyTrackApi, NotificationRule, ObjectRef, fetch_all};
use crate::error::{AppError, Result};
use crate::models::NotificationRuleState;
use crate::schema::{Attribute, Schema};
use crate::utils::{non_empty, parse_uuid, require_uuid};

pub struct NotificationRuleResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl NotificationRuleResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

fn to_request(plan: &NotificationRuleState, uuid: Uuid) -> Result<NotificationRule> {
    let publisher = parse_uuid(&plan.publisher_id, "publisher_id")?;
    Ok(NotificationRule {
        uuid,
        name: plan.name.clone(),
        enabled: plan.enabled,
        notify_children: plan.notify_children,
        log_successful_publish: plan.log_successful_publish,
        scope: plan.scope.clone(),
        notification_level: plan.notification_level.clone(),
        projects: Vec::new(),
        notify_on: plan.notify_on.iter().cloned().collect(),
        publisher: ObjectRef::new(publisher),
        publisher_config: non_empty(plan.publisher_config.clone()),
    })
}

fn to_state(rule: &NotificationRule) -> NotificationRuleState {
    NotificationRuleState {
        id: Some(rule.uuid.to_string()),
        name: rule.name.clone(),
        publisher_id: rule.publisher.uuid.to_string(),
        scope: rule.scope.clone(),
        notification_level: rule.notification_level.clone(),
        enabled: rule.enabled,
        notify_children: rule.notify_children,
        log_successful_publish: rule.log_successful_publish,
        notify_on: rule.notify_on.iter().cloned().collect(),
        publisher_config: non_empty(rule.publisher_config.clone()),
    }
}

#[async_trait]
impl Resource for NotificationRuleResource {
    const TYPE_NAME: &'static str = "dependencytrack_notification_rule";

    type State = NotificationRuleState;

    fn schema(&self) -> Schema {
        Schema::new("Manages a notification rule.")
            .attribute(Attribute::computed("id", "UUID of the notification rule"))
            .attribute(Attribute::required("name", "Name of the notification rule"))
            .attribute(
                Attribute::required("publisher_id", "UUID of the notification publisher")
                    .requires_replace(),
            )
            .attribute(
                Attribute::required("scope", "Scope of the rule, PORTFOLIO or SYSTEM")
                    .requires_replace(),
            )
            .attribute(Attribute::required(
                "notification_level",
                "Level of the rule, INFORMATIONAL, WARNING or ERROR",
            ))
            .attribute(Attribute::optional_computed("enabled", "Defaults to true"))
            .attribute(Attribute::optional_computed("notify_children", "Defaults to true"))
            .attribute(Attribute::optional_computed(
                "log_successful_publish",
                "Defaults to false",
            ))
            .attribute(Attribute::optional_computed(
                "notify_on",
                "Notification groups triggering the rule",
            ))
            .attribute(Attribute::optional(
                "publisher_config",
                "Publisher configuration as JSON",
            ))
    }

    async fn create(&self, plan: NotificationRuleState) -> Result<NotificationRuleState> {
        let mut request = to_request(&plan, Uuid::nil())?;
        let created = self
            .client
            .create_rule(&request)
            .await
            .map_err(|e| AppError::client("create notification rule", e))?;

        if request.publisher_config.is_none() {
            return Ok(to_state(&created));
        }

        log::debug!("Applying publisher config to notification rule {}", created.uuid);
        request.uuid = created.uuid;
        let updated = self
            .client
            .update_rule(&request)
            .await
            .map_err(|e| AppError::client("update notification rule", e))?;
        Ok(to_state(&updated))
    }

    async fn read(
        &self,
        state: NotificationRuleState,
    ) -> Result<ReadOutcome<NotificationRuleState>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        let rules = fetch_all(|page| self.client.list_rules(page));
        let found = scan("read notification rule", rules, |r| r.uuid == uuid).await?;
        Ok(found.as_ref().map(to_state).into())
    }

    async fn update(
        &self,
        plan: NotificationRuleState,
        prior: NotificationRuleState,
    ) -> Result<NotificationRuleState> {
        let uuid = require_uuid(prior.id.as_deref(), "id")?;
        let rule = self
            .client
            .update_rule(&to_request(&plan, uuid)?)
            .await
            .map_err(|e| AppError::client("update notification rule", e))?;
        Ok(to_state(&rule))
    }

    async fn delete(&self, state: NotificationRuleState) -> Result<Vec<Warning>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        self.client
            .delete_rule(uuid)
            .await
            .map_err(|e| AppError::client("delete notification rule", e))?;
        Ok(Vec::new())
    }

    async fn import(&self, id: &str) -> Result<NotificationRuleState> {
        let uuid = parse_uuid(id, "id")?;
        let seed = NotificationRuleState {
            id: Some(uuid.to_string()),
            ..NotificationRuleState::default()
        };
        found_or_not_found(self.read(seed).await?, "Notification rule", id)
    }
}
