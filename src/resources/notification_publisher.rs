// src/resources/notification_publisher.rs

//! `dependencytrack_notification_publisher`

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ReadOutcome, Resource, Warning, found_or_not_found, scan};
use crate::client::{DependencyTrackApi, NotificationPublisher};
use crate::error::{AppError, Result};
use crate::models::NotificationPublisherState;
use crate::schema::{Attribute, Schema};
use crate::utils::{non_empty, parse_uuid, require_uuid};

pub struct NotificationPublisherResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl NotificationPublisherResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

fn to_request(plan: NotificationPublisherState, uuid: Uuid) -> NotificationPublisher {
    NotificationPublisher {
        uuid,
        name: plan.name,
        description: non_empty(plan.description),
        publisher_class: plan.publisher_class,
        template: plan.template,
        template_mime_type: plan.template_mime_type,
        default_publisher: false,
    }
}

pub(crate) fn to_state(publisher: &NotificationPublisher) -> NotificationPublisherState {
    NotificationPublisherState {
        id: Some(publisher.uuid.to_string()),
        name: publisher.name.clone(),
        publisher_class: publisher.publisher_class.clone(),
        template: publisher.template.clone(),
        template_mime_type: publisher.template_mime_type.clone(),
        description: non_empty(publisher.description.clone()),
        default_publisher: publisher.default_publisher,
    }
}

#[async_trait]
impl Resource for NotificationPublisherResource {
    const TYPE_NAME: &'static str = "dependencytrack_notification_publisher";

    type State = NotificationPublisherState;

    fn schema(&self) -> Schema {
        Schema::new("Manages a notification publisher.")
            .attribute(Attribute::computed("id", "UUID of the notification publisher"))
            .attribute(Attribute::required("name", "Name of the notification publisher"))
            .attribute(Attribute::required(
                "publisher_class",
                "Fully qualified class name of the publisher implementation",
            ))
            .attribute(Attribute::required("template", "Template of the notification"))
            .attribute(Attribute::required(
                "template_mime_type",
                "MIME type of the rendered template",
            ))
            .attribute(Attribute::optional("description", "Description of the publisher"))
            .attribute(Attribute::computed(
                "default_publisher",
                "Whether the publisher ships with Dependency-Track",
            ))
    }

    async fn create(&self, plan: NotificationPublisherState) -> Result<NotificationPublisherState> {
        let request = to_request(plan, Uuid::nil());
        let publisher = self
            .client
            .create_publisher(&request)
            .await
            .map_err(|e| AppError::client("create notification publisher", e))?;

        log::debug!("Created notification publisher {}", publisher.uuid);
        Ok(to_state(&publisher))
    }

    async fn read(
        &self,
        state: NotificationPublisherState,
    ) -> Result<ReadOutcome<NotificationPublisherState>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        let found = scan(
            "read notification publisher",
            self.client.list_publishers(),
            |p| p.uuid == uuid,
        )
        .await?;
        Ok(found.as_ref().map(to_state).into())
    }

    async fn update(
        &self,
        plan: NotificationPublisherState,
        prior: NotificationPublisherState,
    ) -> Result<NotificationPublisherState> {
        let uuid = require_uuid(prior.id.as_deref(), "id")?;
        let publisher = self
            .client
            .update_publisher(&to_request(plan, uuid))
            .await
            .map_err(|e| AppError::client("update notification publisher", e))?;
        Ok(to_state(&publisher))
    }

    async fn delete(&self, state: NotificationPublisherState) -> Result<Vec<Warning>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        self.client
            .delete_publisher(uuid)
            .await
            .map_err(|e| AppError::client("delete notification publisher", e))?;
        Ok(Vec::new())
    }

    async fn import(&self, id: &str) -> Result<NotificationPublisherState> {
        let uuid = parse_uuid(id, "id")?;
        let seed = NotificationPublisherState {
            id: Some(uuid.to_string()),
            ..NotificationPublisherState::default()
        };
        found_or_not_found(self.read(seed).await?, "Notification publisher", id)
    }
}
