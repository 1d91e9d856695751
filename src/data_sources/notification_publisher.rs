use std::sync::Arc;

use async_trait::async_trait;

use super::DataSource;
use crate::client::DependencyTrackApi;
use crate::error::{AppError, Result};
use crate::models::PublisherLookup;
use crate::schema::{Attribute, Schema};
use crate::utils::non_empty;

/// `dependencytrack_notification_publisher` data source, looked up by name.
pub struct NotificationPublisherDataSource {
    client: Arc<dyn DependencyTrackApi>,
}

impl NotificationPublisherDataSource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for NotificationPublisherDataSource {
    const TYPE_NAME: &'static str = "dependencytrack_notification_publisher";

    type Model = PublisherLookup;

    fn schema(&self) -> Schema {
        Schema::new("Fetches a notification publisher by name.")
            .attribute(Attribute::required("name", "Name of the notification publisher"))
            .attribute(Attribute::computed("id", "UUID of the notification publisher"))
            .attribute(Attribute::computed("publisher_class", "Publisher implementation class"))
            .attribute(Attribute::computed("template", "Template of the notification"))
            .attribute(Attribute::computed("template_mime_type", "MIME type of the template"))
            .attribute(Attribute::computed("description", "Description of the publisher"))
            .attribute(Attribute::computed(
                "default_publisher",
                "Whether the publisher ships with Dependency-Track",
            ))
    }

    async fn read(&self, config: PublisherLookup) -> Result<PublisherLookup> {
        let publishers = self
            .client
            .list_publishers()
            .await
            .map_err(|e| AppError::client("read notification publishers", e))?;

        let publisher = publishers
            .into_iter()
            .find(|p| p.name == config.name)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "notification publisher with name '{}'",
                    config.name
                ))
            })?;

        Ok(PublisherLookup {
            name: publisher.name,
            id: Some(publisher.uuid.to_string()),
            publisher_class: Some(publisher.publisher_class),
            template: Some(publisher.template),
            template_mime_type: Some(publisher.template_mime_type),
            description: non_empty(publisher.description),
            default_publisher: publisher.default_publisher,
        })
    }
}
