// src/resources/notification_rule_project.rs

//! `dependencytrack_notification_rule_project`: limits a rule to a project.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ReadOutcome, Resource, Warning, scan};
use crate::client::{DependencyTrackApi, fetch_all};
use crate::error::{AppError, Result};
use crate::models::NotificationRuleProjectState;
use crate::schema::{Attribute, Schema};
use crate::utils::{id, parse_uuid};

const ID_FORMAT: &str = "project_id/rule_id";

pub struct NotificationRuleProjectResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl NotificationRuleProjectResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

fn keys(state: &NotificationRuleProjectState) -> Result<(Uuid, Uuid)> {
    Ok((
        parse_uuid(&state.project_id, "project_id")?,
        parse_uuid(&state.rule_id, "rule_id")?,
    ))
}

fn to_state(project: Uuid, rule: Uuid) -> NotificationRuleProjectState {
    let (project_id, rule_id) = (project.to_string(), rule.to_string());
    NotificationRuleProjectState {
        id: Some(id::encode(&[&project_id, &rule_id])),
        project_id,
        rule_id,
    }
}

#[async_trait]
impl Resource for NotificationRuleProjectResource {
    const TYPE_NAME: &'static str = "dependencytrack_notification_rule_project";

    type State = NotificationRuleProjectState;

    fn schema(&self) -> Schema {
        Schema::new("Limits a notification rule to a project.")
            .attribute(Attribute::computed(
                "id",
                "Synthetic ID in the format project_id/rule_id",
            ))
            .attribute(Attribute::required("project_id", "UUID of the project").requires_replace())
            .attribute(
                Attribute::required("rule_id", "UUID of the notification rule").requires_replace(),
            )
    }

    async fn create(
        &self,
        plan: NotificationRuleProjectState,
    ) -> Result<NotificationRuleProjectState> {
        let (project, rule) = keys(&plan)?;
        match self.client.add_project_to_rule(rule, project).await {
            Ok(_) => Ok(to_state(project, rule)),
            Err(e) if e.is_not_modified() => Err(AppError::Conflict(
                "The project is already assigned to the notification rule".to_string(),
            )),
            Err(e) => Err(AppError::client("create notification rule project", e)),
        }
    }

    async fn read(
        &self,
        state: NotificationRuleProjectState,
    ) -> Result<ReadOutcome<NotificationRuleProjectState>> {
        let (project, rule) = keys(&state)?;
        let rules = fetch_all(|page| self.client.list_rules(page));
        let found = scan("read notification rule project", rules, |r| {
            r.uuid == rule && r.projects.iter().any(|p| p.uuid == project)
        })
        .await?;
        Ok(found.map(|_| to_state(project, rule)).into())
    }

    async fn update(
        &self,
        _plan: NotificationRuleProjectState,
        _prior: NotificationRuleProjectState,
    ) -> Result<NotificationRuleProjectState> {
        Err(AppError::Immutable(
            "Notification rule project relation".to_string(),
        ))
    }

    async fn delete(&self, state: NotificationRuleProjectState) -> Result<Vec<Warning>> {
        let (project, rule) = keys(&state)?;
        self.client
            .remove_project_from_rule(rule, project)
            .await
            .map_err(|e| AppError::client("delete notification rule project", e))?;
        Ok(Vec::new())
    }

    async fn import(&self, import_id: &str) -> Result<NotificationRuleProjectState> {
        let [project_id, rule_id] = id::decode::<2>(import_id, ID_FORMAT)?;
        let project = parse_uuid(project_id, "project_id")?;
        let rule = parse_uuid(rule_id, "rule_id")?;
        Ok(to_state(project, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApi;

    fn setup() -> (Arc<FakeApi>, Uuid, Uuid) {
        let api = FakeApi::new();
        let publisher = api.seed_publisher("Webhook");
        let rule = api.seed_rule("Alerts", publisher);
        let project = api.seed_project("shop");
        (api, project, rule)
    }

    fn plan(project: Uuid, rule: Uuid) -> NotificationRuleProjectState {
        NotificationRuleProjectState {
            id: None,
            project_id: project.to_string(),
            rule_id: rule.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let (api, project, rule) = setup();
        let resource = NotificationRuleProjectResource::new(api.clone());

        let created = resource.create(plan(project, rule)).await.unwrap();
        assert_eq!(created.id, Some(format!("{project}/{rule}")));
        assert_eq!(
            resource.read(created.clone()).await.unwrap(),
            ReadOutcome::Found(created)
        );
    }

    #[tokio::test]
    async fn test_update_is_immutable() {
        let (api, project, rule) = setup();
        let resource = NotificationRuleProjectResource::new(api.clone());
        let created = resource.create(plan(project, rule)).await.unwrap();
        api.clear_calls();

        let err = resource
            .update(plan(project, rule), created)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Notification rule project relation resource is immutable"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_read_is_gone() {
        let (api, project, rule) = setup();
        let resource = NotificationRuleProjectResource::new(api.clone());
        let created = resource.create(plan(project, rule)).await.unwrap();

        resource.delete(created.clone()).await.unwrap();
        assert!(resource.read(created).await.unwrap().is_gone());
    }

    #[tokio::test]
    async fn test_read_with_rule_deleted_is_gone() {
        let (api, project, rule) = setup();
        let resource = NotificationRuleProjectResource::new(api.clone());
        let created = resource.create(plan(project, rule)).await.unwrap();

        api.data().rules.remove(&rule);
        assert!(resource.read(created).await.unwrap().is_gone());
    }

    #[tokio::test]
    async fn test_import() {
        let api = FakeApi::new();
        let resource = NotificationRuleProjectResource::new(api.clone());

        let state = resource
            .import("22222222-2222-2222-2222-222222222222/33333333-3333-3333-3333-333333333333")
            .await
            .unwrap();
        assert_eq!(state.project_id, "22222222-2222-2222-2222-222222222222");
        assert_eq!(state.rule_id, "33333333-3333-3333-3333-333333333333");
        assert!(api.calls().is_empty());

        let err = resource.import("a/b/c").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected ID in the format 'project_id/rule_id', got [a/b/c]"
        );
    }
}
