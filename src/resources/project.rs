// src/resources/project.rs

//! `dependencytrack_project`

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ReadOutcome, Resource, Warning, fetch_direct, found_or_not_found};
use crate::client::{DependencyTrackApi, ObjectRef, Project};
use crate::error::{AppError, Result};
use crate::models::ProjectState;
use crate::schema::{Attribute, Schema};
use crate::utils::{non_empty, parse_uuid, require_uuid};

pub struct ProjectResource {
    client: Arc<dyn DependencyTrackApi>,
}

impl ProjectResource {
    pub fn new(client: Arc<dyn DependencyTrackApi>) -> Self {
        Self { client }
    }
}

fn parent_uuid(plan: &ProjectState) -> Result<Option<Uuid>> {
    plan.parent_id
        .as_deref()
        .map(|id| parse_uuid(id, "parent_id"))
        .transpose()
}

fn to_request(plan: &ProjectState, uuid: Uuid) -> Result<Project> {
    Ok(Project {
        uuid,
        name: plan.name.clone(),
        classifier: plan.classifier.clone(),
        active: plan.active,
        description: non_empty(plan.description.clone()),
        parent: parent_uuid(plan)?.map(ObjectRef::new),
    })
}

fn to_state(project: &Project) -> ProjectState {
    ProjectState {
        id: Some(project.uuid.to_string()),
        name: project.name.clone(),
        classifier: project.classifier.clone(),
        active: project.active,
        description: non_empty(project.description.clone()),
        parent_id: project.parent.map(|p| p.uuid.to_string()),
    }
}

#[async_trait]
impl Resource for ProjectResource {
    const TYPE_NAME: &'static str = "dependencytrack_project";

    type State = ProjectState;

    fn schema(&self) -> Schema {
        Schema::new("Manages a project.")
            .attribute(Attribute::computed("id", "UUID of the project"))
            .attribute(Attribute::required("name", "Name of the project"))
            .attribute(Attribute::required(
                "classifier",
                "Classifier of the project, e.g. APPLICATION or LIBRARY",
            ))
            .attribute(Attribute::optional_computed(
                "active",
                "Whether the project is active, defaults to true",
            ))
            .attribute(Attribute::optional("description", "Description of the project"))
            .attribute(Attribute::optional("parent_id", "UUID of the parent project"))
    }

    async fn create(&self, plan: ProjectState) -> Result<ProjectState> {
        let request = to_request(&plan, Uuid::nil())?;
        let project = self
            .client
            .create_project(&request)
            .await
            .map_err(|e| AppError::client("create project", e))?;

        log::debug!("Created project {} ({})", project.name, project.uuid);
        let mut state = to_state(&project);
        state.parent_id = parent_uuid(&plan)?.map(|p| p.to_string());
        Ok(state)
    }

    async fn read(&self, state: ProjectState) -> Result<ReadOutcome<ProjectState>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        let project = fetch_direct("read project", self.client.get_project(uuid)).await?;
        Ok(project.as_ref().map(to_state).into())
    }

    async fn update(&self, plan: ProjectState, prior: ProjectState) -> Result<ProjectState> {
        let uuid = require_uuid(prior.id.as_deref(), "id")?;
        let request = to_request(&plan, uuid)?;
        let project = self
            .client
            .update_project(&request)
            .await
            .map_err(|e| AppError::client("update project", e))?;

        let mut state = to_state(&project);
        state.parent_id = parent_uuid(&plan)?.map(|p| p.to_string());
        Ok(state)
    }

    async fn delete(&self, state: ProjectState) -> Result<Vec<Warning>> {
        let uuid = require_uuid(state.id.as_deref(), "id")?;
        self.client
            .delete_project(uuid)
            .await
            .map_err(|e| AppError::client("delete project", e))?;
        Ok(Vec::new())
    }

    async fn import(&self, id: &str) -> Result<ProjectState> {
        let uuid = parse_uuid(id, "id")?;
        let seed = ProjectState {
            id: Some(uuid.to_string()),
            ..ProjectState::default()
        };
        found_or_not_found(self.read(seed).await?, "Project", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApi;

    fn plan(name: &str) -> ProjectState {
        ProjectState {
            name: name.to_string(),
            classifier: "APPLICATION".to_string(),
            ..ProjectState::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_read_matches_plan() {
        let api = FakeApi::new();
        let resource = ProjectResource::new(api.clone());

        let desired = ProjectState {
            description: Some("Storefront".to_string()),
            ..plan("shop")
        };
        let created = resource.create(desired.clone()).await.unwrap();
        assert_eq!(
            ProjectState {
                id: None,
                ..created.clone()
            },
            desired
        );

        let read = resource.read(created.clone()).await.unwrap();
        assert_eq!(read, ReadOutcome::Found(created));
    }

    #[tokio::test]
    async fn test_empty_description_normalised_to_unset() {
        let api = FakeApi::new();
        let resource = ProjectResource::new(api.clone());

        let created = resource
            .create(ProjectState {
                description: Some(String::new()),
                ..plan("lib")
            })
            .await
            .unwrap();
        assert_eq!(created.description, None);
    }

    #[tokio::test]
    async fn test_parent_is_kept_from_plan() {
        let api = FakeApi::new();
        let parent = api.seed_project("parent");
        let resource = ProjectResource::new(api.clone());

        let desired = ProjectState {
            parent_id: Some(parent.to_string().to_uppercase()),
            ..plan("child")
        };
        let created = resource.create(desired).await.unwrap();
        assert_eq!(created.parent_id, Some(parent.to_string()));

        let updated = resource
            .update(
                ProjectState {
                    active: false,
                    ..plan("child")
                },
                created,
            )
            .await
            .unwrap();
        assert_eq!(updated.parent_id, None);
        assert!(!updated.active);
    }

    #[tokio::test]
    async fn test_invalid_parent_names_attribute() {
        let api = FakeApi::new();
        let resource = ProjectResource::new(api.clone());

        let err = resource
            .create(ProjectState {
                parent_id: Some("nope".to_string()),
                ..plan("child")
            })
            .await
            .unwrap_err();
        assert_eq!(err.attribute_name(), Some("parent_id"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_read_is_gone() {
        let api = FakeApi::new();
        let resource = ProjectResource::new(api.clone());
        let created = resource.create(plan("temp")).await.unwrap();

        resource.delete(created.clone()).await.unwrap();
        assert!(resource.read(created).await.unwrap().is_gone());
    }
}
