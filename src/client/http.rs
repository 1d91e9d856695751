// src/client/http.rs

//! `reqwest` implementation of [`DependencyTrackApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use super::{
    AclMappingRequest, ApiKey, ClientError, ClientResult, ConfigProperty, DependencyTrackApi,
    NotificationPublisher, NotificationRule, Page, PageOptions, Project,
    SetConfigPropertyRequest, Team,
};
use crate::models::ProviderConfig;

const API_KEY_HEADER: &str = "X-Api-Key";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// HTTP client bound to one Dependency-Track instance.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpClient {
    /// Create a configured client for the host in `config`.
    pub fn new(config: &ProviderConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let host = format!("{}/", config.host.trim_end_matches('/'));
        let base_url = Url::parse(&host)?.join("api/v1")?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL; segments are percent-encoded individually.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn paged(&self, segments: &[&str], page: PageOptions) -> RequestBuilder {
        self.client.get(self.endpoint(segments)).query(&[
            ("pageNumber", page.page_number),
            ("pageSize", page.page_size),
        ])
    }

    /// Send a request, turning non-success statuses into [`ClientError::Api`].
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            body
        };
        log::debug!("API call failed with status {}: {}", status, message);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<Page<T>> {
        let response = self.send(request).await?;
        let total_count = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<usize>().ok());

        let bytes = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&bytes)?;
        let total_count = total_count.unwrap_or_else(|| {
            log::debug!(
                "No {TOTAL_COUNT_HEADER} header, treating page of {} as the whole collection",
                items.len()
            );
            items.len()
        });

        Ok(Page { items, total_count })
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<()> {
        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl DependencyTrackApi for HttpClient {
    async fn get_team(&self, team: Uuid) -> ClientResult<Team> {
        let url = self.endpoint(&["team", &team.to_string()]);
        self.fetch(self.client.get(url)).await
    }

    async fn list_teams(&self, page: PageOptions) -> ClientResult<Page<Team>> {
        self.fetch_page(self.paged(&["team"], page)).await
    }

    async fn create_team(&self, team: &Team) -> ClientResult<Team> {
        let url = self.endpoint(&["team"]);
        self.fetch(self.client.put(url).json(team)).await
    }

    async fn update_team(&self, team: &Team) -> ClientResult<Team> {
        let url = self.endpoint(&["team"]);
        self.fetch(self.client.post(url).json(team)).await
    }

    async fn delete_team(&self, team: &Team) -> ClientResult<()> {
        let url = self.endpoint(&["team"]);
        self.execute(self.client.delete(url).json(team)).await
    }

    async fn generate_api_key(&self, team: Uuid) -> ClientResult<ApiKey> {
        let url = self.endpoint(&["team", &team.to_string(), "key"]);
        self.fetch(self.client.put(url)).await
    }

    async fn update_api_key_comment(
        &self,
        public_id: &str,
        comment: &str,
    ) -> ClientResult<ApiKey> {
        let url = self.endpoint(&["team", "key", public_id, "comment"]);
        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(comment.to_string());
        self.fetch(request).await
    }

    async fn delete_api_key(&self, public_id_or_key: &str) -> ClientResult<()> {
        let url = self.endpoint(&["team", "key", public_id_or_key]);
        self.execute(self.client.delete(url)).await
    }

    async fn get_project(&self, project: Uuid) -> ClientResult<Project> {
        let url = self.endpoint(&["project", &project.to_string()]);
        self.fetch(self.client.get(url)).await
    }

    async fn create_project(&self, project: &Project) -> ClientResult<Project> {
        let url = self.endpoint(&["project"]);
        self.fetch(self.client.put(url).json(project)).await
    }

    async fn update_project(&self, project: &Project) -> ClientResult<Project> {
        let url = self.endpoint(&["project"]);
        self.fetch(self.client.post(url).json(project)).await
    }

    async fn delete_project(&self, project: Uuid) -> ClientResult<()> {
        let url = self.endpoint(&["project", &project.to_string()]);
        self.execute(self.client.delete(url)).await
    }

    async fn add_acl_mapping(&self, mapping: &AclMappingRequest) -> ClientResult<()> {
        let url = self.endpoint(&["acl", "mapping"]);
        self.execute(self.client.put(url).json(mapping)).await
    }

    async fn remove_acl_mapping(&self, team: Uuid, project: Uuid) -> ClientResult<()> {
        let url = self.endpoint(&[
            "acl",
            "mapping",
            "team",
            &team.to_string(),
            "project",
            &project.to_string(),
        ]);
        self.execute(self.client.delete(url)).await
    }

    async fn list_acl_projects(
        &self,
        team: Uuid,
        page: PageOptions,
    ) -> ClientResult<Page<Project>> {
        self.fetch_page(self.paged(&["acl", "team", &team.to_string()], page))
            .await
    }

    async fn add_permission_to_team(&self, permission: &str, team: Uuid) -> ClientResult<Team> {
        let url = self.endpoint(&["permission", permission, "team", &team.to_string()]);
        self.fetch(self.client.post(url)).await
    }

    async fn remove_permission_from_team(
        &self,
        permission: &str,
        team: Uuid,
    ) -> ClientResult<Team> {
        let url = self.endpoint(&["permission", permission, "team", &team.to_string()]);
        self.fetch(self.client.delete(url)).await
    }

    async fn list_publishers(&self) -> ClientResult<Vec<NotificationPublisher>> {
        let url = self.endpoint(&["notification", "publisher"]);
        self.fetch(self.client.get(url)).await
    }

    async fn create_publisher(
        &self,
        publisher: &NotificationPublisher,
    ) -> ClientResult<NotificationPublisher> {
        let url = self.endpoint(&["notification", "publisher"]);
        self.fetch(self.client.put(url).json(publisher)).await
    }

    async fn update_publisher(
        &self,
        publisher: &NotificationPublisher,
    ) -> ClientResult<NotificationPublisher> {
        let url = self.endpoint(&["notification", "publisher"]);
        self.fetch(self.client.post(url).json(publisher)).await
    }

    async fn delete_publisher(&self, publisher: Uuid) -> ClientResult<()> {
        let url = self.endpoint(&["notification", "publisher", &publisher.to_string()]);
        self.execute(self.client.delete(url)).await
    }

    async fn list_rules(&self, page: PageOptions) -> ClientResult<Page<NotificationRule>> {
        self.fetch_page(self.paged(&["notification", "rule"], page))
            .await
    }

    async fn create_rule(&self, rule: &NotificationRule) -> ClientResult<NotificationRule> {
        let url = self.endpoint(&["notification", "rule"]);
        self.fetch(self.client.put(url).json(rule)).await
    }

    async fn update_rule(&self, rule: &NotificationRule) -> ClientResult<NotificationRule> {
        let url = self.endpoint(&["notification", "rule"]);
        self.fetch(self.client.post(url).json(rule)).await
    }

    async fn delete_rule(&self, rule: Uuid) -> ClientResult<()> {
        let url = self.endpoint(&["notification", "rule"]);
        let body = serde_json::json!({ "uuid": rule });
        self.execute(self.client.delete(url).json(&body)).await
    }

    async fn add_project_to_rule(
        &self,
        rule: Uuid,
        project: Uuid,
    ) -> ClientResult<NotificationRule> {
        let url = self.endpoint(&[
            "notification",
            "rule",
            &rule.to_string(),
            "project",
            &project.to_string(),
        ]);
        self.fetch(self.client.post(url)).await
    }

    async fn remove_project_from_rule(
        &self,
        rule: Uuid,
        project: Uuid,
    ) -> ClientResult<NotificationRule> {
        let url = self.endpoint(&[
            "notification",
            "rule",
            &rule.to_string(),
            "project",
            &project.to_string(),
        ]);
        self.fetch(self.client.delete(url)).await
    }

    async fn list_config_properties(&self) -> ClientResult<Vec<ConfigProperty>> {
        let url = self.endpoint(&["configProperty"]);
        self.fetch(self.client.get(url)).await
    }

    async fn set_config_property(
        &self,
        request: &SetConfigPropertyRequest,
    ) -> ClientResult<ConfigProperty> {
        let url = self.endpoint(&["configProperty"]);
        self.fetch(self.client.post(url).json(request)).await
    }
}
