//! Typed access to the Dependency-Track REST API.
//!
//! Resources only see the [`DependencyTrackApi`] trait; [`HttpClient`] is the
//! production implementation on top of `reqwest`.

pub mod http;
mod types;

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use http::HttpClient;
pub use types::{
    AclMappingRequest, ApiKey, ConfigProperty, NotificationPublisher, NotificationRule, ObjectRef,
    Page, PageOptions, Permission, Project, SetConfigPropertyRequest, Team,
};

/// Result type alias for client calls.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Page size used when walking a whole collection.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Failure of a single client call.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Host could not be turned into an endpoint URL
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status reported by the server, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// 304 is how the API reports "relation already present".
    pub fn is_not_modified(&self) -> bool {
        self.status() == Some(304)
    }
}

/// Operations the provider needs from the remote API.
#[async_trait]
pub trait DependencyTrackApi: Send + Sync {
    // --- Teams ---

    async fn get_team(&self, team: Uuid) -> ClientResult<Team>;

    async fn list_teams(&self, page: PageOptions) -> ClientResult<Page<Team>>;

    async fn create_team(&self, team: &Team) -> ClientResult<Team>;

    async fn update_team(&self, team: &Team) -> ClientResult<Team>;

    async fn delete_team(&self, team: &Team) -> ClientResult<()>;

    // --- Team API keys ---

    async fn generate_api_key(&self, team: Uuid) -> ClientResult<ApiKey>;

    async fn update_api_key_comment(&self, public_id: &str, comment: &str)
    -> ClientResult<ApiKey>;

    /// Accepts a public id, or the raw key for legacy keys.
    async fn delete_api_key(&self, public_id_or_key: &str) -> ClientResult<()>;

    // --- Projects ---

    async fn get_project(&self, project: Uuid) -> ClientResult<Project>;

    async fn create_project(&self, project: &Project) -> ClientResult<Project>;

    async fn update_project(&self, project: &Project) -> ClientResult<Project>;

    async fn delete_project(&self, project: Uuid) -> ClientResult<()>;

    // --- ACL mappings ---

    async fn add_acl_mapping(&self, mapping: &AclMappingRequest) -> ClientResult<()>;

    async fn remove_acl_mapping(&self, team: Uuid, project: Uuid) -> ClientResult<()>;

    async fn list_acl_projects(&self, team: Uuid, page: PageOptions)
    -> ClientResult<Page<Project>>;

    // --- Permissions ---

    async fn add_permission_to_team(&self, permission: &str, team: Uuid) -> ClientResult<Team>;

    async fn remove_permission_from_team(
        &self,
        permission: &str,
        team: Uuid,
    ) -> ClientResult<Team>;

    // --- Notification publishers ---

    async fn list_publishers(&self) -> ClientResult<Vec<NotificationPublisher>>;

    async fn create_publisher(
        &self,
        publisher: &NotificationPublisher,
    ) -> ClientResult<NotificationPublisher>;

    async fn update_publisher(
        &self,
        publisher: &NotificationPublisher,
    ) -> ClientResult<NotificationPublisher>;

    async fn delete_publisher(&self, publisher: Uuid) -> ClientResult<()>;

    // --- Notification rules ---

    async fn list_rules(&self, page: PageOptions) -> ClientResult<Page<NotificationRule>>;

    async fn create_rule(&self, rule: &NotificationRule) -> ClientResult<NotificationRule>;

    async fn update_rule(&self, rule: &NotificationRule) -> ClientResult<NotificationRule>;

    async fn delete_rule(&self, rule: Uuid) -> ClientResult<()>;

    async fn add_project_to_rule(&self, rule: Uuid, project: Uuid)
    -> ClientResult<NotificationRule>;

    async fn remove_project_from_rule(
        &self,
        rule: Uuid,
        project: Uuid,
    ) -> ClientResult<NotificationRule>;

    // --- Config properties ---

    async fn list_config_properties(&self) -> ClientResult<Vec<ConfigProperty>>;

    async fn set_config_property(
        &self,
        request: &SetConfigPropertyRequest,
    ) -> ClientResult<ConfigProperty>;
}

/// Walk every page of a paged collection.
///
/// Stops when the collected count reaches the server-reported total or a page
/// comes back empty. A server that omits the total gets a single page read,
/// so members past the first page are not seen.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> ClientResult<Vec<T>>
where
    F: FnMut(PageOptions) -> Fut,
    Fut: Future<Output = ClientResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page_number = 1;

    loop {
        let page = fetch_page(PageOptions {
            page_number,
            page_size: DEFAULT_PAGE_SIZE,
        })
        .await?;

        let fetched = page.items.len();
        items.extend(page.items);
        if fetched == 0 || items.len() >= page.total_count {
            break;
        }
        page_number += 1;
    }

    Ok(items)
}
