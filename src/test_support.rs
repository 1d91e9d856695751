//! In-memory Dependency-Track used by the resource tests.
//!
//! Mirrors the server behaviour the mappers depend on: 404 for missing
//! objects, 304 for relations that already exist, rule creation ignoring
//! everything but name/scope/level/publisher, and API key listings that only
//! return the secret for legacy keys.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::client::{
    AclMappingRequest, ApiKey, ClientError, ClientResult, ConfigProperty, DependencyTrackApi,
    NotificationPublisher, NotificationRule, ObjectRef, Page, PageOptions, Permission, Project,
    SetConfigPropertyRequest, Team,
};

const KNOWN_PERMISSIONS: &[&str] = &[
    "ACCESS_MANAGEMENT",
    "BOM_UPLOAD",
    "POLICY_MANAGEMENT",
    "POLICY_VIOLATION_ANALYSIS",
    "PORTFOLIO_MANAGEMENT",
    "PROJECT_CREATION_UPLOAD",
    "SYSTEM_CONFIGURATION",
    "VIEW_BADGES",
    "VIEW_POLICY_VIOLATION",
    "VIEW_PORTFOLIO",
    "VIEW_VULNERABILITY",
    "VULNERABILITY_ANALYSIS",
];

#[derive(Debug, Clone, Copy)]
enum Failure {
    Once(u16),
    Always(u16),
}

/// Remote objects held by the fake.
#[derive(Debug, Default)]
pub struct FakeData {
    pub teams: BTreeMap<Uuid, Team>,
    pub projects: BTreeMap<Uuid, Project>,
    pub acl: BTreeSet<(Uuid, Uuid)>,
    pub publishers: BTreeMap<Uuid, NotificationPublisher>,
    pub rules: BTreeMap<Uuid, NotificationRule>,
    pub config: Vec<ConfigProperty>,
}

#[derive(Default)]
pub struct FakeApi {
    data: Mutex<FakeData>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    next_id: AtomicU64,
}

fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status,
        message: message.to_string(),
    }
}

fn not_found(what: &str) -> ClientError {
    api_error(404, &format!("The {what} could not be found."))
}

fn paginate<T: Clone>(items: &[T], page: PageOptions) -> Page<T> {
    let size = page.page_size.max(1) as usize;
    let start = (page.page_number.max(1) as usize - 1) * size;
    Page {
        items: items.iter().skip(start).take(size).cloned().collect(),
        total_count: items.len(),
    }
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn data(&self) -> MutexGuard<'_, FakeData> {
        self.data.lock().unwrap()
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Fail the next call of `operation` with `status`.
    pub fn fail_once(&self, operation: &'static str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, Failure::Once(status));
    }

    /// Fail every call of `operation` with `status`.
    pub fn fail_always(&self, operation: &'static str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, Failure::Always(status));
    }

    fn next_uuid(&self) -> Uuid {
        Uuid::from_u128(0x1000 + u128::from(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn record(&self, operation: &'static str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(operation.to_string());

        let mut failures = self.failures.lock().unwrap();
        match failures.get(operation).copied() {
            Some(Failure::Once(status)) => {
                failures.remove(operation);
                Err(api_error(status, "injected failure"))
            }
            Some(Failure::Always(status)) => Err(api_error(status, "injected failure")),
            None => Ok(()),
        }
    }

    // --- Seeding ---

    pub fn seed_team(&self, name: &str) -> Uuid {
        let uuid = self.next_uuid();
        self.data().teams.insert(
            uuid,
            Team {
                uuid,
                name: name.to_string(),
                ..Team::default()
            },
        );
        uuid
    }

    pub fn seed_project(&self, name: &str) -> Uuid {
        let uuid = self.next_uuid();
        self.data().projects.insert(
            uuid,
            Project {
                uuid,
                name: name.to_string(),
                classifier: "APPLICATION".to_string(),
                ..Project::default()
            },
        );
        uuid
    }

    pub fn seed_publisher(&self, name: &str) -> Uuid {
        let uuid = self.next_uuid();
        self.data().publishers.insert(
            uuid,
            NotificationPublisher {
                uuid,
                name: name.to_string(),
                description: Some(format!("{name} publisher")),
                publisher_class: "org.dependencytrack.notification.publisher.WebhookPublisher"
                    .to_string(),
                template: "{}".to_string(),
                template_mime_type: "application/json".to_string(),
                default_publisher: true,
            },
        );
        uuid
    }

    pub fn seed_rule(&self, name: &str, publisher: Uuid) -> Uuid {
        let uuid = self.next_uuid();
        self.data().rules.insert(
            uuid,
            NotificationRule {
                uuid,
                name: name.to_string(),
                enabled: true,
                notify_children: true,
                scope: "PORTFOLIO".to_string(),
                notification_level: "INFORMATIONAL".to_string(),
                publisher: ObjectRef::new(publisher),
                ..NotificationRule::default()
            },
        );
        uuid
    }

    pub fn seed_config(&self, group: &str, name: &str, value: Option<&str>) {
        self.data().config.push(ConfigProperty {
            group_name: group.to_string(),
            property_name: name.to_string(),
            property_value: value.map(str::to_string),
            property_type: Some("STRING".to_string()),
            description: None,
        });
    }

    /// Add a key that predates public ids.
    pub fn seed_legacy_key(&self, team: Uuid, key: &str) {
        if let Some(team) = self.data().teams.get_mut(&team) {
            team.api_keys.push(ApiKey {
                key: key.to_string(),
                public_id: key.chars().take(8).collect(),
                comment: None,
                legacy: true,
            });
        }
    }

    pub fn config_value(&self, group: &str, name: &str) -> Option<String> {
        self.data()
            .config
            .iter()
            .find(|p| p.group_name == group && p.property_name == name)
            .and_then(|p| p.property_value.clone())
    }

    pub fn acl_projects(&self, team: Uuid) -> Vec<Uuid> {
        self.data()
            .acl
            .iter()
            .filter(|(t, _)| *t == team)
            .map(|(_, p)| *p)
            .collect()
    }
}

#[async_trait]
impl DependencyTrackApi for FakeApi {
    async fn get_team(&self, team: Uuid) -> ClientResult<Team> {
        self.record("get_team")?;
        self.data()
            .teams
            .get(&team)
            .cloned()
            .ok_or_else(|| not_found("team"))
    }

    async fn list_teams(&self, page: PageOptions) -> ClientResult<Page<Team>> {
        self.record("list_teams")?;
        let teams: Vec<Team> = self
            .data()
            .teams
            .values()
            .cloned()
            .map(|mut team| {
                for key in team.api_keys.iter_mut().filter(|k| !k.legacy) {
                    key.key.clear();
                }
                team
            })
            .collect();
        Ok(paginate(&teams, page))
    }

    async fn create_team(&self, team: &Team) -> ClientResult<Team> {
        self.record("create_team")?;
        let uuid = self.next_uuid();
        let created = Team {
            uuid,
            name: team.name.clone(),
            ..Team::default()
        };
        self.data().teams.insert(uuid, created.clone());
        Ok(created)
    }

    async fn update_team(&self, team: &Team) -> ClientResult<Team> {
        self.record("update_team")?;
        let mut data = self.data();
        let stored = data
            .teams
            .get_mut(&team.uuid)
            .ok_or_else(|| not_found("team"))?;
        stored.name = team.name.clone();
        Ok(stored.clone())
    }

    async fn delete_team(&self, team: &Team) -> ClientResult<()> {
        self.record("delete_team")?;
        let mut data = self.data();
        data.teams.remove(&team.uuid).ok_or_else(|| not_found("team"))?;
        data.acl.retain(|(t, _)| *t != team.uuid);
        Ok(())
    }

    async fn generate_api_key(&self, team: Uuid) -> ClientResult<ApiKey> {
        self.record("generate_api_key")?;
        let serial = self.next_uuid().as_u128();
        let mut data = self.data();
        let team = data.teams.get_mut(&team).ok_or_else(|| not_found("team"))?;
        let key = ApiKey {
            key: format!("odt_{serial:08x}secret"),
            public_id: format!("odt_{serial:08x}"),
            comment: None,
            legacy: false,
        };
        team.api_keys.push(key.clone());
        Ok(key)
    }

    async fn update_api_key_comment(
        &self,
        public_id: &str,
        comment: &str,
    ) -> ClientResult<ApiKey> {
        self.record("update_api_key_comment")?;
        let mut data = self.data();
        let key = data
            .teams
            .values_mut()
            .flat_map(|t| t.api_keys.iter_mut())
            .find(|k| k.public_id == public_id || (k.legacy && k.key == public_id))
            .ok_or_else(|| not_found("API key"))?;
        key.comment = Some(comment.to_string());
        Ok(key.clone())
    }

    async fn delete_api_key(&self, public_id_or_key: &str) -> ClientResult<()> {
        self.record("delete_api_key")?;
        let mut data = self.data();
        for team in data.teams.values_mut() {
            let before = team.api_keys.len();
            team.api_keys.retain(|k| {
                let matches = if k.legacy {
                    k.key == public_id_or_key
                } else {
                    k.public_id == public_id_or_key
                };
                !matches
            });
            if team.api_keys.len() != before {
                return Ok(());
            }
        }
        Err(not_found("API key"))
    }

    async fn get_project(&self, project: Uuid) -> ClientResult<Project> {
        self.record("get_project")?;
        self.data()
            .projects
            .get(&project)
            .cloned()
            .ok_or_else(|| not_found("project"))
    }

    async fn create_project(&self, project: &Project) -> ClientResult<Project> {
        self.record("create_project")?;
        let mut data = self.data();
        if let Some(parent) = project.parent {
            if !data.projects.contains_key(&parent.uuid) {
                return Err(not_found("parent project"));
            }
        }
        let uuid = self.next_uuid();
        let created = Project {
            uuid,
            ..project.clone()
        };
        data.projects.insert(uuid, created.clone());
        Ok(created)
    }

    async fn update_project(&self, project: &Project) -> ClientResult<Project> {
        self.record("update_project")?;
        let mut data = self.data();
        let stored = data
            .projects
            .get_mut(&project.uuid)
            .ok_or_else(|| not_found("project"))?;
        *stored = project.clone();
        Ok(stored.clone())
    }

    async fn delete_project(&self, project: Uuid) -> ClientResult<()> {
        self.record("delete_project")?;
        let mut data = self.data();
        data.projects
            .remove(&project)
            .ok_or_else(|| not_found("project"))?;
        data.acl.retain(|(_, p)| *p != project);
        Ok(())
    }

    async fn add_acl_mapping(&self, mapping: &AclMappingRequest) -> ClientResult<()> {
        self.record("add_acl_mapping")?;
        let mut data = self.data();
        if !data.teams.contains_key(&mapping.team) {
            return Err(not_found("team"));
        }
        if !data.projects.contains_key(&mapping.project) {
            return Err(not_found("project"));
        }
        if !data.acl.insert((mapping.team, mapping.project)) {
            return Err(api_error(304, ""));
        }
        Ok(())
    }

    async fn remove_acl_mapping(&self, team: Uuid, project: Uuid) -> ClientResult<()> {
        self.record("remove_acl_mapping")?;
        if !self.data().acl.remove(&(team, project)) {
            return Err(not_found("ACL mapping"));
        }
        Ok(())
    }

    async fn list_acl_projects(
        &self,
        team: Uuid,
        page: PageOptions,
    ) -> ClientResult<Page<Project>> {
        self.record("list_acl_projects")?;
        let data = self.data();
        if !data.teams.contains_key(&team) {
            return Err(not_found("team"));
        }
        let projects: Vec<Project> = data
            .acl
            .iter()
            .filter(|(t, _)| *t == team)
            .filter_map(|(_, p)| data.projects.get(p).cloned())
            .collect();
        Ok(paginate(&projects, page))
    }

    async fn add_permission_to_team(&self, permission: &str, team: Uuid) -> ClientResult<Team> {
        self.record("add_permission_to_team")?;
        if !KNOWN_PERMISSIONS.contains(&permission) {
            return Err(not_found("permission"));
        }
        let mut data = self.data();
        let team = data.teams.get_mut(&team).ok_or_else(|| not_found("team"))?;
        if team.permissions.iter().any(|p| p.name == permission) {
            return Err(api_error(304, ""));
        }
        team.permissions.push(Permission {
            name: permission.to_string(),
            description: None,
        });
        Ok(team.clone())
    }

    async fn remove_permission_from_team(
        &self,
        permission: &str,
        team: Uuid,
    ) -> ClientResult<Team> {
        self.record("remove_permission_from_team")?;
        let mut data = self.data();
        let team = data.teams.get_mut(&team).ok_or_else(|| not_found("team"))?;
        let before = team.permissions.len();
        team.permissions.retain(|p| p.name != permission);
        if team.permissions.len() == before {
            return Err(api_error(304, ""));
        }
        Ok(team.clone())
    }

    async fn list_publishers(&self) -> ClientResult<Vec<NotificationPublisher>> {
        self.record("list_publishers")?;
        Ok(self.data().publishers.values().cloned().collect())
    }

    async fn create_publisher(
        &self,
        publisher: &NotificationPublisher,
    ) -> ClientResult<NotificationPublisher> {
        self.record("create_publisher")?;
        let mut data = self.data();
        if data.publishers.values().any(|p| p.name == publisher.name) {
            return Err(api_error(409, "The notification with the name already exist"));
        }
        let uuid = self.next_uuid();
        let created = NotificationPublisher {
            uuid,
            default_publisher: false,
            ..publisher.clone()
        };
        data.publishers.insert(uuid, created.clone());
        Ok(created)
    }

    async fn update_publisher(
        &self,
        publisher: &NotificationPublisher,
    ) -> ClientResult<NotificationPublisher> {
        self.record("update_publisher")?;
        let mut data = self.data();
        let stored = data
            .publishers
            .get_mut(&publisher.uuid)
            .ok_or_else(|| not_found("notification publisher"))?;
        *stored = NotificationPublisher {
            default_publisher: stored.default_publisher,
            ..publisher.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_publisher(&self, publisher: Uuid) -> ClientResult<()> {
        self.record("delete_publisher")?;
        self.data()
            .publishers
            .remove(&publisher)
            .map(|_| ())
            .ok_or_else(|| not_found("notification publisher"))
    }

    async fn list_rules(&self, page: PageOptions) -> ClientResult<Page<NotificationRule>> {
        self.record("list_rules")?;
        let rules: Vec<NotificationRule> = self.data().rules.values().cloned().collect();
        Ok(paginate(&rules, page))
    }

    async fn create_rule(&self, rule: &NotificationRule) -> ClientResult<NotificationRule> {
        self.record("create_rule")?;
        let mut data = self.data();
        if !data.publishers.contains_key(&rule.publisher.uuid) {
            return Err(not_found("notification publisher"));
        }
        let uuid = self.next_uuid();
        let created = NotificationRule {
            uuid,
            name: rule.name.clone(),
            enabled: true,
            notify_children: true,
            log_successful_publish: false,
            scope: rule.scope.clone(),
            notification_level: rule.notification_level.clone(),
            projects: Vec::new(),
            notify_on: Vec::new(),
            publisher: rule.publisher,
            publisher_config: None,
        };
        data.rules.insert(uuid, created.clone());
        Ok(created)
    }

    async fn update_rule(&self, rule: &NotificationRule) -> ClientResult<NotificationRule> {
        self.record("update_rule")?;
        let mut data = self.data();
        let stored = data
            .rules
            .get_mut(&rule.uuid)
            .ok_or_else(|| not_found("notification rule"))?;
        stored.name = rule.name.clone();
        stored.enabled = rule.enabled;
        stored.notify_children = rule.notify_children;
        stored.log_successful_publish = rule.log_successful_publish;
        stored.notification_level = rule.notification_level.clone();
        stored.notify_on = rule.notify_on.clone();
        stored.publisher_config = rule.publisher_config.clone();
        Ok(stored.clone())
    }

    async fn delete_rule(&self, rule: Uuid) -> ClientResult<()> {
        self.record("delete_rule")?;
        self.data()
            .rules
            .remove(&rule)
            .map(|_| ())
            .ok_or_else(|| not_found("notification rule"))
    }

    async fn add_project_to_rule(
        &self,
        rule: Uuid,
        project: Uuid,
    ) -> ClientResult<NotificationRule> {
        self.record("add_project_to_rule")?;
        let mut data = self.data();
        if !data.projects.contains_key(&project) {
            return Err(not_found("project"));
        }
        let rule = data
            .rules
            .get_mut(&rule)
            .ok_or_else(|| not_found("notification rule"))?;
        if rule.projects.iter().any(|p| p.uuid == project) {
            return Err(api_error(304, ""));
        }
        rule.projects.push(ObjectRef::new(project));
        Ok(rule.clone())
    }

    async fn remove_project_from_rule(
        &self,
        rule: Uuid,
        project: Uuid,
    ) -> ClientResult<NotificationRule> {
        self.record("remove_project_from_rule")?;
        let mut data = self.data();
        let rule = data
            .rules
            .get_mut(&rule)
            .ok_or_else(|| not_found("notification rule"))?;
        let before = rule.projects.len();
        rule.projects.retain(|p| p.uuid != project);
        if rule.projects.len() == before {
            return Err(api_error(304, ""));
        }
        Ok(rule.clone())
    }

    async fn list_config_properties(&self) -> ClientResult<Vec<ConfigProperty>> {
        self.record("list_config_properties")?;
        Ok(self.data().config.clone())
    }

    async fn set_config_property(
        &self,
        request: &SetConfigPropertyRequest,
    ) -> ClientResult<ConfigProperty> {
        self.record("set_config_property")?;
        let mut data = self.data();
        let property = data
            .config
            .iter_mut()
            .find(|p| {
                p.group_name == request.group_name && p.property_name == request.property_name
            })
            .ok_or_else(|| not_found("config property"))?;
        property.property_value = Some(request.property_value.clone());
        Ok(property.clone())
    }
}
