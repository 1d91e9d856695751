// src/resources/mod.rs

//! Resource mappers.
//!
//! Each mapper turns a desired-state record into client calls and the remote
//! response back into a state record. Mappers are typed through
//! [`Resource`]; the host drives them through the object-safe
//! [`DynamicResource`] on JSON state.
//!
//! Two read strategies exist:
//! - Directly addressable objects are fetched by UUID ([`fetch_direct`]).
//! - Relations and objects without a single-object endpoint are found by
//!   scanning their owning collection ([`scan`]).
//!
//! In both cases a 404 means the object is gone.

mod acl_mapping;
mod config_property;
mod notification_publisher;
mod notification_rule;
mod notification_rule_project;
mod project;
mod team;
mod team_api_key;
mod team_permission;

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ClientResult;
use crate::error::{AppError, Result};
use crate::schema::Schema;

pub use acl_mapping::AclMappingResource;
pub use config_property::ConfigPropertyResource;
pub use notification_publisher::NotificationPublisherResource;
pub use notification_rule::NotificationRuleResource;
pub use notification_rule_project::NotificationRuleProjectResource;
pub use project::ProjectResource;
pub use team::TeamResource;
pub use team_api_key::TeamApiKeyResource;
pub use team_permission::TeamPermissionResource;

/// Result of reading a resource back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Found(T),
    /// The remote object no longer exists; the host drops it from state.
    Gone,
}

impl<T> ReadOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(state) => Some(state),
            Self::Gone => None,
        }
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Gone)
    }
}

impl<T> From<Option<T>> for ReadOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Gone, Self::Found)
    }
}

/// Non-fatal diagnostic returned next to a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub summary: String,
    pub detail: String,
}

impl Warning {
    pub fn new(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Typed CRUD contract of one resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name the host registers the resource under.
    const TYPE_NAME: &'static str;

    type State: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn schema(&self) -> Schema;

    async fn create(&self, plan: Self::State) -> Result<Self::State>;

    async fn read(&self, state: Self::State) -> Result<ReadOutcome<Self::State>>;

    async fn update(&self, plan: Self::State, prior: Self::State) -> Result<Self::State>;

    async fn delete(&self, state: Self::State) -> Result<Vec<Warning>>;

    /// Build state from an import identifier.
    async fn import(&self, id: &str) -> Result<Self::State>;
}

/// Object-safe view of a [`Resource`] working on JSON state.
#[async_trait]
pub trait DynamicResource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, plan: Value) -> Result<Value>;

    /// `None` when the remote object is gone.
    async fn read(&self, state: Value) -> Result<Option<Value>>;

    async fn update(&self, plan: Value, prior: Value) -> Result<Value>;

    async fn delete(&self, state: Value) -> Result<Vec<Warning>>;

    async fn import(&self, id: &str) -> Result<Value>;
}

#[async_trait]
impl<R> DynamicResource for R
where
    R: Resource,
{
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    async fn create(&self, plan: Value) -> Result<Value> {
        let plan: R::State = serde_json::from_value(plan)?;
        let state = Resource::create(self, plan).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>> {
        let state: R::State = serde_json::from_value(state)?;
        match Resource::read(self, state).await? {
            ReadOutcome::Found(state) => Ok(Some(serde_json::to_value(state)?)),
            ReadOutcome::Gone => Ok(None),
        }
    }

    async fn update(&self, plan: Value, prior: Value) -> Result<Value> {
        let plan: R::State = serde_json::from_value(plan)?;
        let prior: R::State = serde_json::from_value(prior)?;
        let state = Resource::update(self, plan, prior).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value) -> Result<Vec<Warning>> {
        let state: R::State = serde_json::from_value(state)?;
        Resource::delete(self, state).await
    }

    async fn import(&self, id: &str) -> Result<Value> {
        let state = Resource::import(self, id).await?;
        Ok(serde_json::to_value(state)?)
    }
}

/// Await a single-object fetch, mapping 404 to `None`.
pub(crate) async fn fetch_direct<T>(
    action: &str,
    request: impl Future<Output = ClientResult<T>>,
) -> Result<Option<T>> {
    match request.await {
        Ok(object) => Ok(Some(object)),
        Err(e) if e.is_not_found() => {
            log::debug!("{action}: remote object not found");
            Ok(None)
        }
        Err(e) => Err(AppError::client(action, e)),
    }
}

/// Fetch an owning collection and return the first member matching `predicate`.
///
/// A 404 on the collection itself (e.g. the owning team was deleted) is
/// treated like a missing member.
pub(crate) async fn scan<T>(
    action: &str,
    request: impl Future<Output = ClientResult<Vec<T>>>,
    predicate: impl FnMut(&T) -> bool,
) -> Result<Option<T>> {
    let Some(items) = fetch_direct(action, request).await? else {
        return Ok(None);
    };
    Ok(items.into_iter().find(predicate))
}

/// Move a relation by adding the new one before removing the old one.
///
/// If removing the old relation fails, the new one is removed again. When
/// that rollback fails too, both relations are left in place and
/// [`AppError::PartialUpdate`] reports it.
pub(crate) async fn replace_relation(
    new_relation: &str,
    old_relation: &str,
    add_new: impl Future<Output = Result<()>>,
    remove_old: impl Future<Output = Result<()>>,
    remove_new: impl Future<Output = Result<()>>,
) -> Result<()> {
    add_new.await?;

    let Err(err) = remove_old.await else {
        return Ok(());
    };

    log::warn!("Removing {old_relation} failed, rolling back {new_relation}: {err}");
    match remove_new.await {
        Ok(()) => Err(err),
        Err(rollback) => Err(AppError::PartialUpdate(format!(
            "added {new_relation} but could not remove {old_relation} ({err}); \
             rollback failed: {rollback}"
        ))),
    }
}

/// Run the read path for an import by bare UUID; a missing object is an error.
pub(crate) fn found_or_not_found<T>(outcome: ReadOutcome<T>, what: &str, id: &str) -> Result<T> {
    match outcome {
        ReadOutcome::Found(state) => Ok(state),
        ReadOutcome::Gone => Err(AppError::not_found(format!("{what} with ID [{id}]"))),
    }
}
