//! Read-only lookups exposed next to the resources.

mod notification_publisher;
mod team;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::schema::Schema;

pub use notification_publisher::NotificationPublisherDataSource;
pub use team::TeamDataSource;

/// Typed lookup of one data source type.
#[async_trait]
pub trait DataSource: Send + Sync {
    const TYPE_NAME: &'static str;

    type Model: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn schema(&self) -> Schema;

    /// Fill in the computed attributes of `config`.
    async fn read(&self, config: Self::Model) -> Result<Self::Model>;
}

/// Object-safe view of a [`DataSource`] working on JSON.
#[async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: Value) -> Result<Value>;
}

#[async_trait]
impl<D> DynamicDataSource for D
where
    D: DataSource,
{
    fn type_name(&self) -> &'static str {
        D::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    async fn read(&self, config: Value) -> Result<Value> {
        let config: D::Model = serde_json::from_value(config)?;
        let model = DataSource::read(self, config).await?;
        Ok(serde_json::to_value(model)?)
    }
}
