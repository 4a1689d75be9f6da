//! Trait definition for the records API.
//!
//! Enables dependency injection and mocking for tests. Production code uses
//! [`AutotaskClient`](super::AutotaskClient); tests substitute
//! [`mocks::MockRecords`], which counts every call it receives.

use async_trait::async_trait;
use serde_json::Value;

use super::domain::{ApiError, Entity, SearchFilter};
use super::NamedRecord;

/// Operations the rest of the crate needs from the records service.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// Company id/name pairs.
    async fn search_companies(&self, filter: &SearchFilter) -> Result<Vec<NamedRecord>, ApiError>;

    /// Resource id/name pairs. May fail with [`ApiError::MethodNotAllowed`].
    async fn search_resources(&self, filter: &SearchFilter) -> Result<Vec<NamedRecord>, ApiError>;

    /// One resource's display name.
    async fn get_resource(&self, id: i64) -> Result<Option<NamedRecord>, ApiError>;

    /// Raw records of any entity.
    async fn query(&self, entity: Entity, filter: &SearchFilter) -> Result<Vec<Value>, ApiError>;

    /// One raw record of any entity.
    async fn get(&self, entity: Entity, id: i64) -> Result<Option<Value>, ApiError>;

    /// Create a record, returning its id.
    async fn create(&self, entity: Entity, body: &Value) -> Result<i64, ApiError>;

    /// Update a record, returning its id.
    async fn update(&self, entity: Entity, body: &Value) -> Result<i64, ApiError>;
}

#[async_trait]
impl RecordsApi for super::AutotaskClient {
    async fn search_companies(&self, filter: &SearchFilter) -> Result<Vec<NamedRecord>, ApiError> {
        self.search_companies(filter).await
    }

    async fn search_resources(&self, filter: &SearchFilter) -> Result<Vec<NamedRecord>, ApiError> {
        self.search_resources(filter).await
    }

    async fn get_resource(&self, id: i64) -> Result<Option<NamedRecord>, ApiError> {
        self.get_resource(id).await
    }

    async fn query(&self, entity: Entity, filter: &SearchFilter) -> Result<Vec<Value>, ApiError> {
        self.query(entity, filter).await
    }

    async fn get(&self, entity: Entity, id: i64) -> Result<Option<Value>, ApiError> {
        self.get(entity, id).await
    }

    async fn create(&self, entity: Entity, body: &Value) -> Result<i64, ApiError> {
        self.create(entity, body).await
    }

    async fn update(&self, entity: Entity, body: &Value) -> Result<i64, ApiError> {
        self.update(entity, body).await
    }
}
