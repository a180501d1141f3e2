//! Generic repository trait for entity data access.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::result::AppResult;
use crate::types::filter::Predicate;
use crate::types::id::EntityId;
use crate::types::pagination::Paged;
use crate::types::query::ListQuery;

/// Generic data-access surface shared by every entity type.
///
/// Reads go to storage immediately. `add`, `update` and `remove` only stage
/// a change in the unit of work; nothing reaches storage until `commit`.
#[async_trait]
pub trait Repository<Entity>: Send + Sync
where
    Entity: Send + Sync + 'static,
{
    /// Load a live record by id. Missing and soft-deleted records are
    /// both reported as `NotFound`.
    async fn get_by_id(&self, id: EntityId) -> AppResult<Entity>;

    /// Load a record by id, including soft-deleted ones.
    async fn get_by_id_with_deleted(&self, id: EntityId) -> AppResult<Entity>;

    /// Load a live record by id, `None` when missing or soft-deleted.
    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<Entity>>;

    /// Filter, order and page the records of this entity type.
    async fn query(
        &self,
        filter: Option<Predicate<'_, Entity>>,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Paged<Entity>>;

    /// Count live records matching `filter`.
    async fn count(&self, filter: Option<Predicate<'_, Entity>>) -> AppResult<u64>;

    /// Stage an insert.
    async fn add(&self, entity: Entity);

    /// Stage an update.
    async fn update(&self, entity: Entity);

    /// Stage a delete.
    async fn remove(&self, entity: Entity);

    /// Run the save pipeline over every staged change and persist them.
    /// Returns the number of affected rows.
    async fn commit(&self, cancel: &CancellationToken) -> AppResult<u64>;
}
