//! Generic repository over any [`Entity`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use pmo_core::error::{AppError, ErrorKind};
use pmo_core::result::AppResult;
use pmo_core::traits::Repository;
use pmo_core::types::{EntityId, ListQuery, Paged, Predicate};
use pmo_entity::{Entity, SoftDeletable};

use crate::ordering::ResolvedOrder;
use crate::unit_of_work::{PendingOp, UnitOfWork};

/// Data access for entity type `T` through a shared [`UnitOfWork`].
///
/// Reads go straight to the store. Writes are staged in the unit of work
/// and reach storage on [`Repository::commit`], which commits everything
/// staged in that unit of work, whatever repository staged it.
#[derive(Debug)]
pub struct EntityRepository<T> {
    uow: Arc<UnitOfWork>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityRepository<T> {
    fn clone(&self) -> Self {
        Self {
            uow: Arc::clone(&self.uow),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> EntityRepository<T> {
    /// Create a repository bound to `uow`.
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self {
            uow,
            _entity: PhantomData,
        }
    }

    /// The unit of work this repository stages into.
    pub fn unit_of_work(&self) -> &Arc<UnitOfWork> {
        &self.uow
    }

    fn decode(row: Value) -> AppResult<T> {
        serde_json::from_value(row).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to decode {} row", T::TABLE),
                e,
            )
        })
    }

    async fn load(&self, id: EntityId) -> AppResult<Option<T>> {
        self.uow
            .store()
            .fetch(T::TABLE, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    async fn load_all(&self) -> AppResult<Vec<T>> {
        self.uow
            .store()
            .fetch_all(T::TABLE)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    fn not_found(id: EntityId) -> AppError {
        AppError::not_found(format!("{} row {id} not found", T::TABLE))
    }

    /// Every live record matching `filter`, in identity order.
    pub async fn list(&self, filter: Option<Predicate<'_, T>>) -> AppResult<Vec<T>> {
        let mut items = self.load_all().await?;
        items.retain(|e| !e.is_deleted() && filter.is_none_or(|f| f(e)));
        items.sort_by_key(|e| e.id());
        Ok(items)
    }

    /// Stage a delete of the live record `id`.
    pub async fn remove_by_id(&self, id: EntityId) -> AppResult<()> {
        let entity = self.get_by_id(id).await?;
        self.uow.stage(PendingOp::Delete, entity).await;
        Ok(())
    }
}

impl<T: SoftDeletable> EntityRepository<T> {
    /// Stage an update that clears the soft-delete flag of record `id`.
    pub async fn restore(&self, id: EntityId) -> AppResult<()> {
        let mut entity = self.get_by_id_with_deleted(id).await?;
        if !entity.is_deleted() {
            return Ok(());
        }
        if let Some(deletion) = entity.deletion_mut() {
            deletion.clear();
        }
        self.uow.stage(PendingOp::Update, entity).await;
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for EntityRepository<T> {
    async fn get_by_id(&self, id: EntityId) -> AppResult<T> {
        self.find_by_id(id).await?.ok_or_else(|| Self::not_found(id))
    }

    async fn get_by_id_with_deleted(&self, id: EntityId) -> AppResult<T> {
        self.load(id).await?.ok_or_else(|| Self::not_found(id))
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<T>> {
        Ok(self.load(id).await?.filter(|e| !e.is_deleted()))
    }

    async fn query(
        &self,
        filter: Option<Predicate<'_, T>>,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Paged<T>> {
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Query cancelled before it started"));
        }

        let mut items = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::cancelled("Query cancelled"));
            }
            items = self.load_all() => items?,
        };

        items.retain(|e| {
            (query.include_deleted || !e.is_deleted()) && filter.is_none_or(|f| f(e))
        });
        let total_records = items.len() as u64;

        let order = ResolvedOrder::<T>::resolve(query.order_by.as_deref(), query.is_descending());
        order.apply(&mut items);

        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        let data: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

        debug!(
            table = T::TABLE,
            order_by = order.field_name(),
            direction = order.direction().as_sql(),
            page = query.page.page,
            total_records,
            returned = data.len(),
            "Query executed"
        );
        Ok(Paged::new(data, query.page, total_records))
    }

    async fn count(&self, filter: Option<Predicate<'_, T>>) -> AppResult<u64> {
        Ok(self.list(filter).await?.len() as u64)
    }

    async fn add(&self, entity: T) {
        self.uow.stage(PendingOp::Insert, entity).await;
    }

    async fn update(&self, entity: T) {
        self.uow.stage(PendingOp::Update, entity).await;
    }

    async fn remove(&self, entity: T) {
        self.uow.stage(PendingOp::Delete, entity).await;
    }

    async fn commit(&self, cancel: &CancellationToken) -> AppResult<u64> {
        Ok(self.uow.commit(cancel).await?.affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmo_core::types::{ActorId, PageRequest, SortDirection};
    use pmo_entity::client::Client;

    use crate::store::InMemoryStore;

    fn repo() -> EntityRepository<Client> {
        EntityRepository::new(UnitOfWork::begin(Arc::new(InMemoryStore::new()), ActorId(1)))
    }

    async fn seed(repo: &EntityRepository<Client>, names: &[&str]) {
        for name in names {
            repo.add(Client::new(*name)).await;
        }
        repo.commit(&CancellationToken::new()).await.expect("seed");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let repo = repo();
        let err = repo.get_by_id(1).await.expect_err("missing");
        assert!(err.is_not_found());
        assert!(repo.find_by_id(1).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn test_query_filters_and_pages() {
        let repo = repo();
        seed(&repo, &["Delta", "alpha", "Charlie", "Bravo", "Echo"]).await;

        let starts_upper = |c: &Client| c.name.chars().next().is_some_and(char::is_uppercase);
        let query = ListQuery::new(PageRequest::new(1, 2)).order_by("name", SortDirection::Asc);
        let page = repo
            .query(Some(&starts_upper), &query, &CancellationToken::new())
            .await
            .expect("query");

        assert_eq!(page.total_records, 4);
        assert_eq!(page.total_pages(), 2);
        let names: Vec<_> = page.data.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Charlie"]);
    }

    #[tokio::test]
    async fn test_query_past_last_page_is_empty() {
        let repo = repo();
        seed(&repo, &["a", "b"]).await;
        let page = repo
            .query(None, &ListQuery::new(PageRequest::new(5, 10)), &CancellationToken::new())
            .await
            .expect("query");
        assert!(page.data.is_empty());
        assert_eq!(page.total_records, 2);
    }

    #[tokio::test]
    async fn test_cancelled_query() {
        let repo = repo();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = repo
            .query(None, &ListQuery::default(), &cancel)
            .await
            .expect_err("cancelled");
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_restore_clears_deletion() {
        let repo = repo();
        seed(&repo, &["Acme"]).await;
        repo.remove_by_id(1).await.expect("stage");
        repo.commit(&CancellationToken::new()).await.expect("delete");
        assert!(repo.find_by_id(1).await.expect("find").is_none());

        repo.restore(1).await.expect("restore");
        repo.commit(&CancellationToken::new()).await.expect("commit");
        let client = repo.get_by_id(1).await.expect("live again");
        assert!(!client.deletion.is_deleted);
        assert_eq!(client.audit.updated_by_id, Some(1));
    }

    #[tokio::test]
    async fn test_count_skips_deleted() {
        let repo = repo();
        seed(&repo, &["a", "b", "c"]).await;
        repo.remove_by_id(2).await.expect("stage");
        repo.commit(&CancellationToken::new()).await.expect("delete");
        assert_eq!(repo.count(None).await.expect("count"), 2);
        let only_a = |c: &Client| c.name == "a";
        assert_eq!(repo.count(Some(&only_a)).await.expect("count"), 1);
    }
}
