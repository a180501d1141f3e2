//! Unit of work: staged entity changes and the single commit path.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pmo_core::error::AppError;
use pmo_core::result::AppResult;
use pmo_core::traits::IdentityProvider;
use pmo_core::types::{ActorId, EntityId};
use pmo_entity::{AuditStamp, Deletion, Entity};

use crate::interceptor::{AuditContext, AuditInterceptor};
use crate::store::{ChangeSet, CommitReport, RowWrite, Store, WriteOp};

/// The storage action an entity is staged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    /// New row.
    Insert,
    /// Modified row.
    Update,
    /// Removed row.
    Delete,
}

impl From<PendingOp> for WriteOp {
    fn from(op: PendingOp) -> Self {
        match op {
            PendingOp::Insert => WriteOp::Insert,
            PendingOp::Update => WriteOp::Update,
            PendingOp::Delete => WriteOp::Delete,
        }
    }
}

/// Type-erased view of a staged entity, exposing only what the save
/// pipeline needs.
pub trait TrackedEntity: Debug + Send + Sync {
    /// Storage table.
    fn table(&self) -> &'static str;

    /// Primary key.
    fn entity_id(&self) -> EntityId;

    /// Audit provenance, if the entity type is auditable.
    fn audit_mut(&mut self) -> Option<&mut AuditStamp>;

    /// Deletion state, if the entity type is soft-deletable.
    fn soft_delete_mut(&mut self) -> Option<&mut Deletion>;

    /// Serialize to a storage row.
    fn to_row(&self) -> AppResult<Value>;

    /// Clone behind a box.
    fn clone_boxed(&self) -> Box<dyn TrackedEntity>;
}

impl<T: Entity> TrackedEntity for T {
    fn table(&self) -> &'static str {
        T::TABLE
    }

    fn entity_id(&self) -> EntityId {
        Entity::id(self)
    }

    fn audit_mut(&mut self) -> Option<&mut AuditStamp> {
        Entity::audit_stamp_mut(self)
    }

    fn soft_delete_mut(&mut self) -> Option<&mut Deletion> {
        Entity::deletion_mut(self)
    }

    fn to_row(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn clone_boxed(&self) -> Box<dyn TrackedEntity> {
        Box::new(self.clone())
    }
}

/// One staged change.
#[derive(Debug)]
pub struct PendingChange {
    /// What storage should do with the entity.
    pub op: PendingOp,
    /// The staged entity.
    pub entity: Box<dyn TrackedEntity>,
    /// Columns excluded from the write set; storage keeps their values.
    pub preserved: Vec<&'static str>,
}

impl PendingChange {
    /// Stage `entity` for `op`.
    pub fn new(op: PendingOp, entity: Box<dyn TrackedEntity>) -> Self {
        Self {
            op,
            entity,
            preserved: Vec::new(),
        }
    }

    /// Exclude columns from the write set, skipping ones already excluded.
    pub fn preserve(&mut self, columns: &[&'static str]) {
        for &column in columns {
            if !self.preserved.contains(&column) {
                self.preserved.push(column);
            }
        }
    }

    fn to_write(&self) -> AppResult<RowWrite> {
        let row = match self.op {
            PendingOp::Delete => Value::Null,
            PendingOp::Insert | PendingOp::Update => self.entity.to_row()?,
        };
        Ok(RowWrite {
            table: self.entity.table(),
            id: self.entity.entity_id(),
            op: self.op.into(),
            row,
            preserved: self.preserved.clone(),
        })
    }
}

impl Clone for PendingChange {
    fn clone(&self) -> Self {
        Self {
            op: self.op,
            entity: self.entity.clone_boxed(),
            preserved: self.preserved.clone(),
        }
    }
}

/// Staged changes for one caller (typically one request), committed
/// together through the audit pipeline.
///
/// The acting user is fixed when the unit of work begins. Repositories of
/// different entity types may share one unit of work, so a single commit
/// can carry a mixed batch.
#[derive(Debug)]
pub struct UnitOfWork {
    store: Arc<dyn Store>,
    actor: ActorId,
    interceptor: AuditInterceptor,
    pending: Mutex<Vec<PendingChange>>,
}

impl UnitOfWork {
    /// Begin a unit of work acting as `actor`.
    pub fn begin(store: Arc<dyn Store>, actor: ActorId) -> Arc<Self> {
        debug!(actor = %actor, backend = store.backend(), "Unit of work started");
        Arc::new(Self {
            store,
            actor,
            interceptor: AuditInterceptor,
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Begin a unit of work acting as whoever `identity` reports.
    pub fn for_identity(store: Arc<dyn Store>, identity: &dyn IdentityProvider) -> Arc<Self> {
        Self::begin(store, identity.current_actor_id())
    }

    /// The acting user.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Stage an entity change. Nothing reaches storage until [`commit`].
    ///
    /// [`commit`]: UnitOfWork::commit
    pub async fn stage<T: Entity>(&self, op: PendingOp, entity: T) {
        debug!(table = T::TABLE, id = entity.id(), ?op, "Change staged");
        self.pending
            .lock()
            .await
            .push(PendingChange::new(op, Box::new(entity)));
    }

    /// Number of staged changes.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Snapshot of the staged operations as `(table, id, op)`.
    pub async fn pending_ops(&self) -> Vec<(&'static str, EntityId, PendingOp)> {
        self.pending
            .lock()
            .await
            .iter()
            .map(|c| (c.entity.table(), c.entity.entity_id(), c.op))
            .collect()
    }

    /// Drop every staged change.
    pub async fn discard(&self) {
        let mut pending = self.pending.lock().await;
        if !pending.is_empty() {
            debug!(discarded = pending.len(), "Staged changes discarded");
        }
        pending.clear();
    }

    /// Rewrite the staged changes through the audit pipeline and persist
    /// them atomically.
    ///
    /// The pipeline runs on a copy of the staged set. The staged set is
    /// cleared only after storage accepts the commit; on cancellation or a
    /// storage error it is left exactly as staged. Storage errors are
    /// returned unchanged.
    ///
    /// Cancellation is honored up to the moment the batch is handed to the
    /// store. From then on the store commit runs to completion, so the
    /// result always reports what storage actually did.
    pub async fn commit(&self, cancel: &CancellationToken) -> AppResult<CommitReport> {
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Commit cancelled before it started"));
        }

        let mut pending = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::cancelled("Commit cancelled while waiting for the batch"));
            }
            pending = self.pending.lock() => pending,
        };
        if pending.is_empty() {
            return Ok(CommitReport::default());
        }

        let mut batch = pending.clone();
        let context = AuditContext::capture(self.actor);
        self.interceptor.apply(&mut batch, &context);

        let changes = ChangeSet {
            writes: batch
                .iter()
                .map(PendingChange::to_write)
                .collect::<AppResult<Vec<_>>>()?,
        };

        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Commit cancelled before storage accepted it"));
        }
        let report = self.store.commit(changes).await?;

        pending.clear();
        info!(
            actor = %self.actor,
            affected = report.affected,
            inserted = report.inserted.len(),
            "Unit of work committed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmo_core::error::ErrorKind;
    use pmo_entity::client::Client;

    use crate::store::InMemoryStore;

    fn store() -> Arc<dyn Store> {
        Arc::new(InMemoryStore::new())
    }

    #[tokio::test]
    async fn test_for_identity_captures_actor() {
        let uow = UnitOfWork::for_identity(store(), &|| ActorId(12));
        assert_eq!(uow.actor(), ActorId(12));
    }

    #[tokio::test]
    async fn test_commit_clears_pending() {
        let uow = UnitOfWork::begin(store(), ActorId(1));
        uow.stage(PendingOp::Insert, Client::new("Acme")).await;
        assert_eq!(uow.pending_len().await, 1);

        let report = uow.commit(&CancellationToken::new()).await.expect("commit");
        assert_eq!(report.affected, 1);
        assert_eq!(report.inserted_ids("clients"), vec![1]);
        assert_eq!(uow.pending_len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_commit_is_noop() {
        let uow = UnitOfWork::begin(store(), ActorId(1));
        let report = uow.commit(&CancellationToken::new()).await.expect("commit");
        assert_eq!(report, CommitReport::default());
    }

    #[tokio::test]
    async fn test_cancelled_commit_keeps_pending_untouched() {
        let uow = UnitOfWork::begin(store(), ActorId(1));
        let mut client = Client::new("Acme");
        client.id = 5;
        uow.stage(PendingOp::Delete, client).await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = uow.commit(&cancel).await.expect_err("cancelled");
        assert_eq!(err.kind, ErrorKind::Cancelled);
        // Still staged as a delete, not reclassified.
        assert_eq!(
            uow.pending_ops().await,
            vec![("clients", 5, PendingOp::Delete)]
        );
    }

    #[tokio::test]
    async fn test_storage_error_keeps_pending() {
        let uow = UnitOfWork::begin(store(), ActorId(1));
        let mut ghost = Client::new("Ghost");
        ghost.id = 77;
        uow.stage(PendingOp::Update, ghost).await;

        let err = uow
            .commit(&CancellationToken::new())
            .await
            .expect_err("conflict");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(uow.pending_len().await, 1);

        uow.discard().await;
        assert_eq!(uow.pending_len().await, 0);
    }

    /// Applies the batch, then cancels the caller's token and yields before
    /// reporting back, the way a remote commit can finish after the caller
    /// gave up waiting.
    #[derive(Debug)]
    struct CancelsAfterApplying {
        inner: InMemoryStore,
        cancel: CancellationToken,
    }

    #[async_trait::async_trait]
    impl Store for CancelsAfterApplying {
        fn backend(&self) -> &'static str {
            "cancels-after-applying"
        }

        async fn fetch(&self, table: &str, id: EntityId) -> AppResult<Option<Value>> {
            self.inner.fetch(table, id).await
        }

        async fn fetch_all(&self, table: &str) -> AppResult<Vec<Value>> {
            self.inner.fetch_all(table).await
        }

        async fn commit(&self, changes: ChangeSet) -> AppResult<CommitReport> {
            let report = self.inner.commit(changes).await?;
            self.cancel.cancel();
            tokio::task::yield_now().await;
            Ok(report)
        }
    }

    #[tokio::test]
    async fn test_cancel_during_store_commit_reports_success() {
        let cancel = CancellationToken::new();
        let store = Arc::new(CancelsAfterApplying {
            inner: InMemoryStore::new(),
            cancel: cancel.clone(),
        });
        let uow = UnitOfWork::begin(store.clone(), ActorId(1));
        uow.stage(PendingOp::Insert, Client::new("Acme")).await;

        let report = uow.commit(&cancel).await.expect("storage applied the batch");
        assert!(cancel.is_cancelled());
        assert_eq!(report.inserted_ids("clients"), vec![1]);
        assert_eq!(uow.pending_len().await, 0);

        // Nothing is left to replay, so a second commit cannot duplicate rows.
        let again = uow.commit(&CancellationToken::new()).await.expect("noop");
        assert_eq!(again, CommitReport::default());
        assert_eq!(store.inner.row_count("clients").await, 1);
    }

    #[test]
    fn test_preserve_deduplicates() {
        let mut change = PendingChange::new(PendingOp::Update, Box::new(Client::new("a")));
        change.preserve(&["created_at"]);
        change.preserve(&["created_at", "created_by_id"]);
        assert_eq!(change.preserved, vec!["created_at", "created_by_id"]);
    }
}
