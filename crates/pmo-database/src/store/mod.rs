//! The storage seam the unit of work commits through.
//!
//! A store only knows tables of JSON rows keyed by integer id. It receives
//! a [`ChangeSet`] that the save pipeline has already rewritten, and applies
//! it atomically.

pub mod memory;
pub mod postgres;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use pmo_core::config::{DatabaseConfig, StoreBackend};
use pmo_core::error::AppError;
use pmo_core::result::AppResult;
use pmo_core::types::EntityId;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use crate::connection;

/// Storage action for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Create the row.
    Insert,
    /// Merge the row over the stored one.
    Update,
    /// Physically remove the row.
    Delete,
}

/// One row write inside a [`ChangeSet`].
#[derive(Debug, Clone)]
pub struct RowWrite {
    /// Target table.
    pub table: &'static str,
    /// Row id; `0` on insert asks the store to assign one.
    pub id: EntityId,
    /// What to do.
    pub op: WriteOp,
    /// Full row for insert/update, `Null` for delete.
    pub row: Value,
    /// Columns whose stored values an update must keep.
    pub preserved: Vec<&'static str>,
}

impl RowWrite {
    /// The update patch: the row without its preserved columns.
    pub fn patch(&self) -> Map<String, Value> {
        let mut patch = match &self.row {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for column in &self.preserved {
            patch.remove(*column);
        }
        patch
    }
}

/// An ordered batch of writes committed as one transaction.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Writes in staging order.
    pub writes: Vec<RowWrite>,
}

impl ChangeSet {
    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Id handed out (or confirmed) for an inserted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedRow {
    /// Table the row went to.
    pub table: &'static str,
    /// Final row id.
    pub id: EntityId,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Number of rows written.
    pub affected: u64,
    /// Inserted rows in staging order.
    pub inserted: Vec<InsertedRow>,
}

impl CommitReport {
    /// Ids inserted into `table`, in staging order.
    pub fn inserted_ids(&self, table: &str) -> Vec<EntityId> {
        self.inserted
            .iter()
            .filter(|row| row.table == table)
            .map(|row| row.id)
            .collect()
    }
}

/// A durable (or process-local) row store.
///
/// Commits are all-or-nothing. An update or delete that matches no stored
/// row, and an insert whose id already exists, fail the whole commit with
/// `ErrorKind::Conflict`.
#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Fetch one row.
    async fn fetch(&self, table: &str, id: EntityId) -> AppResult<Option<Value>>;

    /// Fetch every row of a table, ordered by id.
    async fn fetch_all(&self, table: &str) -> AppResult<Vec<Value>>;

    /// Apply a change set atomically.
    async fn commit(&self, changes: ChangeSet) -> AppResult<CommitReport>;
}

/// Open the store selected by configuration.
///
/// The postgres backend refuses to start until `pmo migrate run` has
/// created the `entity_rows` table.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
        StoreBackend::Postgres => {
            let pool = connection::connect(config).await?;
            if !connection::schema_ready(&pool).await? {
                pool.close().await;
                return Err(AppError::configuration(
                    "Table entity_rows is missing; run `pmo migrate run` first",
                ));
            }
            Arc::new(PgStore::new(pool))
        }
    };
    info!(backend = store.backend(), "Store opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_drops_preserved_columns() {
        let write = RowWrite {
            table: "projects",
            id: 1,
            op: WriteOp::Update,
            row: json!({ "id": 1, "title": "New", "created_at": "x", "created_by_id": 9 }),
            preserved: vec!["created_at", "created_by_id"],
        };
        let patch = write.patch();
        assert_eq!(patch.get("title"), Some(&json!("New")));
        assert!(!patch.contains_key("created_at"));
        assert!(!patch.contains_key("created_by_id"));
    }

    #[test]
    fn test_inserted_ids_by_table() {
        let report = CommitReport {
            affected: 3,
            inserted: vec![
                InsertedRow { table: "projects", id: 1 },
                InsertedRow { table: "tasks", id: 2 },
                InsertedRow { table: "projects", id: 3 },
            ],
        };
        assert_eq!(report.inserted_ids("projects"), vec![1, 3]);
        assert!(report.inserted_ids("users").is_empty());
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&DatabaseConfig::default()).await.expect("open");
        assert_eq!(store.backend(), "memory");
    }
}
