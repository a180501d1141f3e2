//! Process-local store backed by ordered maps.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use pmo_core::error::AppError;
use pmo_core::result::AppResult;
use pmo_core::types::EntityId;

use super::{ChangeSet, CommitReport, InsertedRow, RowWrite, Store, WriteOp};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<EntityId, Value>,
    last_id: EntityId,
}

impl Table {
    fn next_id(&mut self) -> EntityId {
        self.last_id += 1;
        self.last_id
    }

    fn apply(&mut self, write: &RowWrite) -> AppResult<Option<EntityId>> {
        match write.op {
            WriteOp::Insert => {
                let id = if write.id == 0 { self.next_id() } else { write.id };
                if self.rows.contains_key(&id) {
                    return Err(AppError::conflict(format!(
                        "{} row {id} already exists",
                        write.table
                    )));
                }
                self.last_id = self.last_id.max(id);
                let mut row = write.row.clone();
                if let Value::Object(map) = &mut row {
                    map.insert("id".to_string(), Value::from(id));
                }
                self.rows.insert(id, row);
                Ok(Some(id))
            }
            WriteOp::Update => {
                let stored = self.rows.get_mut(&write.id).ok_or_else(|| {
                    AppError::conflict(format!(
                        "{} row {} was modified or removed concurrently",
                        write.table, write.id
                    ))
                })?;
                if let Value::Object(target) = stored {
                    target.extend(write.patch());
                }
                Ok(None)
            }
            WriteOp::Delete => {
                self.rows.remove(&write.id).ok_or_else(|| {
                    AppError::conflict(format!(
                        "{} row {} was modified or removed concurrently",
                        write.table, write.id
                    ))
                })?;
                Ok(None)
            }
        }
    }
}

/// In-memory [`Store`]. Cloning rows on read keeps callers isolated from
/// each other's unit of work.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows physically present in `table`, deleted or not.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.rows.len())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, table: &str, id: EntityId) -> AppResult<Option<Value>> {
        Ok(self
            .tables
            .read()
            .await
            .get(table)
            .and_then(|t| t.rows.get(&id).cloned()))
    }

    async fn fetch_all(&self, table: &str) -> AppResult<Vec<Value>> {
        Ok(self
            .tables
            .read()
            .await
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn commit(&self, changes: ChangeSet) -> AppResult<CommitReport> {
        let mut tables = self.tables.write().await;

        // Apply to copies of the touched tables so a failing write leaves
        // the store as it was.
        let mut staged: HashMap<&'static str, Table> = HashMap::new();
        let mut report = CommitReport::default();

        for write in &changes.writes {
            let table = staged
                .entry(write.table)
                .or_insert_with(|| tables.get(write.table).cloned().unwrap_or_default());
            if let Some(id) = table.apply(write)? {
                report.inserted.push(InsertedRow {
                    table: write.table,
                    id,
                });
            }
            report.affected += 1;
        }

        for (name, table) in staged {
            tables.insert(name.to_string(), table);
        }

        debug!(affected = report.affected, "In-memory commit applied");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmo_core::error::ErrorKind;
    use serde_json::json;

    fn insert(id: EntityId, title: &str) -> RowWrite {
        RowWrite {
            table: "projects",
            id,
            op: WriteOp::Insert,
            row: json!({ "id": id, "title": title, "created_by_id": 1 }),
            preserved: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = InMemoryStore::new();
        let report = store
            .commit(ChangeSet {
                writes: vec![insert(0, "a"), insert(10, "b"), insert(0, "c")],
            })
            .await
            .expect("commit");
        assert_eq!(report.affected, 3);
        assert_eq!(report.inserted_ids("projects"), vec![1, 10, 11]);

        let row = store.fetch("projects", 1).await.expect("fetch").expect("row");
        assert_eq!(row["id"], 1);
        assert_eq!(row["title"], "a");
    }

    #[tokio::test]
    async fn test_update_keeps_preserved_columns() {
        let store = InMemoryStore::new();
        store
            .commit(ChangeSet {
                writes: vec![insert(1, "a")],
            })
            .await
            .expect("seed");

        let update = RowWrite {
            table: "projects",
            id: 1,
            op: WriteOp::Update,
            row: json!({ "id": 1, "title": "b", "created_by_id": 99 }),
            preserved: vec!["created_by_id"],
        };
        store
            .commit(ChangeSet {
                writes: vec![update],
            })
            .await
            .expect("update");

        let row = store.fetch("projects", 1).await.expect("fetch").expect("row");
        assert_eq!(row["title"], "b");
        assert_eq!(row["created_by_id"], 1);
    }

    #[tokio::test]
    async fn test_failed_commit_is_atomic() {
        let store = InMemoryStore::new();
        let missing = RowWrite {
            table: "projects",
            id: 42,
            op: WriteOp::Delete,
            row: Value::Null,
            preserved: Vec::new(),
        };
        let err = store
            .commit(ChangeSet {
                writes: vec![insert(1, "a"), missing],
            })
            .await
            .expect_err("conflict");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.row_count("projects").await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = InMemoryStore::new();
        let err = store
            .commit(ChangeSet {
                writes: vec![insert(1, "a"), insert(1, "b")],
            })
            .await
            .expect_err("duplicate");
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_fetch_all_orders_by_id() {
        let store = InMemoryStore::new();
        store
            .commit(ChangeSet {
                writes: vec![insert(3, "c"), insert(1, "a"), insert(2, "b")],
            })
            .await
            .expect("seed");
        let rows = store.fetch_all("projects").await.expect("fetch");
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.fetch_all("tasks").await.expect("fetch").is_empty());
    }
}
