//! PostgreSQL store: every entity row is a JSONB document in `entity_rows`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use pmo_core::error::{AppError, ErrorKind};
use pmo_core::result::AppResult;
use pmo_core::types::EntityId;

use super::{ChangeSet, CommitReport, InsertedRow, Store, WriteOp};

/// [`Store`] over a PostgreSQL pool. Each commit runs in one transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::with_source(ErrorKind::Conflict, format!("{context}: duplicate row"), e)
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn fetch(&self, table: &str, id: EntityId) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT data FROM entity_rows WHERE table_name = $1 AND id = $2",
        )
        .bind(table)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch row"))
    }

    async fn fetch_all(&self, table: &str) -> AppResult<Vec<Value>> {
        sqlx::query_scalar::<_, Value>(
            "SELECT data FROM entity_rows WHERE table_name = $1 ORDER BY id ASC",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch rows"))
    }

    async fn commit(&self, changes: ChangeSet) -> AppResult<CommitReport> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        let mut report = CommitReport::default();

        for write in &changes.writes {
            match write.op {
                WriteOp::Insert => {
                    let id = if write.id == 0 {
                        sqlx::query_scalar::<_, i64>("SELECT nextval('entity_row_id_seq')")
                            .fetch_one(&mut *tx)
                            .await
                            .map_err(db_error("Failed to allocate row id"))?
                    } else {
                        sqlx::query(
                            "SELECT setval('entity_row_id_seq', \
                             GREATEST($1, (SELECT last_value FROM entity_row_id_seq)))",
                        )
                        .bind(write.id)
                        .execute(&mut *tx)
                        .await
                        .map_err(db_error("Failed to advance row id sequence"))?;
                        write.id
                    };

                    let mut row = write.row.clone();
                    if let Value::Object(map) = &mut row {
                        map.insert("id".to_string(), Value::from(id));
                    }

                    sqlx::query("INSERT INTO entity_rows (table_name, id, data) VALUES ($1, $2, $3)")
                        .bind(write.table)
                        .bind(id)
                        .bind(&row)
                        .execute(&mut *tx)
                        .await
                        .map_err(db_error("Failed to insert row"))?;

                    report.inserted.push(InsertedRow {
                        table: write.table,
                        id,
                    });
                }
                WriteOp::Update => {
                    let patch = Value::Object(write.patch());
                    let result = sqlx::query(
                        "UPDATE entity_rows SET data = data || $3 \
                         WHERE table_name = $1 AND id = $2",
                    )
                    .bind(write.table)
                    .bind(write.id)
                    .bind(&patch)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("Failed to update row"))?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::conflict(format!(
                            "{} row {} was modified or removed concurrently",
                            write.table, write.id
                        )));
                    }
                }
                WriteOp::Delete => {
                    let result =
                        sqlx::query("DELETE FROM entity_rows WHERE table_name = $1 AND id = $2")
                            .bind(write.table)
                            .bind(write.id)
                            .execute(&mut *tx)
                            .await
                            .map_err(db_error("Failed to delete row"))?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::conflict(format!(
                            "{} row {} was modified or removed concurrently",
                            write.table, write.id
                        )));
                    }
                }
            }
            report.affected += 1;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        debug!(affected = report.affected, "PostgreSQL commit applied");
        Ok(report)
    }
}
