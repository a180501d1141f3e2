//! PostgreSQL connection setup for the `postgres` store backend.
//!
//! Everything here works from [`DatabaseConfig`]: the settings are checked
//! up front, the pool is built from them, and the store refuses to start on
//! a database whose `entity_rows` schema has not been migrated yet.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use pmo_core::config::{DatabaseConfig, StoreBackend};
use pmo_core::error::{AppError, ErrorKind};
use pmo_core::result::AppResult;

const URL_SCHEMES: [&str; 2] = ["postgres://", "postgresql://"];

/// Check the database settings without touching the network.
///
/// The memory backend ignores the connection settings. The postgres backend
/// needs a `postgres://` URL and a pool size range that is not empty.
pub fn check_config(config: &DatabaseConfig) -> AppResult<()> {
    if config.backend == StoreBackend::Memory {
        return Ok(());
    }

    let url = config.url.trim();
    if url.is_empty() {
        return Err(AppError::configuration(
            "database.url is required for the postgres backend",
        ));
    }
    if !URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return Err(AppError::configuration(format!(
            "database.url must start with postgres:// or postgresql://, got '{}'",
            mask_password(url)
        )));
    }
    if config.max_connections == 0 {
        return Err(AppError::configuration(
            "database.max_connections must be at least 1",
        ));
    }
    if config.min_connections > config.max_connections {
        return Err(AppError::configuration(
            "database.min_connections exceeds database.max_connections",
        ));
    }
    Ok(())
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

/// Open a pool for the postgres backend.
pub async fn connect(config: &DatabaseConfig) -> AppResult<PgPool> {
    if config.backend != StoreBackend::Postgres {
        return Err(AppError::configuration(
            "database.backend must be \"postgres\" to open a connection pool",
        ));
    }
    check_config(config)?;

    info!(
        url = %mask_password(&config.url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to PostgreSQL"
    );

    pool_options(config)
        .connect(config.url.trim())
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to connect to {}", mask_password(&config.url)),
                e,
            )
        })
}

/// Whether the `entity_rows` table exists in the connected database.
pub async fn schema_ready(pool: &PgPool) -> AppResult<bool> {
    sqlx::query_scalar::<_, bool>("SELECT to_regclass('entity_rows') IS NOT NULL")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema check failed", e))
}

/// Replace the password in a connection URL with `****`.
///
/// URLs without credentials, or with a user name only, are returned as is.
pub fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _password)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}
