//! SQLite persistence for forms, postings and plans.

mod forms;
mod plans;
mod postings;
pub mod schema;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::forms::repository::RepositoryError;

pub use forms::SqliteFormRepository;
pub use plans::SqlitePlanRepository;
pub use postings::SqlitePostingRepository;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid database url '{url}': {source}")]
    InvalidUrl { url: String, source: sqlx::Error },
    #[error("failed to connect to database: {0}")]
    Connect(sqlx::Error),
    #[error("failed to initialize schema: {0}")]
    Schema(sqlx::Error),
}

/// Open a pool for the configured database, creating the file when missing.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|source| StorageError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(StorageError::Connect)
}

/// Single-connection in-memory database. The connection is never recycled, so the
/// data lives as long as the pool.
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|source| StorageError::InvalidUrl {
            url: "sqlite::memory:".to_string(),
            source,
        })?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(StorageError::Connect)
}

/// Create all tables. Safe to run repeatedly.
pub async fn initialize(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::raw_sql(schema::CREATE_TABLES_SQL)
        .execute(pool)
        .await
        .map_err(StorageError::Schema)?;
    tracing::debug!("database schema ready");
    Ok(())
}

impl From<sqlx::Error> for RepositoryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => Self::Corrupt(value.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = connect_in_memory().await.expect("in-memory database opens");
    initialize(&pool).await.expect("schema initializes");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let pool = test_pool().await;
        initialize(&pool).await.expect("second run succeeds");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("tables listed");
        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(names, ["forms", "internships", "jobs", "plans"]);
    }

    #[tokio::test]
    async fn connect_reports_unreachable_database() {
        let config = DatabaseConfig {
            url: "sqlite:///job-portal-missing-dir/nested/forms.db".to_string(),
            max_connections: 1,
        };
        let err = connect(&config).await.expect_err("parent directory is missing");
        assert!(matches!(err, StorageError::Connect(_)));
    }

    #[test]
    fn decode_failures_map_to_corrupt() {
        let err = RepositoryError::from(sqlx::Error::ColumnNotFound("cv".to_string()));
        assert!(matches!(err, RepositoryError::Corrupt(_)));
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Unavailable(_)));
    }
}
