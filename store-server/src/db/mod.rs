//! Database Module
//!
//! SQLite connection pool, migrations and per-entity repositories

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file with WAL mode and apply migrations
    pub async fn new(db_path: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // busy_timeout: 写冲突时等待 5s 而非立即失败
            .busy_timeout(Duration::from_secs(5))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(
            path = %db_path,
            max_connections,
            "Database connection established (SQLite WAL, busy_timeout=5000ms)"
        );

        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the full schema (tests, demos)
    ///
    /// A single connection that never expires, since every new
    /// `sqlite::memory:` connection would open an empty database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_database_keeps_data_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let path = path.to_str().unwrap();

        let db = DbService::new(path, 2).await.unwrap();
        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(categories, 4);
        sqlx::query("UPDATE category SET name = 'snacks' WHERE name = 'food'")
            .execute(&db.pool)
            .await
            .unwrap();
        db.pool.close().await;

        // migrations are recorded, so reopening neither fails nor reseeds
        let db = DbService::new(path, 2).await.unwrap();
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM category ORDER BY name")
            .fetch_all(&db.pool)
            .await
            .unwrap();
        assert_eq!(names, vec!["daily-use", "pooja", "snacks", "stationery"]);
    }

    #[tokio::test]
    async fn in_memory_enforces_foreign_keys() {
        let db = DbService::in_memory().await.unwrap();
        let err = sqlx::query(
            "INSERT INTO product (id, name, category_id, price, stock, low_stock_threshold, is_active, created_at) VALUES (1, 'x', 999, 1.0, 0, 10, 1, 0)",
        )
        .execute(&db.pool)
        .await;
        assert!(err.is_err());
    }
}
