// SQLite-backed key-value store
use std::path::Path;

use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};

use super::KeyValueStore;
use crate::error::Result;

/// Schema for the key-value table
const MIGRATION_001: &str = r#"
-- One JSON document per key
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if needed) a database file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let db_url = format!("sqlite:{}?mode=rwc", path.display());
        log::info!("Opening logbook database at: {}", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        sqlx::query("PRAGMA journal_mode=WAL;").execute(&pool).await?;

        Self::init(pool).await
    }

    /// Private in-memory database; a single connection keeps it alive and shared
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: Pool<Sqlite>) -> Result<Self> {
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    let applied: bool =
        sqlx::query("SELECT COUNT(*) as count FROM _migrations WHERE name = 'migration_001'")
            .fetch_one(pool)
            .await
            .map(|row| row.get::<i64, _>("count") > 0)?;

    if !applied {
        log::info!("Applying migration_001...");

        for statement in MIGRATION_001.split(';') {
            let stmt = statement
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n");
            let stmt = stmt.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(pool).await?;
            }
        }

        sqlx::query(
            "INSERT INTO _migrations (name, applied_at) VALUES ('migration_001', datetime('now'))",
        )
        .execute(pool)
        .await?;

        log::info!("Migration 001 applied successfully");
    }

    Ok(())
}

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        log::debug!("Writing {} ({} bytes)", key, value.len());
        sqlx::query(
            "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_set_get() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert!(store.get("hamlog_qsos").await.unwrap().is_none());
        store.set("hamlog_qsos", "[]").await.unwrap();
        store.set("hamlog_qsos", "[1]").await.unwrap();
        assert_eq!(store.get("hamlog_qsos").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_file_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("log.db");

        let store = SqliteStore::open(&path).await.unwrap();
        store.set("hamlog_settings", r#"{"myCall":"IZ2ABC"}"#).await.unwrap();
        store.close().await;

        // Reopening runs migrations again without reapplying them
        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(
            store.get("hamlog_settings").await.unwrap().as_deref(),
            Some(r#"{"myCall":"IZ2ABC"}"#)
        );
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
