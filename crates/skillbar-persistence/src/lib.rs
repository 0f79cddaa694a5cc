//! Durable usage storage backends
//!
//! Both backends merge per record on save: a stored row is replaced only
//! when the incoming `last_used` is newer, or equal with a count at least as
//! high, so a slow write carrying an older state never clobbers a newer one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use skillbar_core::UsageStorage;
use skillbar_types::UsageRecord;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

pub mod json;

pub use json::JsonUsageStorage;

/// Usage storage in a SQLite database
pub struct SqliteUsageStorage {
    pool: SqlitePool,
}

impl SqliteUsageStorage {
    /// Open (creating if needed) the database at `database_path`
    pub async fn new(database_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = SqlitePool::connect(&database_url)
            .await
            .with_context(|| format!("Failed to open usage database {}", database_path))?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        info!("Usage storage initialized with database: {}", database_path);
        Ok(storage)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS skill_usage (
                name TEXT PRIMARY KEY,
                last_used INTEGER,
                count INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_skill_usage_last_used ON skill_usage(last_used);
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Database migrations completed");
        Ok(())
    }

    /// Read every usage row, tolerating non-numeric columns
    pub async fn load_records(&self) -> Result<Vec<UsageRecord>> {
        let rows = sqlx::query("SELECT name, last_used, count FROM skill_usage ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(|row| UsageRecord {
                name: row.get("name"),
                last_used: row.try_get::<Option<i64>, _>("last_used").ok().flatten(),
                count: row
                    .try_get::<Option<i64>, _>("count")
                    .ok()
                    .flatten()
                    .and_then(|count| u32::try_from(count).ok())
                    .filter(|count| *count >= 1),
            })
            .collect();

        Ok(records)
    }

    /// Upsert `records` in one transaction, newer `last_used` (then higher count) wins per row
    pub async fn save_records(&self, records: &[UsageRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO skill_usage (name, last_used, count)
                VALUES (?, ?, ?)
                ON CONFLICT(name) DO UPDATE SET
                    last_used = excluded.last_used,
                    count = excluded.count
                WHERE skill_usage.last_used IS NULL
                   OR (excluded.last_used IS NOT NULL
                       AND (excluded.last_used > skill_usage.last_used
                            OR (excluded.last_used = skill_usage.last_used
                                AND COALESCE(excluded.count, 0)
                                    >= COALESCE(skill_usage.count, 0))))
                "#,
            )
            .bind(&record.name)
            .bind(record.last_used)
            .bind(record.count.map(i64::from))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Saved {} usage records", records.len());
        Ok(())
    }
}

#[async_trait]
impl UsageStorage for SqliteUsageStorage {
    async fn load(&self) -> Result<Vec<UsageRecord>> {
        self.load_records().await
    }

    async fn save(&self, records: &[UsageRecord]) -> Result<()> {
        self.save_records(records).await
    }
}
