//! # Log Sink
//!
//! Append-only `logs` table. Failures of inventory operations are recorded
//! here in addition to `tracing` output.
//!
//! Writes from the service are fire-and-forget: [`LogRepository::append_detached`]
//! spawns the insert and returns immediately, so a slow or failing log write
//! never changes the outcome of the operation being logged.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use inventory_core::{LogEntry, LogLevel};

use crate::error::DbResult;

/// Repository for the append-only log sink.
#[derive(Debug, Clone)]
pub struct LogRepository {
    pool: SqlitePool,
}

impl LogRepository {
    /// Creates a new LogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LogRepository { pool }
    }

    /// Appends one entry and waits for the insert.
    pub async fn append(&self, level: LogLevel, message: &str) -> DbResult<LogEntry> {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            level,
            message: message.to_string(),
        };

        sqlx::query("INSERT INTO logs (id, created_at, level, message) VALUES (?1, ?2, ?3, ?4)")
            .bind(&entry.id)
            .bind(entry.created_at)
            .bind(entry.level)
            .bind(&entry.message)
            .execute(&self.pool)
            .await?;

        debug!(log_id = %entry.id, "Log entry appended");
        Ok(entry)
    }

    /// Appends one entry in the background without waiting.
    ///
    /// Outside a Tokio runtime the entry is dropped with a warning.
    pub fn append_detached(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%message, "No runtime available, log entry dropped");
            return;
        };

        let repo = self.clone();
        handle.spawn(async move {
            if let Err(e) = repo.append(level, &message).await {
                warn!(error = %e, %message, "Failed to append log entry");
            }
        });
    }

    /// Most recent entries first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<LogEntry>> {
        let entries: Vec<LogEntry> = sqlx::query_as(
            r#"
            SELECT id, created_at, level, message
            FROM logs
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Counts all entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use std::time::Duration;

    #[tokio::test]
    async fn test_append_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.logs().append(LogLevel::Info, "first").await.unwrap();
        db.logs().append(LogLevel::Error, "second").await.unwrap();

        let entries = db.logs().recent(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(entries[1].level, LogLevel::Info);
    }

    #[tokio::test]
    async fn test_detached_append_eventually_lands() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.logs().append_detached(LogLevel::Warn, "background");

        let mut count = 0;
        for _ in 0..50 {
            count = db.logs().count().await.unwrap();
            if count == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_detached_append_without_runtime_is_noop() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let db = rt
            .block_on(Database::new(DbConfig::in_memory()))
            .unwrap();

        // Called from plain thread context, outside `block_on`.
        db.logs().append_detached(LogLevel::Info, "dropped");

        let count = rt.block_on(db.logs().count()).unwrap();
        assert_eq!(count, 0);
    }
}
