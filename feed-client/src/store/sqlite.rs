//! SQLite storage backend for feed-client.

use super::{CommitSummary, CursorTracker, MergeBatch};
use crate::error::{StorageError, StorageResult};
use feed_core::{stale_ids, Generation, WriteMode};
use feed_types::{CursorEntry, Record, RecordId, ResourceKind};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// SQLite-based record cache.
///
/// Uses WAL mode so readers see the last committed merge while a new one
/// is being written.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a database path.
    ///
    /// Creates the database file if it doesn't exist.
    pub async fn new(path: &Path) -> StorageResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(":memory:")?.foreign_keys(true);

        // A single connection that never recycles, or the database is lost.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Close the pool. Later operations fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                kind TEXT NOT NULL,
                id INTEGER NOT NULL,
                payload TEXT NOT NULL,
                cached_at INTEGER NOT NULL,
                PRIMARY KEY (kind, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS remote_keys (
                kind TEXT NOT NULL,
                id INTEGER NOT NULL,
                prev_page INTEGER,
                next_page INTEGER,
                PRIMARY KEY (kind, id),
                FOREIGN KEY (kind, id) REFERENCES records (kind, id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS partitions (
                kind TEXT PRIMARY KEY,
                generation INTEGER NOT NULL DEFAULT 0,
                refreshed_at INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ===========================================
    // Reads
    // ===========================================

    /// Read `limit` records of a partition starting at `offset`, newest first.
    pub async fn read_paged<R: Record>(
        &self,
        kind: ResourceKind,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<R>> {
        let payloads: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT payload FROM records
            WHERE kind = ?1
            ORDER BY id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(kind.as_str())
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        payloads
            .iter()
            .map(|payload| serde_json::from_str(payload).map_err(StorageError::from))
            .collect()
    }

    /// Ids of a partition, newest first.
    pub async fn record_ids(&self, kind: ResourceKind) -> StorageResult<Vec<RecordId>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM records WHERE kind = ?1 ORDER BY id DESC")
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().map(RecordId::new).collect())
    }

    /// Ids that have a cursor entry, newest first.
    pub async fn cursor_ids(&self, kind: ResourceKind) -> StorageResult<Vec<RecordId>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM remote_keys WHERE kind = ?1 ORDER BY id DESC")
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().map(RecordId::new).collect())
    }

    /// Number of cached records in a partition.
    pub async fn count(&self, kind: ResourceKind) -> StorageResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE kind = ?1")
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    /// Cursor entry of a record.
    pub async fn cursor(
        &self,
        kind: ResourceKind,
        id: RecordId,
    ) -> StorageResult<Option<CursorEntry>> {
        let mut conn = self.pool.acquire().await?;
        CursorTracker::new(&mut *conn, kind).get(id).await
    }

    /// Cursor entry of the last record in presentation order (lowest id).
    ///
    /// `None` when the partition is empty or that record has no entry.
    pub async fn last_cursor(&self, kind: ResourceKind) -> StorageResult<Option<CursorEntry>> {
        let mut conn = self.pool.acquire().await?;
        let last: Option<i64> =
            sqlx::query_scalar("SELECT MIN(id) FROM records WHERE kind = ?1")
                .bind(kind.as_str())
                .fetch_one(&mut *conn)
                .await?;

        match last {
            Some(id) => CursorTracker::new(&mut *conn, kind).get(RecordId::new(id)).await,
            None => Ok(None),
        }
    }

    /// Current refresh generation of a partition.
    pub async fn generation(&self, kind: ResourceKind) -> StorageResult<Generation> {
        let mut conn = self.pool.acquire().await?;
        Self::generation_on(&mut *conn, kind).await
    }

    /// Unix timestamp of the last committed refresh or clear.
    pub async fn refreshed_at(&self, kind: ResourceKind) -> StorageResult<Option<i64>> {
        let at: Option<Option<i64>> =
            sqlx::query_scalar("SELECT refreshed_at FROM partitions WHERE kind = ?1")
                .bind(kind.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(at.flatten())
    }

    /// Unix timestamp of the newest cached record write, appends included.
    pub async fn last_cached_at(&self, kind: ResourceKind) -> StorageResult<Option<i64>> {
        let at: Option<i64> =
            sqlx::query_scalar("SELECT MAX(cached_at) FROM records WHERE kind = ?1")
                .bind(kind.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(at)
    }

    // ===========================================
    // Writes
    // ===========================================

    /// Apply a merge batch in one transaction.
    ///
    /// Any failure rolls the whole batch back: the transaction is dropped
    /// uncommitted on every early return. The generation is read under the
    /// write lock, so a refresh committing concurrently is always seen.
    pub async fn commit<R: Record>(&self, batch: MergeBatch<R>) -> StorageResult<CommitSummary> {
        let kind = batch.kind;
        let mut tx = self.pool.begin().await?;

        let current = Self::claim_generation_on(&mut *tx, kind).await?;
        if let Some(expected) = batch.expected_generation {
            expected.check(current)?;
        }

        let deleted = match batch.mode {
            WriteMode::ReplaceAll => {
                CursorTracker::new(&mut *tx, kind).clear().await?;
                Self::delete_all_on(&mut *tx, kind).await?
            }
            WriteMode::Reconcile => {
                let local: Vec<i64> = sqlx::query_scalar("SELECT id FROM records WHERE kind = ?1")
                    .bind(kind.as_str())
                    .fetch_all(&mut *tx)
                    .await?;
                let local: Vec<RecordId> = local.into_iter().map(RecordId::new).collect();
                let server: Vec<RecordId> = batch.records.iter().map(Record::id).collect();
                Self::delete_ids_on(&mut *tx, kind, &stale_ids(&local, &server)).await?
            }
            WriteMode::Extend => 0,
        };

        let now = Self::current_timestamp();
        for record in &batch.records {
            sqlx::query(
                r#"
                INSERT INTO records (kind, id, payload, cached_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(kind, id) DO UPDATE SET
                    payload = excluded.payload,
                    cached_at = excluded.cached_at
                "#,
            )
            .bind(kind.as_str())
            .bind(record.id().value())
            .bind(serde_json::to_string(record)?)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        CursorTracker::new(&mut *tx, kind)
            .upsert_all(&batch.cursors)
            .await?;

        let generation = match batch.mode {
            WriteMode::Extend => current,
            WriteMode::ReplaceAll | WriteMode::Reconcile => {
                Self::bump_generation_on(&mut *tx, kind, now).await?
            }
        };

        tx.commit().await?;

        Ok(CommitSummary {
            deleted,
            written: batch.records.len() as u64,
            generation,
        })
    }

    /// Drop every cached record and cursor entry of a partition.
    ///
    /// Counts as a refresh: in-flight appends planned before it are rejected.
    pub async fn clear(&self, kind: ResourceKind) -> StorageResult<u64> {
        let mut tx = self.pool.begin().await?;
        CursorTracker::new(&mut *tx, kind).clear().await?;
        let deleted = Self::delete_all_on(&mut *tx, kind).await?;
        Self::bump_generation_on(&mut *tx, kind, Self::current_timestamp()).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn delete_all_on(conn: &mut SqliteConnection, kind: ResourceKind) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM records WHERE kind = ?1")
            .bind(kind.as_str())
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_ids_on(
        conn: &mut SqliteConnection,
        kind: ResourceKind,
        ids: &[RecordId],
    ) -> StorageResult<u64> {
        let mut deleted = 0;
        for id in ids {
            sqlx::query("DELETE FROM remote_keys WHERE kind = ?1 AND id = ?2")
                .bind(kind.as_str())
                .bind(id.value())
                .execute(&mut *conn)
                .await?;
            let result = sqlx::query("DELETE FROM records WHERE kind = ?1 AND id = ?2")
                .bind(kind.as_str())
                .bind(id.value())
                .execute(&mut *conn)
                .await?;
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }

    async fn generation_on(
        conn: &mut SqliteConnection,
        kind: ResourceKind,
    ) -> StorageResult<Generation> {
        let generation: Option<i64> =
            sqlx::query_scalar("SELECT generation FROM partitions WHERE kind = ?1")
                .bind(kind.as_str())
                .fetch_optional(&mut *conn)
                .await?;
        Ok(Generation::new(generation.unwrap_or(0) as u64))
    }

    /// Read the generation with a write, taking the database write lock
    /// before any snapshot of the partition is read.
    async fn claim_generation_on(
        conn: &mut SqliteConnection,
        kind: ResourceKind,
    ) -> StorageResult<Generation> {
        let generation: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO partitions (kind) VALUES (?1)
            ON CONFLICT(kind) DO UPDATE SET generation = generation
            RETURNING generation
            "#,
        )
        .bind(kind.as_str())
        .fetch_one(&mut *conn)
        .await?;
        Ok(Generation::new(generation as u64))
    }

    async fn bump_generation_on(
        conn: &mut SqliteConnection,
        kind: ResourceKind,
        now: i64,
    ) -> StorageResult<Generation> {
        let generation: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO partitions (kind, generation, refreshed_at)
            VALUES (?1, 1, ?2)
            ON CONFLICT(kind) DO UPDATE SET
                generation = generation + 1,
                refreshed_at = excluded.refreshed_at
            RETURNING generation
            "#,
        )
        .bind(kind.as_str())
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
        Ok(Generation::new(generation as u64))
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}
