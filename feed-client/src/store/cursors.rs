//! Cursor entry table.
//!
//! Cursor entries are only ever written through a [`CursorTracker`] borrowed
//! from an open merge transaction, next to the records they describe.

use crate::error::StorageResult;
use feed_types::{CursorEntry, PageKey, RecordId, ResourceKind};
use sqlx::SqliteConnection;

/// Cursor operations on one partition, bound to an open connection.
pub struct CursorTracker<'c> {
    conn: &'c mut SqliteConnection,
    kind: ResourceKind,
}

impl<'c> CursorTracker<'c> {
    /// Bind a tracker to a connection (normally a transaction).
    pub fn new(conn: &'c mut SqliteConnection, kind: ResourceKind) -> Self {
        Self { conn, kind }
    }

    /// Cursor entry of a record.
    pub async fn get(&mut self, id: RecordId) -> StorageResult<Option<CursorEntry>> {
        let row = sqlx::query_as::<_, CursorRow>(
            r#"
            SELECT id, prev_page, next_page
            FROM remote_keys
            WHERE kind = ?1 AND id = ?2
            "#,
        )
        .bind(self.kind.as_str())
        .bind(id.value())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(CursorEntry::from))
    }

    /// Insert or overwrite entries.
    pub async fn upsert_all(&mut self, entries: &[CursorEntry]) -> StorageResult<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO remote_keys (kind, id, prev_page, next_page)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(kind, id) DO UPDATE SET
                    prev_page = excluded.prev_page,
                    next_page = excluded.next_page
                "#,
            )
            .bind(self.kind.as_str())
            .bind(entry.id.value())
            .bind(entry.prev_page.map(|p| i64::from(p.value())))
            .bind(entry.next_page.map(|p| i64::from(p.value())))
            .execute(&mut *self.conn)
            .await?;
        }
        Ok(())
    }

    /// Remove every entry of the partition.
    pub async fn clear(&mut self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM remote_keys WHERE kind = ?1")
            .bind(self.kind.as_str())
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Internal row type for cursor queries.
#[derive(sqlx::FromRow)]
pub(crate) struct CursorRow {
    id: i64,
    prev_page: Option<i64>,
    next_page: Option<i64>,
}

impl From<CursorRow> for CursorEntry {
    fn from(row: CursorRow) -> Self {
        let page = |value: i64| PageKey::new(u32::try_from(value).unwrap_or(u32::MAX));
        CursorEntry {
            id: RecordId::new(row.id),
            prev_page: row.prev_page.map(page),
            next_page: row.next_page.map(page),
        }
    }
}
