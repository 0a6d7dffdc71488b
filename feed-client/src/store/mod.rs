//! Local durable cache for offline-feed.
//!
//! Provides keyed record storage partitioned by [`ResourceKind`], the cursor
//! entries that describe how each record was paged in, and a per-partition
//! refresh generation.
//!
//! All writes go through [`SqliteStore::commit`], which applies one
//! [`MergeBatch`] inside a single transaction: records and their cursor
//! entries become visible together or not at all.

mod cursors;
mod sqlite;

pub use cursors::CursorTracker;
pub use sqlite::SqliteStore;

use feed_core::{Generation, PageBounds, WriteMode};
use feed_types::{CursorEntry, Record, ResourceKind};

/// A unit of work for one merge.
///
/// Built by the mediator from a fetched page and handed to the store, which
/// commits it as one transaction or rolls it back entirely. The constructors
/// derive one cursor entry per record, so records and cursors always pair up.
#[derive(Debug, Clone)]
pub struct MergeBatch<R> {
    pub(crate) kind: ResourceKind,
    pub(crate) mode: WriteMode,
    pub(crate) records: Vec<R>,
    pub(crate) cursors: Vec<CursorEntry>,
    pub(crate) expected_generation: Option<Generation>,
}

impl<R: Record> MergeBatch<R> {
    /// Clear the partition, then insert `records`.
    pub fn replace_all(kind: ResourceKind, records: Vec<R>, bounds: &PageBounds) -> Self {
        Self::build(kind, WriteMode::ReplaceAll, records, bounds, None)
    }

    /// Delete cached ids absent from `records`, then upsert `records`.
    pub fn reconcile(kind: ResourceKind, records: Vec<R>, bounds: &PageBounds) -> Self {
        Self::build(kind, WriteMode::Reconcile, records, bounds, None)
    }

    /// Upsert `records` next to existing data, provided the partition is
    /// still at `generation`.
    pub fn extend(
        kind: ResourceKind,
        records: Vec<R>,
        bounds: &PageBounds,
        generation: Generation,
    ) -> Self {
        Self::build(kind, WriteMode::Extend, records, bounds, Some(generation))
    }

    /// Build the batch for a planned write mode.
    pub fn for_mode(
        kind: ResourceKind,
        mode: WriteMode,
        records: Vec<R>,
        bounds: &PageBounds,
        generation: Generation,
    ) -> Self {
        match mode {
            WriteMode::ReplaceAll => Self::replace_all(kind, records, bounds),
            WriteMode::Reconcile => Self::reconcile(kind, records, bounds),
            WriteMode::Extend => Self::extend(kind, records, bounds, generation),
        }
    }

    fn build(
        kind: ResourceKind,
        mode: WriteMode,
        records: Vec<R>,
        bounds: &PageBounds,
        expected_generation: Option<Generation>,
    ) -> Self {
        let cursors = bounds.entries(records.iter().map(Record::id));
        Self {
            kind,
            mode,
            records,
            cursors,
            expected_generation,
        }
    }

    /// Partition the batch writes to.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// How the batch is applied.
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the batch carries no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// What a committed batch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    /// Records removed before the insert.
    pub deleted: u64,
    /// Records inserted or overwritten.
    pub written: u64,
    /// Partition generation after the commit.
    pub generation: Generation,
}
