//! SyncMediator - decides when to hit the remote and merges what it returns.
//!
//! One mediator serves one resource kind. It reads connectivity and cursor
//! entries, asks feed-core for a [`LoadPlan`], and executes it:
//!
//! ```text
//! PagedView → SyncMediator → RemoteSource → API
//!                  ↓               ↓
//!           feed-core plan   SqliteStore::commit (one transaction)
//! ```
//!
//! Failures are returned, never retried; nothing is written when a mediation
//! fails. A superseding refresh does not cancel an in-flight append, the
//! store's generation check keeps the late page out instead.

use crate::error::{MediatorError, StorageError};
use crate::reachability::Reachability;
use crate::remote::RemoteSource;
use crate::store::{MergeBatch, SqliteStore};
use feed_core::{
    CursorLookup, InitializeAction, LoadEvent, LoadPlan, LoadStates, PageBounds, SyncPolicy,
    WriteMode,
};
use feed_types::{LoadDirection, MergeOutcome, Record, RecordId, ResourceKind};
use std::marker::PhantomData;
use tokio::sync::Mutex;

/// What the consumer currently shows, as seen by the mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingState {
    /// Records per remote page.
    pub page_size: u32,
    /// Record the consumer is anchored on, used by resume-from-anchor refreshes.
    pub anchor: Option<RecordId>,
    /// Last record of the consumer's window, used by appends.
    pub last_loaded: Option<RecordId>,
}

impl PagingState {
    /// State of a consumer with nothing loaded.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            anchor: None,
            last_loaded: None,
        }
    }

    /// Set the anchor record.
    pub fn with_anchor(mut self, anchor: Option<RecordId>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the last loaded record.
    pub fn with_last_loaded(mut self, last: Option<RecordId>) -> Self {
        self.last_loaded = last;
        self
    }
}

/// Sync mediator for one resource kind.
pub struct SyncMediator<R, S, N> {
    kind: ResourceKind,
    policy: SyncPolicy,
    remote: S,
    reachability: N,
    store: SqliteStore,
    states: Mutex<LoadStates>,
    _record: PhantomData<fn() -> R>,
}

impl<R, S, N> SyncMediator<R, S, N>
where
    R: Record,
    S: RemoteSource<R>,
    N: Reachability,
{
    /// Create a mediator.
    pub fn new(
        kind: ResourceKind,
        policy: SyncPolicy,
        remote: S,
        reachability: N,
        store: SqliteStore,
    ) -> Self {
        Self {
            kind,
            policy,
            remote,
            reachability,
            store,
            states: Mutex::new(LoadStates::default()),
            _record: PhantomData,
        }
    }

    /// Resource kind this mediator serves.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The injected policy.
    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// The backing store.
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Whether the consumer should refresh before its first load.
    pub async fn initialize(&self) -> Result<InitializeAction, StorageError> {
        let cached = self.store.count(self.kind).await?;
        let action = self.policy.initialize(cached == 0);
        tracing::debug!("{}: initialize with {} cached -> {:?}", self.kind, cached, action);
        Ok(action)
    }

    /// Current per-direction load states.
    pub async fn load_states(&self) -> LoadStates {
        self.states.lock().await.clone()
    }

    /// Mark a finished or failed direction as seen.
    pub async fn acknowledge(&self, direction: LoadDirection) {
        self.states
            .lock()
            .await
            .apply(direction, LoadEvent::Acknowledged);
    }

    /// Run one load request.
    ///
    /// The direction's load state moves to `Loading` for the duration and
    /// ends in `Success` or `Error`.
    pub async fn mediate(
        &self,
        direction: LoadDirection,
        paging: &PagingState,
    ) -> Result<MergeOutcome, MediatorError> {
        self.states.lock().await.apply(direction, LoadEvent::Started);

        let result = self.run(direction, paging).await;

        let event = match &result {
            Ok(outcome) => LoadEvent::Finished(*outcome),
            Err(e) => LoadEvent::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        };
        self.states.lock().await.apply(direction, event);
        result
    }

    async fn run(
        &self,
        direction: LoadDirection,
        paging: &PagingState,
    ) -> Result<MergeOutcome, MediatorError> {
        let online = self.reachability.is_online();
        let lookup = CursorLookup::for_request(&self.policy, direction, online);

        // Read before the cursor so a refresh committed in between is detected.
        let generation = if lookup == CursorLookup::LastLoaded {
            Some(self.store.generation(self.kind).await?)
        } else {
            None
        };

        let cursor = match lookup {
            CursorLookup::None => None,
            CursorLookup::Anchor => match paging.anchor {
                Some(id) => self.store.cursor(self.kind, id).await?,
                None => None,
            },
            CursorLookup::LastLoaded => match paging.last_loaded {
                Some(id) => self.store.cursor(self.kind, id).await?,
                None => self.store.last_cursor(self.kind).await?,
            },
        };

        let plan = match LoadPlan::decide(&self.policy, direction, online, cursor.as_ref()) {
            LoadPlan::Skip(outcome) => {
                tracing::debug!(
                    "{}: {} skipped (online: {}, end: {})",
                    self.kind,
                    direction,
                    online,
                    outcome.end_of_pagination_reached
                );
                return Ok(outcome);
            }
            LoadPlan::Fetch(plan) => plan,
        };

        if !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }

        tracing::debug!(
            "{}: {} fetching page {} (size {})",
            self.kind,
            direction,
            plan.page,
            paging.page_size
        );
        let records = match self.remote.fetch_page(plan.page, paging.page_size).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "{}: {} fetch of page {} failed: {}",
                    self.kind,
                    direction,
                    plan.page,
                    e
                );
                return Err(e.into());
            }
        };

        let bounds = PageBounds::after_fetch(plan.page, records.len());
        let batch = MergeBatch::for_mode(
            self.kind,
            plan.write,
            records,
            &bounds,
            generation.unwrap_or_default(),
        );

        match self.store.commit(batch).await {
            Ok(summary) => {
                if plan.write == WriteMode::Extend {
                    tracing::debug!(
                        "{}: appended {} records from page {}",
                        self.kind,
                        summary.written,
                        plan.page
                    );
                } else {
                    tracing::info!(
                        "{}: refreshed page {} ({} written, {} removed, generation {})",
                        self.kind,
                        plan.page,
                        summary.written,
                        summary.deleted,
                        summary.generation.value()
                    );
                }
                Ok(MergeOutcome {
                    end_of_pagination_reached: bounds.end_reached,
                })
            }
            Err(StorageError::StaleGeneration(stale)) => {
                tracing::warn!(
                    "{}: dropped page {} fetched before a refresh ({})",
                    self.kind,
                    plan.page,
                    stale
                );
                Ok(MergeOutcome::more())
            }
            Err(e) => Err(e.into()),
        }
    }
}
