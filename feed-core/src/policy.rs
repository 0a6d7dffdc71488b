//! Per-resource sync policies.
//!
//! Every resource kind runs the same mediation algorithm. What differs is a
//! small table of choices, captured by [`SyncPolicy`] and injected into the
//! mediator:
//!
//! | kind      | refresh            | initialize     |
//! |-----------|--------------------|----------------|
//! | Feed      | `ResumeFromAnchor` | `AlwaysRefresh` |
//! | MyPosts   | `Reconcile`        | `SkipIfCached` |
//! | Directory | `FirstPage`        | `SkipIfCached` |
//!
//! The initialize column is not uniform across kinds. That divergence is
//! kept as-is and is overridable from configuration.

use feed_types::{CursorEntry, PageKey, ResourceKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default pause before an append fetch.
pub const DEFAULT_APPEND_DELAY: Duration = Duration::from_millis(1000);

/// How a refresh picks its remote page and writes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Always reload page 1 and replace the cache.
    FirstPage,
    /// Reload the page the anchor record came from and replace the cache.
    ResumeFromAnchor,
    /// Reload page 1 and delete only cached ids missing from it.
    Reconcile,
}

/// Whether a mediator launches a refresh before its first load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializePolicy {
    /// Reuse a non-empty cache as-is; refresh only an empty one.
    SkipIfCached,
    /// Refresh on every start.
    AlwaysRefresh,
}

/// Result of [`SyncPolicy::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    /// Serve the cache without an initial refresh.
    SkipInitialRefresh,
    /// Run a refresh before serving.
    LaunchInitialRefresh,
}

/// The strategy injected into a mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Refresh behavior.
    pub refresh: RefreshPolicy,
    /// Initialize behavior.
    pub initialize: InitializePolicy,
    /// Pause applied before every append fetch.
    pub append_delay: Duration,
}

impl SyncPolicy {
    /// Create a policy with the default append delay.
    pub fn new(refresh: RefreshPolicy, initialize: InitializePolicy) -> Self {
        Self {
            refresh,
            initialize,
            append_delay: DEFAULT_APPEND_DELAY,
        }
    }

    /// The default policy for a resource kind.
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Feed => Self::new(
                RefreshPolicy::ResumeFromAnchor,
                InitializePolicy::AlwaysRefresh,
            ),
            ResourceKind::MyPosts => {
                Self::new(RefreshPolicy::Reconcile, InitializePolicy::SkipIfCached)
            }
            ResourceKind::Directory => {
                Self::new(RefreshPolicy::FirstPage, InitializePolicy::SkipIfCached)
            }
        }
    }

    /// Set the append pacing delay.
    pub fn with_append_delay(mut self, delay: Duration) -> Self {
        self.append_delay = delay;
        self
    }

    /// Decide whether to refresh before the first load.
    pub fn initialize(&self, cache_is_empty: bool) -> InitializeAction {
        match self.initialize {
            InitializePolicy::AlwaysRefresh => InitializeAction::LaunchInitialRefresh,
            InitializePolicy::SkipIfCached if cache_is_empty => {
                InitializeAction::LaunchInitialRefresh
            }
            InitializePolicy::SkipIfCached => InitializeAction::SkipInitialRefresh,
        }
    }

    /// Remote page a refresh fetches, given the anchor record's cursor.
    pub fn resolve_refresh_page(&self, anchor: Option<&CursorEntry>) -> PageKey {
        match self.refresh {
            RefreshPolicy::FirstPage | RefreshPolicy::Reconcile => PageKey::FIRST,
            RefreshPolicy::ResumeFromAnchor => anchor
                .and_then(|entry| entry.next_page)
                .and_then(|next| next.prev())
                .unwrap_or(PageKey::FIRST),
        }
    }

    /// Remote page an append fetches, given the last loaded record's cursor.
    ///
    /// `None` means the end of data: either the record has no cursor entry
    /// or its page was the last one.
    pub fn resolve_append_page(&self, last: Option<&CursorEntry>) -> Option<PageKey> {
        last.and_then(|entry| entry.next_page)
    }

    /// Whether a refresh reconciles instead of replacing.
    pub fn reconciles(&self) -> bool {
        self.refresh == RefreshPolicy::Reconcile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::RecordId;

    fn entry(next: Option<u32>) -> CursorEntry {
        CursorEntry {
            id: RecordId::new(1),
            prev_page: None,
            next_page: next.map(PageKey::new),
        }
    }

    #[test]
    fn default_table() {
        assert_eq!(
            SyncPolicy::for_kind(ResourceKind::Feed).refresh,
            RefreshPolicy::ResumeFromAnchor
        );
        assert!(SyncPolicy::for_kind(ResourceKind::MyPosts).reconciles());
        assert_eq!(
            SyncPolicy::for_kind(ResourceKind::Directory).initialize,
            InitializePolicy::SkipIfCached
        );
    }

    #[test]
    fn skip_if_cached_refreshes_empty_cache_only() {
        let policy = SyncPolicy::for_kind(ResourceKind::Directory);
        assert_eq!(
            policy.initialize(true),
            InitializeAction::LaunchInitialRefresh
        );
        assert_eq!(policy.initialize(false), InitializeAction::SkipInitialRefresh);
    }

    #[test]
    fn always_refresh_ignores_cache() {
        let policy = SyncPolicy::for_kind(ResourceKind::Feed);
        assert_eq!(
            policy.initialize(false),
            InitializeAction::LaunchInitialRefresh
        );
    }

    #[test]
    fn resume_uses_next_minus_one() {
        let policy = SyncPolicy::for_kind(ResourceKind::Feed);
        assert_eq!(
            policy.resolve_refresh_page(Some(&entry(Some(4)))),
            PageKey::new(3)
        );
    }

    #[test]
    fn resume_falls_back_to_first_page() {
        let policy = SyncPolicy::for_kind(ResourceKind::Feed);
        assert_eq!(policy.resolve_refresh_page(None), PageKey::FIRST);
        assert_eq!(
            policy.resolve_refresh_page(Some(&entry(None))),
            PageKey::FIRST
        );
    }

    #[test]
    fn first_page_policy_ignores_anchor() {
        let policy = SyncPolicy::for_kind(ResourceKind::Directory);
        assert_eq!(
            policy.resolve_refresh_page(Some(&entry(Some(9)))),
            PageKey::FIRST
        );
    }

    #[test]
    fn append_without_cursor_is_end() {
        let policy = SyncPolicy::for_kind(ResourceKind::Feed);
        assert_eq!(policy.resolve_append_page(None), None);
        assert_eq!(policy.resolve_append_page(Some(&entry(None))), None);
        assert_eq!(
            policy.resolve_append_page(Some(&entry(Some(2)))),
            Some(PageKey::new(2))
        );
    }

    #[test]
    fn policies_parse_from_toml() {
        #[derive(Deserialize)]
        struct Row {
            refresh: RefreshPolicy,
            initialize: InitializePolicy,
        }
        let row: Row =
            toml::from_str("refresh = \"reconcile\"\ninitialize = \"always_refresh\"").unwrap();
        assert_eq!(row.refresh, RefreshPolicy::Reconcile);
        assert_eq!(row.initialize, InitializePolicy::AlwaysRefresh);
    }
}
