//! Load planning for the sync mediator.
//!
//! [`LoadPlan::decide`] is the mediator's decision table. It is evaluated in
//! a fixed order:
//!
//! 1. offline and not a refresh: end of pagination, no fetch
//! 2. prepend: end of pagination, no fetch (nothing precedes page 1)
//! 3. append: fetch the last record's `next_page` after the pacing delay,
//!    or end of pagination when there is none
//! 4. refresh: fetch the page chosen by the refresh policy
//!
//! The caller resolves the cursor entry named by [`CursorLookup`] before
//! asking for a plan, so the plan itself stays pure.

use crate::policy::SyncPolicy;
use feed_types::{CursorEntry, LoadDirection, MergeOutcome, PageKey};
use std::time::Duration;

/// Which cursor entry the mediator must load before planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorLookup {
    /// The plan does not depend on any cursor.
    None,
    /// The cursor of the record nearest the consumer's anchor.
    Anchor,
    /// The cursor of the last record in the consumer's window.
    LastLoaded,
}

impl CursorLookup {
    /// Lookup required for a request, or `None` when the plan short-circuits.
    pub fn for_request(policy: &SyncPolicy, direction: LoadDirection, online: bool) -> Self {
        match direction {
            _ if !online && direction != LoadDirection::Refresh => Self::None,
            LoadDirection::Prepend => Self::None,
            LoadDirection::Append => Self::LastLoaded,
            LoadDirection::Refresh => match policy.refresh {
                crate::RefreshPolicy::ResumeFromAnchor => Self::Anchor,
                _ => Self::None,
            },
        }
    }
}

/// How a fetched page is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Clear the partition, then insert the page.
    ReplaceAll,
    /// Delete cached ids absent from the page, then upsert the page.
    Reconcile,
    /// Upsert the page next to existing data.
    Extend,
}

/// A fetch the mediator must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Remote page to request.
    pub page: PageKey,
    /// Pause before requesting it.
    pub delay: Duration,
    /// How to merge the result.
    pub write: WriteMode,
}

/// What the mediator does for one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPlan {
    /// Answer immediately without touching the remote or the store.
    Skip(MergeOutcome),
    /// Fetch a page and merge it.
    Fetch(FetchPlan),
}

impl LoadPlan {
    /// Evaluate the decision table.
    ///
    /// `cursor` is the entry requested by [`CursorLookup::for_request`], or
    /// `None` when it was not needed or not found.
    pub fn decide(
        policy: &SyncPolicy,
        direction: LoadDirection,
        online: bool,
        cursor: Option<&CursorEntry>,
    ) -> Self {
        if !online && direction != LoadDirection::Refresh {
            return Self::Skip(MergeOutcome::end());
        }

        match direction {
            LoadDirection::Prepend => Self::Skip(MergeOutcome::end()),
            LoadDirection::Append => match policy.resolve_append_page(cursor) {
                Some(page) => Self::Fetch(FetchPlan {
                    page,
                    delay: policy.append_delay,
                    write: WriteMode::Extend,
                }),
                None => Self::Skip(MergeOutcome::end()),
            },
            LoadDirection::Refresh => Self::Fetch(FetchPlan {
                page: policy.resolve_refresh_page(cursor),
                delay: Duration::ZERO,
                write: if policy.reconciles() {
                    WriteMode::Reconcile
                } else {
                    WriteMode::ReplaceAll
                },
            }),
        }
    }

    /// Whether this plan touches the remote.
    pub fn fetches(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{InitializePolicy, RefreshPolicy};
    use feed_types::{RecordId, ResourceKind};

    fn policy(refresh: RefreshPolicy) -> SyncPolicy {
        SyncPolicy::new(refresh, InitializePolicy::SkipIfCached)
            .with_append_delay(Duration::from_millis(250))
    }

    fn cursor(next: Option<u32>) -> CursorEntry {
        CursorEntry {
            id: RecordId::new(10),
            prev_page: None,
            next_page: next.map(PageKey::new),
        }
    }

    #[test]
    fn offline_append_is_end_without_fetch() {
        let plan = LoadPlan::decide(
            &policy(RefreshPolicy::FirstPage),
            LoadDirection::Append,
            false,
            Some(&cursor(Some(2))),
        );
        assert_eq!(plan, LoadPlan::Skip(MergeOutcome::end()));
    }

    #[test]
    fn offline_refresh_still_fetches() {
        let plan = LoadPlan::decide(
            &policy(RefreshPolicy::FirstPage),
            LoadDirection::Refresh,
            false,
            None,
        );
        assert!(plan.fetches());
    }

    #[test]
    fn prepend_is_always_terminal() {
        for online in [true, false] {
            for refresh in [
                RefreshPolicy::FirstPage,
                RefreshPolicy::ResumeFromAnchor,
                RefreshPolicy::Reconcile,
            ] {
                let plan = LoadPlan::decide(
                    &policy(refresh),
                    LoadDirection::Prepend,
                    online,
                    Some(&cursor(Some(5))),
                );
                assert_eq!(plan, LoadPlan::Skip(MergeOutcome::end()));
            }
        }
    }

    #[test]
    fn append_fetches_next_page_after_delay() {
        let plan = LoadPlan::decide(
            &policy(RefreshPolicy::FirstPage),
            LoadDirection::Append,
            true,
            Some(&cursor(Some(3))),
        );
        assert_eq!(
            plan,
            LoadPlan::Fetch(FetchPlan {
                page: PageKey::new(3),
                delay: Duration::from_millis(250),
                write: WriteMode::Extend,
            })
        );
    }

    #[test]
    fn append_without_cursor_entry_is_end() {
        let plan = LoadPlan::decide(
            &policy(RefreshPolicy::FirstPage),
            LoadDirection::Append,
            true,
            None,
        );
        assert_eq!(plan, LoadPlan::Skip(MergeOutcome::end()));
    }

    #[test]
    fn append_past_last_page_is_end() {
        let plan = LoadPlan::decide(
            &policy(RefreshPolicy::FirstPage),
            LoadDirection::Append,
            true,
            Some(&cursor(None)),
        );
        assert_eq!(plan, LoadPlan::Skip(MergeOutcome::end()));
    }

    #[test]
    fn refresh_write_mode_follows_policy() {
        let replace = LoadPlan::decide(
            &policy(RefreshPolicy::FirstPage),
            LoadDirection::Refresh,
            true,
            None,
        );
        let reconcile = LoadPlan::decide(
            &policy(RefreshPolicy::Reconcile),
            LoadDirection::Refresh,
            true,
            None,
        );
        assert!(matches!(
            replace,
            LoadPlan::Fetch(FetchPlan {
                write: WriteMode::ReplaceAll,
                delay: Duration::ZERO,
                ..
            })
        ));
        assert!(matches!(
            reconcile,
            LoadPlan::Fetch(FetchPlan {
                write: WriteMode::Reconcile,
                ..
            })
        ));
    }

    #[test]
    fn resume_refresh_targets_anchor_page() {
        let plan = LoadPlan::decide(
            &SyncPolicy::for_kind(ResourceKind::Feed),
            LoadDirection::Refresh,
            true,
            Some(&cursor(Some(5))),
        );
        assert!(matches!(
            plan,
            LoadPlan::Fetch(FetchPlan { page, .. }) if page == PageKey::new(4)
        ));
    }

    #[test]
    fn lookup_matches_direction() {
        let feed = SyncPolicy::for_kind(ResourceKind::Feed);
        let users = SyncPolicy::for_kind(ResourceKind::Directory);
        assert_eq!(
            CursorLookup::for_request(&feed, LoadDirection::Refresh, true),
            CursorLookup::Anchor
        );
        assert_eq!(
            CursorLookup::for_request(&users, LoadDirection::Refresh, true),
            CursorLookup::None
        );
        assert_eq!(
            CursorLookup::for_request(&users, LoadDirection::Append, true),
            CursorLookup::LastLoaded
        );
        assert_eq!(
            CursorLookup::for_request(&users, LoadDirection::Append, false),
            CursorLookup::None
        );
        assert_eq!(
            CursorLookup::for_request(&feed, LoadDirection::Prepend, true),
            CursorLookup::None
        );
    }
}
