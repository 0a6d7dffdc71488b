//! PagedView - the consumer side of one resource stream.
//!
//! A view reads the local cache in pages of `page_size` records, newest
//! first, and only asks its [`SyncMediator`] for remote data when the cache
//! runs out in the requested direction. The cache is the single source of
//! truth: whatever a merge commits becomes visible on the next local read.

use crate::error::MediatorError;
use crate::mediator::{PagingState, SyncMediator};
use crate::reachability::Reachability;
use crate::remote::RemoteSource;
use feed_core::{InitializeAction, LoadState, LoadStates, LocalPage, PagingWindow};
use feed_types::{LoadDirection, MergeOutcome, PageKey, Record};
use std::sync::Arc;

/// Paged, cache-backed view over one resource kind.
pub struct PagedView<R, S, N> {
    mediator: Arc<SyncMediator<R, S, N>>,
    page_size: u32,
    window: PagingWindow<R>,
}

impl<R, S, N> PagedView<R, S, N>
where
    R: Record,
    S: RemoteSource<R>,
    N: Reachability,
{
    /// Create a view with an empty window.
    pub fn new(mediator: Arc<SyncMediator<R, S, N>>, page_size: u32) -> Self {
        Self {
            mediator,
            page_size,
            window: PagingWindow::new(),
        }
    }

    /// Show the first cached page, then run the initial refresh if the
    /// policy asks for one.
    ///
    /// A failed initial refresh is not returned: the cached page stays on
    /// screen and the failure is visible in [`PagedView::load_states`].
    pub async fn start(&mut self) -> Result<InitializeAction, MediatorError> {
        let first = self.load_page(PageKey::FIRST).await?;
        self.window.reset(first);

        let action = self.mediator.initialize().await?;
        if action == InitializeAction::LaunchInitialRefresh {
            if let Err(e) = self.refresh(None).await {
                tracing::warn!("{}: initial refresh failed: {}", self.mediator.kind(), e);
            }
        }
        Ok(action)
    }

    /// Local page a refresh around `anchor_position` reloads from.
    pub fn refresh_key(&self, anchor_position: Option<usize>) -> Option<PageKey> {
        self.window.refresh_key(anchor_position)
    }

    /// Refresh from the remote, then rebuild the window from the refresh key.
    ///
    /// The window is rebuilt from the cache even when the refresh fails, so
    /// the consumer keeps its place on whatever is cached.
    pub async fn refresh(
        &mut self,
        anchor_position: Option<usize>,
    ) -> Result<MergeOutcome, MediatorError> {
        let key = self.refresh_key(anchor_position).unwrap_or(PageKey::FIRST);
        let paging = self
            .paging_state()
            .with_anchor(anchor_position.and_then(|p| self.window.item_at(p)).map(Record::id));

        let result = self.mediator.mediate(LoadDirection::Refresh, &paging).await;

        let mut page = self.load_page(key).await?;
        if page.items.is_empty() && !key.is_first() {
            page = self.load_page(PageKey::FIRST).await?;
        }
        self.window.reset(page);

        result
    }

    /// Load more data in a direction.
    ///
    /// Cached pages are served first; the mediator is only consulted once
    /// the cache has nothing more in that direction.
    pub async fn read(&mut self, direction: LoadDirection) -> Result<MergeOutcome, MediatorError> {
        match direction {
            LoadDirection::Refresh => self.refresh(None).await,
            LoadDirection::Prepend => self.prepend().await,
            LoadDirection::Append => self.append().await,
        }
    }

    async fn prepend(&mut self) -> Result<MergeOutcome, MediatorError> {
        if let Some(prev) = self.window.first_page().and_then(|page| page.prev_key) {
            let page = self.load_page(prev).await?;
            self.window.push_front(page);
            return Ok(MergeOutcome {
                end_of_pagination_reached: prev.is_first(),
            });
        }

        self.mediator
            .mediate(LoadDirection::Prepend, &self.paging_state())
            .await
    }

    async fn append(&mut self) -> Result<MergeOutcome, MediatorError> {
        if self.extend_from_cache().await? {
            return Ok(MergeOutcome::more());
        }

        let outcome = self
            .mediator
            .mediate(LoadDirection::Append, &self.paging_state())
            .await?;

        // The merge may have filled the short last page before adding new ones.
        match self.window.last_page().map(|page| page.key) {
            Some(key) => {
                let page = self.load_page(key).await?;
                self.window.replace_last(page);
            }
            None => {
                let page = self.load_page(PageKey::FIRST).await?;
                self.window.reset(page);
            }
        }
        while self.extend_from_cache().await? {}

        Ok(outcome)
    }

    /// Push the next cached page onto the window, if there is one.
    async fn extend_from_cache(&mut self) -> Result<bool, MediatorError> {
        let Some(next) = self.window.last_page().and_then(|page| page.next_key) else {
            return Ok(false);
        };
        let page = self.load_page(next).await?;
        if page.items.is_empty() {
            return Ok(false);
        }
        self.window.push_back(page);
        Ok(true)
    }

    async fn load_page(&self, key: PageKey) -> Result<LocalPage<R>, MediatorError> {
        let items = self
            .mediator
            .store()
            .read_paged(self.mediator.kind(), self.page_size, key.offset(self.page_size))
            .await?;
        Ok(LocalPage::loaded(key, items, self.page_size))
    }

    fn paging_state(&self) -> PagingState {
        PagingState::new(self.page_size)
            .with_last_loaded(self.window.last_item().map(Record::id))
    }

    /// Records currently presented, in order.
    pub fn snapshot(&self) -> Vec<R> {
        self.window.items().cloned().collect()
    }

    /// Loaded local pages.
    pub fn pages(&self) -> &[LocalPage<R>] {
        self.window.pages()
    }

    /// Number of records presented.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if nothing is presented.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Per-direction load states.
    pub async fn load_states(&self) -> LoadStates {
        self.mediator.load_states().await
    }

    /// Load state of one direction.
    pub async fn load_state(&self, direction: LoadDirection) -> LoadState {
        self.mediator.load_states().await.get(direction).clone()
    }

    /// Check if any direction is fetching from the remote.
    pub async fn is_loading(&self) -> bool {
        self.mediator.load_states().await.any_loading()
    }

    /// Check if the last fetch in `direction` hit the end of the data.
    pub async fn is_end_reached(&self, direction: LoadDirection) -> bool {
        self.load_state(direction).await.is_end_reached()
    }

    /// Mark a finished or failed direction as seen.
    pub async fn acknowledge(&self, direction: LoadDirection) {
        self.mediator.acknowledge(direction).await;
    }

    /// The mediator behind this view.
    pub fn mediator(&self) -> &Arc<SyncMediator<R, S, N>> {
        &self.mediator
    }
}
