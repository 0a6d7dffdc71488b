//! The consumer's window of locally loaded pages.
//!
//! A paged view reads the cache in local pages of `page_size` records,
//! newest first. The window keeps those pages in order together with their
//! neighbour keys, so it can tell whether more cached data exists before or
//! after it and where a refresh should resume.

use feed_types::PageKey;

/// One page read from the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPage<R> {
    /// Key of this page.
    pub key: PageKey,
    /// Key of the preceding local page, if any.
    pub prev_key: Option<PageKey>,
    /// Key of the following local page, if the cache may hold one.
    pub next_key: Option<PageKey>,
    /// Records in presentation order.
    pub items: Vec<R>,
}

impl<R> LocalPage<R> {
    /// Build a page from a read of `page_size` rows at `key`.
    ///
    /// A full page may be followed by more cached rows; a short page is the
    /// end of the cache.
    pub fn loaded(key: PageKey, items: Vec<R>, page_size: u32) -> Self {
        let full = items.len() >= page_size as usize && page_size > 0;
        Self {
            key,
            prev_key: key.prev(),
            next_key: if full { Some(key.next()) } else { None },
            items,
        }
    }
}

/// Ordered pages currently presented to the consumer.
#[derive(Debug, Clone)]
pub struct PagingWindow<R> {
    pages: Vec<LocalPage<R>>,
}

impl<R> Default for PagingWindow<R> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<R> PagingWindow<R> {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole window with a single page.
    pub fn reset(&mut self, page: LocalPage<R>) {
        self.pages.clear();
        self.pages.push(page);
    }

    /// Add a page after the last one.
    pub fn push_back(&mut self, page: LocalPage<R>) {
        self.pages.push(page);
    }

    /// Add a page before the first one.
    pub fn push_front(&mut self, page: LocalPage<R>) {
        self.pages.insert(0, page);
    }

    /// Replace the last page, used when it grew after an append merge.
    pub fn replace_last(&mut self, page: LocalPage<R>) {
        match self.pages.last_mut() {
            Some(last) => *last = page,
            None => self.pages.push(page),
        }
    }

    /// Loaded pages in order.
    pub fn pages(&self) -> &[LocalPage<R>] {
        &self.pages
    }

    /// The first loaded page.
    pub fn first_page(&self) -> Option<&LocalPage<R>> {
        self.pages.first()
    }

    /// The last loaded page.
    pub fn last_page(&self) -> Option<&LocalPage<R>> {
        self.pages.last()
    }

    /// All records in presentation order.
    pub fn items(&self) -> impl Iterator<Item = &R> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    /// Number of records in the window.
    pub fn len(&self) -> usize {
        self.pages.iter().map(|page| page.items.len()).sum()
    }

    /// Check if the window holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at a position of the flattened window.
    pub fn item_at(&self, position: usize) -> Option<&R> {
        self.items().nth(position)
    }

    /// The last record of the window.
    pub fn last_item(&self) -> Option<&R> {
        self.pages.iter().rev().find_map(|page| page.items.last())
    }

    /// The page containing `anchor_position`, or the nearest one.
    ///
    /// Positions past the end resolve to the last page.
    pub fn closest_page_to(&self, anchor_position: usize) -> Option<&LocalPage<R>> {
        let mut seen = 0usize;
        for page in &self.pages {
            seen += page.items.len();
            if anchor_position < seen {
                return Some(page);
            }
        }
        self.pages.last()
    }

    /// Key to reload from when the window is refreshed around an anchor.
    ///
    /// `prev_key + 1` of the nearest page if it has one, else its
    /// `next_key - 1`, else `None` (no informed resume point).
    pub fn refresh_key(&self, anchor_position: Option<usize>) -> Option<PageKey> {
        let page = self.closest_page_to(anchor_position?)?;
        page.prev_key
            .map(|prev| prev.next())
            .or_else(|| page.next_key.and_then(|next| next.prev()))
    }
}
