//! Cursor bookkeeping for fetched pages.
//!
//! Every record that arrives in a page gets a [`CursorEntry`] pointing at the
//! pages around the one it came from:
//! - `prev_page` is `None` on page 1, else `page - 1`
//! - `next_page` is `None` once the remote returned an empty page, else `page + 1`
//!
//! Entries are written in the same transaction as their records, so a
//! reader never sees one without the other.

use feed_types::{CursorEntry, PageKey, RecordId};

/// Paging bounds derived from one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    /// The fetched page.
    pub page: PageKey,
    /// The remote has no more data in this direction.
    pub end_reached: bool,
}

impl PageBounds {
    /// Bounds after fetching `page` and receiving `fetched` records.
    pub fn after_fetch(page: PageKey, fetched: usize) -> Self {
        Self {
            page,
            end_reached: fetched == 0,
        }
    }

    /// One cursor entry per record id, built by [`CursorEntry::for_page`].
    pub fn entries<I>(&self, ids: I) -> Vec<CursorEntry>
    where
        I: IntoIterator<Item = RecordId>,
    {
        ids.into_iter()
            .map(|id| CursorEntry::for_page(id, self.page, self.end_reached))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(page: u32, fetched: usize) -> CursorEntry {
        PageBounds::after_fetch(PageKey::new(page), fetched).entries([RecordId::new(9)])[0]
    }

    #[test]
    fn first_page_bounds() {
        let bounds = PageBounds::after_fetch(PageKey::FIRST, 10);
        assert!(!bounds.end_reached);

        let first = entry(1, 10);
        assert_eq!(first.prev_page, None);
        assert_eq!(first.next_page, Some(PageKey::new(2)));
    }

    #[test]
    fn empty_page_ends_pagination() {
        assert!(PageBounds::after_fetch(PageKey::new(3), 0).end_reached);

        let last = entry(3, 0);
        assert_eq!(last.prev_page, Some(PageKey::new(2)));
        assert_eq!(last.next_page, None);
    }

    #[test]
    fn short_page_does_not_end_pagination() {
        // Only an empty page signals the end; a short page may be followed by more.
        assert!(!PageBounds::after_fetch(PageKey::new(2), 3).end_reached);
        assert_eq!(entry(2, 3).next_page, Some(PageKey::new(3)));
    }

    #[test]
    fn entries_pair_every_id() {
        let bounds = PageBounds::after_fetch(PageKey::new(2), 5);
        let entries = bounds.entries((11..=15).map(RecordId::new));

        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.prev_page == Some(PageKey::FIRST)));
        assert!(entries.iter().all(|e| e.next_page == Some(PageKey::new(3))));
        assert_eq!(entries[4].id, RecordId::new(15));
    }
}
