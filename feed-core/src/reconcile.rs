//! Set-difference reconciliation against the server's first page.
//!
//! A reconciling refresh deletes exactly the cached ids that are absent from
//! the fresh first page, then upserts that page. Records cached from later
//! pages are compared against page 1 only, so an id that still exists on
//! page 2+ is deleted here and comes back when it is paged in again, while a
//! deletion on page 2+ of a record that is not re-fetched stays undetected.
//! That is the price of diffing a single page.

use feed_types::RecordId;
use std::collections::HashSet;

/// Cached ids absent from the server page, in ascending order.
pub fn stale_ids(local: &[RecordId], server: &[RecordId]) -> Vec<RecordId> {
    let server: HashSet<RecordId> = server.iter().copied().collect();
    let mut stale: Vec<RecordId> = local
        .iter()
        .copied()
        .filter(|id| !server.contains(id))
        .collect();
    stale.sort_unstable();
    stale.dedup();
    stale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[i64]) -> Vec<RecordId> {
        values.iter().copied().map(RecordId::new).collect()
    }

    #[test]
    fn removes_ids_missing_from_server() {
        assert_eq!(stale_ids(&ids(&[1, 2, 3]), &ids(&[2, 3, 4])), ids(&[1]));
    }

    #[test]
    fn nothing_stale_when_server_covers_cache() {
        assert!(stale_ids(&ids(&[2, 3]), &ids(&[1, 2, 3, 4])).is_empty());
    }

    #[test]
    fn empty_server_page_marks_everything_stale() {
        assert_eq!(stale_ids(&ids(&[5, 3, 9]), &[]), ids(&[3, 5, 9]));
    }

    #[test]
    fn cached_later_pages_are_diffed_against_page_one_only() {
        // Ids 21..=23 came from page 2; page 1 does not list them, so they go.
        let local = ids(&[1, 2, 21, 22, 23]);
        let server = ids(&[1, 2]);
        assert_eq!(stale_ids(&local, &server), ids(&[21, 22, 23]));
    }
}
