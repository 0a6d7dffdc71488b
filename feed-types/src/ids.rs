//! Identity and page ordering types for offline-feed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable numeric identifier of a cached record.
///
/// Assigned by the remote API. Records are presented newest first, which
/// for every resource kind means descending `RecordId`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Create a new RecordId with the given value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this RecordId.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

/// A 1-based page index.
///
/// Used both for remote pages (what the list API is asked for) and for
/// local pages of the cached window (offset = `(key - 1) * size`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(u32);

impl PageKey {
    /// The first page. Nothing precedes it.
    pub const FIRST: PageKey = PageKey(1);

    /// Create a PageKey, clamping zero up to the first page.
    pub fn new(value: u32) -> Self {
        Self(value.max(1))
    }

    /// Get the numeric value of this PageKey.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether this is the first page.
    pub fn is_first(&self) -> bool {
        self.0 == 1
    }

    /// The preceding page, or `None` on the first page.
    pub fn prev(&self) -> Option<Self> {
        if self.is_first() {
            None
        } else {
            Some(Self(self.0 - 1))
        }
    }

    /// The following page.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Row offset of this page for the given page size.
    pub fn offset(&self, page_size: u32) -> u64 {
        u64::from(self.0 - 1) * u64::from(page_size)
    }
}

impl Default for PageKey {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageKey({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_ordering() {
        assert!(RecordId::new(10) > RecordId::new(9));
    }

    #[test]
    fn record_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RecordId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn page_key_zero_clamps_to_first() {
        assert_eq!(PageKey::new(0), PageKey::FIRST);
    }

    #[test]
    fn first_page_has_no_prev() {
        assert_eq!(PageKey::FIRST.prev(), None);
        assert_eq!(PageKey::new(3).prev(), Some(PageKey::new(2)));
    }

    #[test]
    fn page_key_next_saturates() {
        assert_eq!(PageKey::new(u32::MAX).next().value(), u32::MAX);
    }

    #[test]
    fn page_key_offset() {
        assert_eq!(PageKey::FIRST.offset(20), 0);
        assert_eq!(PageKey::new(3).offset(20), 40);
    }
}
