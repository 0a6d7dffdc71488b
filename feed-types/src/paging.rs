//! Paging bookkeeping types.

use crate::{PageKey, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote paging metadata for one cached record.
///
/// Written in the same transaction as the record it describes. A record
/// without an entry is a boundary: paging cannot continue past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorEntry {
    /// The record this entry belongs to.
    pub id: RecordId,
    /// Remote page preceding the one the record came from.
    pub prev_page: Option<PageKey>,
    /// Remote page following the one the record came from.
    pub next_page: Option<PageKey>,
}

impl CursorEntry {
    /// Create an entry for a record fetched as part of `page`.
    ///
    /// `end_reached` clears the next pointer.
    pub fn for_page(id: RecordId, page: PageKey, end_reached: bool) -> Self {
        Self {
            id,
            prev_page: page.prev(),
            next_page: if end_reached { None } else { Some(page.next()) },
        }
    }
}

/// Which end of the window a load extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadDirection {
    /// Reload the visible window, possibly replacing cached data.
    Refresh,
    /// Load data preceding the first loaded item. Always terminal.
    Prepend,
    /// Load data following the last loaded item.
    Append,
}

impl fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refresh => f.write_str("refresh"),
            Self::Prepend => f.write_str("prepend"),
            Self::Append => f.write_str("append"),
        }
    }
}

/// Successful result of one mediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// No more data is available in the requested direction.
    pub end_of_pagination_reached: bool,
}

impl MergeOutcome {
    /// Outcome signalling the end of data in this direction.
    pub fn end() -> Self {
        Self {
            end_of_pagination_reached: true,
        }
    }

    /// Outcome signalling more data may follow.
    pub fn more() -> Self {
        Self {
            end_of_pagination_reached: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_entry_has_no_prev() {
        let entry = CursorEntry::for_page(RecordId::new(1), PageKey::FIRST, false);
        assert_eq!(entry.prev_page, None);
        assert_eq!(entry.next_page, Some(PageKey::new(2)));
    }

    #[test]
    fn end_of_data_clears_next() {
        let entry = CursorEntry::for_page(RecordId::new(1), PageKey::new(4), true);
        assert_eq!(entry.prev_page, Some(PageKey::new(3)));
        assert_eq!(entry.next_page, None);
    }

    #[test]
    fn direction_display() {
        assert_eq!(LoadDirection::Append.to_string(), "append");
    }
}
