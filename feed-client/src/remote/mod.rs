//! Remote list API abstraction.
//!
//! The mediator never talks to a concrete HTTP client. It is handed a
//! [`RemoteSource`] per resource kind, which fetches one page at a time.
//!
//! # Design
//!
//! The trait is async and stateless from the caller's point of view:
//! - `fetch_page(page, size)` returns the records of that page, newest first
//! - an empty page means there is no more data
//! - timeouts are the source's own business; the mediator adds none
//!
//! # Example
//!
//! ```ignore
//! let remote = MockRemote::with_records(posts);
//! let first = remote.fetch_page(PageKey::FIRST, 20).await?;
//! ```

mod mock;

pub use mock::MockRemote;

use async_trait::async_trait;
use feed_types::{PageKey, Record, RemoteError};
use std::sync::Arc;

/// Source of remote pages for one resource kind.
///
/// Implementations wrap the API client (HTTP, gRPC, mock, etc).
#[async_trait]
pub trait RemoteSource<R: Record>: Send + Sync {
    /// Fetch the records of `page`, at most `size` of them.
    async fn fetch_page(&self, page: PageKey, size: u32) -> Result<Vec<R>, RemoteError>;
}

#[async_trait]
impl<R, T> RemoteSource<R> for Arc<T>
where
    R: Record,
    T: RemoteSource<R> + ?Sized,
{
    async fn fetch_page(&self, page: PageKey, size: u32) -> Result<Vec<R>, RemoteError> {
        (**self).fetch_page(page, size).await
    }
}
