//! Mock remote for testing.
//!
//! Serves pages out of an in-memory data set and records every request.

use super::RemoteSource;
use async_trait::async_trait;
use feed_types::{PageKey, Record, RemoteError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock remote for testing.
///
/// Records are served newest first (descending id), sliced into pages by
/// the requested size. Failures can be queued for upcoming requests.
#[derive(Debug)]
pub struct MockRemote<R> {
    inner: Arc<Mutex<MockRemoteInner<R>>>,
}

#[derive(Debug)]
struct MockRemoteInner<R> {
    records: Vec<R>,
    requests: Vec<(PageKey, u32)>,
    failures: VecDeque<RemoteError>,
}

impl<R: Record> MockRemote<R> {
    /// Create a mock remote with no data.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a mock remote serving the given records.
    pub fn with_records(records: Vec<R>) -> Self {
        let remote = Self {
            inner: Arc::new(Mutex::new(MockRemoteInner {
                records: Vec::new(),
                requests: Vec::new(),
                failures: VecDeque::new(),
            })),
        };
        remote.set_records(records);
        remote
    }

    /// Replace the server-side data set.
    pub fn set_records(&self, mut records: Vec<R>) {
        records.sort_by_key(|record| std::cmp::Reverse(record.id()));
        let mut inner = self.inner.lock().unwrap();
        inner.records = records;
    }

    /// Remove a record from the server-side data set.
    pub fn remove(&self, id: feed_types::RecordId) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.retain(|record| record.id() != id);
    }

    /// Cause the next fetch to fail with the given error.
    pub fn fail_next(&self, error: RemoteError) {
        let mut inner = self.inner.lock().unwrap();
        inner.failures.push_back(error);
    }

    /// Get all `(page, size)` requests that were made.
    pub fn requests(&self) -> Vec<(PageKey, u32)> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Number of fetches made so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }
}

impl<R: Record> Default for MockRemote<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for MockRemote<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<R: Record> RemoteSource<R> for MockRemote<R> {
    async fn fetch_page(&self, page: PageKey, size: u32) -> Result<Vec<R>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push((page, size));

        // Check for forced failure
        if let Some(error) = inner.failures.pop_front() {
            return Err(error);
        }

        if size == 0 {
            return Err(RemoteError::InvalidRequest("page size must be positive".into()));
        }

        let start = usize::try_from(page.offset(size)).unwrap_or(usize::MAX);
        Ok(inner
            .records
            .iter()
            .skip(start)
            .take(size as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::{Post, RecordId};

    fn post(id: i64) -> Post {
        Post {
            id: RecordId::new(id),
            author_id: RecordId::new(1),
            title: format!("post {id}"),
            body: String::new(),
            created_at: id,
        }
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id.value()).collect()
    }

    #[tokio::test]
    async fn serves_pages_newest_first() {
        let remote = MockRemote::with_records((1..=7).map(post).collect());

        let first = remote.fetch_page(PageKey::FIRST, 3).await.unwrap();
        let third = remote.fetch_page(PageKey::new(3), 3).await.unwrap();

        assert_eq!(ids(&first), vec![7, 6, 5]);
        assert_eq!(ids(&third), vec![1]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let remote = MockRemote::with_records((1..=3).map(post).collect());
        let page = remote.fetch_page(PageKey::new(5), 3).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn records_requests() {
        let remote = MockRemote::<Post>::new();
        remote.fetch_page(PageKey::FIRST, 20).await.unwrap();
        remote.fetch_page(PageKey::new(2), 20).await.unwrap();

        assert_eq!(
            remote.requests(),
            vec![(PageKey::FIRST, 20), (PageKey::new(2), 20)]
        );
    }

    #[tokio::test]
    async fn forced_failure_applies_once() {
        let remote = MockRemote::with_records(vec![post(1)]);
        remote.fail_next(RemoteError::Network("unreachable".into()));

        let result = remote.fetch_page(PageKey::FIRST, 10).await;
        assert!(matches!(result, Err(RemoteError::Network(_))));

        // Next fetch should work
        assert_eq!(remote.fetch_page(PageKey::FIRST, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn zero_size_is_invalid_request() {
        let remote = MockRemote::with_records(vec![post(1)]);
        let result = remote.fetch_page(PageKey::FIRST, 0).await;
        assert!(matches!(result, Err(RemoteError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let remote1 = MockRemote::with_records(vec![post(1), post(2)]);
        let remote2 = remote1.clone();

        remote2.remove(RecordId::new(2));
        remote1.fetch_page(PageKey::FIRST, 10).await.unwrap();

        assert_eq!(remote2.request_count(), 1);
        assert_eq!(
            ids(&remote1.fetch_page(PageKey::FIRST, 10).await.unwrap()),
            vec![1]
        );
    }
}
