//! FeedRepository - the three resource streams over one shared cache.

use crate::config::FeedConfig;
use crate::error::{MediatorError, StorageError};
use crate::mediator::SyncMediator;
use crate::paged::PagedView;
use crate::reachability::{ConnectivityStream, Reachability};
use crate::remote::RemoteSource;
use crate::store::SqliteStore;
use feed_types::{Post, ResourceKind, User};
use std::sync::Arc;

/// Mediator of a post stream.
pub type PostMediator = SyncMediator<Post, Arc<dyn RemoteSource<Post>>, Arc<dyn Reachability>>;
/// Mediator of the user directory.
pub type UserMediator = SyncMediator<User, Arc<dyn RemoteSource<User>>, Arc<dyn Reachability>>;
/// View of a post stream.
pub type PostView = PagedView<Post, Arc<dyn RemoteSource<Post>>, Arc<dyn Reachability>>;
/// View of the user directory.
pub type UserView = PagedView<User, Arc<dyn RemoteSource<User>>, Arc<dyn Reachability>>;

/// Remote sources of the three streams.
#[derive(Clone)]
pub struct Remotes {
    /// General feed.
    pub feed: Arc<dyn RemoteSource<Post>>,
    /// The user's own posts.
    pub my_posts: Arc<dyn RemoteSource<Post>>,
    /// User directory.
    pub directory: Arc<dyn RemoteSource<User>>,
}

/// Entry point for applications.
///
/// Owns one mediator per resource kind. All of them share the store and the
/// reachability source; each writes only its own partition.
pub struct FeedRepository {
    store: SqliteStore,
    reachability: Arc<dyn Reachability>,
    page_size: u32,
    feed: Arc<PostMediator>,
    my_posts: Arc<PostMediator>,
    directory: Arc<UserMediator>,
}

impl FeedRepository {
    /// Create a repository with the policies from `config`.
    pub fn new(
        store: SqliteStore,
        reachability: Arc<dyn Reachability>,
        remotes: Remotes,
        config: &FeedConfig,
    ) -> Self {
        let feed = SyncMediator::new(
            ResourceKind::Feed,
            config.policy_for(ResourceKind::Feed),
            remotes.feed,
            Arc::clone(&reachability),
            store.clone(),
        );
        let my_posts = SyncMediator::new(
            ResourceKind::MyPosts,
            config.policy_for(ResourceKind::MyPosts),
            remotes.my_posts,
            Arc::clone(&reachability),
            store.clone(),
        );
        let directory = SyncMediator::new(
            ResourceKind::Directory,
            config.policy_for(ResourceKind::Directory),
            remotes.directory,
            Arc::clone(&reachability),
            store.clone(),
        );

        Self {
            store,
            reachability,
            page_size: config.paging.page_size,
            feed: Arc::new(feed),
            my_posts: Arc::new(my_posts),
            directory: Arc::new(directory),
        }
    }

    /// Open the general feed.
    pub async fn feed(&self) -> Result<PostView, MediatorError> {
        let mut view = PagedView::new(Arc::clone(&self.feed), self.page_size);
        view.start().await?;
        Ok(view)
    }

    /// Open the user's own posts.
    pub async fn my_posts(&self) -> Result<PostView, MediatorError> {
        let mut view = PagedView::new(Arc::clone(&self.my_posts), self.page_size);
        view.start().await?;
        Ok(view)
    }

    /// Open the user directory.
    pub async fn directory(&self) -> Result<UserView, MediatorError> {
        let mut view = PagedView::new(Arc::clone(&self.directory), self.page_size);
        view.start().await?;
        Ok(view)
    }

    /// Mediator of the general feed.
    pub fn feed_mediator(&self) -> &Arc<PostMediator> {
        &self.feed
    }

    /// Mediator of the user's own posts.
    pub fn my_posts_mediator(&self) -> &Arc<PostMediator> {
        &self.my_posts
    }

    /// Mediator of the user directory.
    pub fn directory_mediator(&self) -> &Arc<UserMediator> {
        &self.directory
    }

    /// Drop every cached record of a kind.
    pub async fn clear_cache(&self, kind: ResourceKind) -> Result<u64, StorageError> {
        let deleted = self.store.clear(kind).await?;
        tracing::info!("{}: cleared {} cached records", kind, deleted);
        Ok(deleted)
    }

    /// Number of cached records of a kind.
    pub async fn cached_count(&self, kind: ResourceKind) -> Result<u64, StorageError> {
        self.store.count(kind).await
    }

    /// Connectivity changes, current value first.
    pub fn connectivity(&self) -> ConnectivityStream {
        self.reachability.observe()
    }

    /// Last known connectivity.
    pub fn is_online(&self) -> bool {
        self.reachability.is_online()
    }

    /// Records per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The shared store.
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reachability::ReachabilityObserver;
    use crate::remote::MockRemote;
    use feed_core::InitializeAction;
    use feed_types::{LoadDirection, RecordId};
    use tokio_stream::StreamExt;

    fn post(id: i64) -> Post {
        Post {
            id: RecordId::new(id),
            author_id: RecordId::new(1),
            title: format!("post {id}"),
            body: String::new(),
            created_at: id,
        }
    }

    fn user(id: i64) -> User {
        User {
            id: RecordId::new(id),
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            avatar_url: None,
        }
    }

    struct Fixture {
        repository: FeedRepository,
        feed: MockRemote<Post>,
        my_posts: MockRemote<Post>,
        directory: MockRemote<User>,
        reachability: ReachabilityObserver,
    }

    async fn fixture() -> Fixture {
        let feed = MockRemote::with_records((1..=30).map(post).collect());
        let my_posts = MockRemote::with_records((1..=4).map(post).collect());
        let directory = MockRemote::with_records((1..=8).map(user).collect());
        let reachability = ReachabilityObserver::default();

        let mut config = FeedConfig::default();
        config.paging.page_size = 10;
        config.paging.append_delay_ms = 0;

        let remotes = Remotes {
            feed: Arc::new(feed.clone()),
            my_posts: Arc::new(my_posts.clone()),
            directory: Arc::new(directory.clone()),
        };
        let store = SqliteStore::in_memory().await.unwrap();
        let repository =
            FeedRepository::new(store, Arc::new(reachability.clone()), remotes, &config);

        Fixture {
            repository,
            feed,
            my_posts,
            directory,
            reachability,
        }
    }

    #[tokio::test]
    async fn streams_use_separate_partitions() {
        let f = fixture().await;

        let feed = f.repository.feed().await.unwrap();
        let my_posts = f.repository.my_posts().await.unwrap();
        let directory = f.repository.directory().await.unwrap();

        assert_eq!(feed.len(), 10);
        assert_eq!(my_posts.len(), 4);
        assert_eq!(directory.len(), 8);
        assert_eq!(f.repository.cached_count(ResourceKind::Feed).await.unwrap(), 10);
        assert_eq!(f.repository.cached_count(ResourceKind::MyPosts).await.unwrap(), 4);
        assert_eq!(f.repository.cached_count(ResourceKind::Directory).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn initialize_differs_per_kind() {
        let f = fixture().await;
        f.repository.feed().await.unwrap();
        f.repository.directory().await.unwrap();

        // Feed always refreshes, the directory reuses its cache.
        f.repository.feed().await.unwrap();
        f.repository.directory().await.unwrap();

        assert_eq!(f.feed.request_count(), 2);
        assert_eq!(f.directory.request_count(), 1);
        assert_eq!(f.my_posts.request_count(), 0);
        assert_eq!(
            f.repository.directory_mediator().initialize().await.unwrap(),
            InitializeAction::SkipInitialRefresh
        );
    }

    #[tokio::test]
    async fn clear_cache_only_touches_one_kind() {
        let f = fixture().await;
        f.repository.feed().await.unwrap();
        f.repository.directory().await.unwrap();

        assert_eq!(f.repository.clear_cache(ResourceKind::Feed).await.unwrap(), 10);

        assert_eq!(f.repository.cached_count(ResourceKind::Feed).await.unwrap(), 0);
        assert_eq!(f.repository.cached_count(ResourceKind::Directory).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn offline_views_show_cache() {
        let f = fixture().await;
        let mut feed = f.repository.feed().await.unwrap();

        f.reachability.set_online(false);
        let outcome = feed.read(LoadDirection::Append).await.unwrap();

        assert!(outcome.end_of_pagination_reached);
        assert_eq!(feed.len(), 10);
        assert_eq!(f.feed.request_count(), 1);
    }

    #[tokio::test]
    async fn connectivity_stream_reports_changes() {
        let f = fixture().await;
        let mut changes = f.repository.connectivity();
        assert_eq!(changes.next().await, Some(true));

        f.reachability.set_online(false);
        assert_eq!(changes.next().await, Some(false));
        assert!(!f.repository.is_online());
    }
}
