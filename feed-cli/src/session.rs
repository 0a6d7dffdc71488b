//! Wiring of the repository used by every command.

use anyhow::{Context, Result};
use feed_client::{
    FeedConfig, FeedRepository, MockRemote, ReachabilityObserver, Remotes, SqliteStore,
};
use feed_types::{Post, RecordId, User};
use std::sync::Arc;

/// Id of the signed-in user in the synthetic data set.
const ME: i64 = 1;

/// An opened cache plus the synthetic remotes.
pub struct Session {
    /// The repository over the cache.
    pub repository: FeedRepository,
    /// Connectivity reported to the mediators.
    pub reachability: ReachabilityObserver,
}

impl Session {
    /// Open the cache at the configured path.
    pub async fn open(config: &FeedConfig, online: bool, mock_pages: u32) -> Result<Self> {
        if let Some(parent) = config.storage.database.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }
        let store = SqliteStore::new(&config.storage.database)
            .await
            .with_context(|| {
                format!("Failed to open cache at {}", config.storage.database.display())
            })?;

        let reachability = ReachabilityObserver::new(online);
        let remotes = synthetic_remotes(config.paging.page_size, mock_pages);
        let repository =
            FeedRepository::new(store, Arc::new(reachability.clone()), remotes, config);

        Ok(Self {
            repository,
            reachability,
        })
    }

    /// Close the cache.
    pub async fn close(&self) {
        self.repository.store().close().await;
    }
}

/// Remotes serving `pages` full pages of generated data per stream.
pub fn synthetic_remotes(page_size: u32, pages: u32) -> Remotes {
    let total = i64::from(page_size) * i64::from(pages);

    let feed: Vec<Post> = (1..=total).map(|id| synthetic_post(id, 2 + id % 7)).collect();
    let mine: Vec<Post> = (1..=total / 2).map(|id| synthetic_post(id, ME)).collect();
    let users: Vec<User> = (1..=total).map(synthetic_user).collect();

    Remotes {
        feed: Arc::new(MockRemote::with_records(feed)),
        my_posts: Arc::new(MockRemote::with_records(mine)),
        directory: Arc::new(MockRemote::with_records(users)),
    }
}

fn synthetic_post(id: i64, author: i64) -> Post {
    Post {
        id: RecordId::new(id),
        author_id: RecordId::new(author),
        title: format!("Post number {id}"),
        body: format!("Body of post {id} by user {author}."),
        created_at: 1_700_000_000 + id * 60,
    }
}

fn synthetic_user(id: i64) -> User {
    User {
        id: RecordId::new(id),
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        avatar_url: (id % 3 == 0).then(|| format!("https://example.com/avatars/{id}.png")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_client::RemoteSource;
    use feed_types::PageKey;

    #[tokio::test]
    async fn synthetic_remotes_serve_requested_pages() {
        let remotes = synthetic_remotes(4, 3);

        let last = remotes.feed.fetch_page(PageKey::new(3), 4).await.unwrap();
        let past = remotes.feed.fetch_page(PageKey::new(4), 4).await.unwrap();
        let mine = remotes.my_posts.fetch_page(PageKey::FIRST, 10).await.unwrap();

        assert_eq!(last.len(), 4);
        assert!(past.is_empty());
        assert_eq!(mine.len(), 6);
        assert!(mine.iter().all(|p| p.author_id == RecordId::new(ME)));
    }
}
