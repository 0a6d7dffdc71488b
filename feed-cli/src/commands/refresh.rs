//! Reload a stream from the remote.

use anyhow::Result;
use feed_types::{LoadDirection, ResourceKind};

use super::mediate;
use crate::session::Session;

/// Run the refresh command.
pub async fn run(session: &Session, kind: ResourceKind) -> Result<()> {
    let repository = &session.repository;
    let page_size = repository.page_size();

    let outcome = match kind {
        ResourceKind::Feed => {
            mediate(repository.feed_mediator(), LoadDirection::Refresh, page_size).await?
        }
        ResourceKind::MyPosts => {
            mediate(repository.my_posts_mediator(), LoadDirection::Refresh, page_size).await?
        }
        ResourceKind::Directory => {
            mediate(repository.directory_mediator(), LoadDirection::Refresh, page_size).await?
        }
    };

    let cached = repository.cached_count(kind).await?;
    println!("Refreshed {}: {} records cached", kind, cached);
    if outcome.end_of_pagination_reached {
        println!("The remote has no data for this stream.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use tempfile::tempdir;

    #[tokio::test]
    async fn refresh_loads_first_page() {
        let dir = tempdir().unwrap();
        let session = testing::session(dir.path(), true).await;

        run(&session, ResourceKind::Feed).await.unwrap();

        assert_eq!(
            session.repository.cached_count(ResourceKind::Feed).await.unwrap(),
            5
        );
    }

    #[tokio::test]
    async fn refresh_replaces_previous_pages() {
        let dir = tempdir().unwrap();
        let session = testing::session(dir.path(), true).await;
        run(&session, ResourceKind::Directory).await.unwrap();
        crate::commands::more::run(&session, ResourceKind::Directory)
            .await
            .unwrap();

        run(&session, ResourceKind::Directory).await.unwrap();

        assert_eq!(
            session
                .repository
                .cached_count(ResourceKind::Directory)
                .await
                .unwrap(),
            5
        );
    }
}
