//! Fetch the next remote page after the cached data.

use anyhow::Result;
use feed_client::Reachability;
use feed_types::{LoadDirection, ResourceKind};

use super::mediate;
use crate::session::Session;

/// Run the more command.
pub async fn run(session: &Session, kind: ResourceKind) -> Result<()> {
    let repository = &session.repository;
    let page_size = repository.page_size();
    let before = repository.cached_count(kind).await?;

    let outcome = match kind {
        ResourceKind::Feed => {
            mediate(repository.feed_mediator(), LoadDirection::Append, page_size).await?
        }
        ResourceKind::MyPosts => {
            mediate(repository.my_posts_mediator(), LoadDirection::Append, page_size).await?
        }
        ResourceKind::Directory => {
            mediate(repository.directory_mediator(), LoadDirection::Append, page_size).await?
        }
    };

    let after = repository.cached_count(kind).await?;
    println!(
        "Loaded {} new {} records ({} cached)",
        after.saturating_sub(before),
        kind,
        after
    );

    if outcome.end_of_pagination_reached {
        if !session.reachability.is_online() {
            println!("Offline: showing cached data only.");
        } else if before == 0 {
            println!("Nothing cached yet. Run 'feed-cli refresh {}' first.", kind);
        } else {
            println!("End of data reached.");
        }
    }

    Ok(())
}
