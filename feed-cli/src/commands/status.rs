//! Show cache and cursor status.

use anyhow::Result;
use feed_client::Reachability;
use feed_types::ResourceKind;

use crate::session::Session;

/// Run the status command.
pub async fn run(session: &Session) -> Result<()> {
    println!("=== feed-cli status ===");
    println!();

    let online = session.reachability.is_online();
    println!("Connection: {}", if online { "ONLINE" } else { "OFFLINE" });
    println!(
        "Page size:  {} records",
        session.repository.page_size()
    );
    println!();

    let store = session.repository.store();
    for kind in ResourceKind::ALL {
        let cached = store.count(kind).await?;
        println!("{}:", kind);
        println!("  Cached:     {} records", cached);

        match store.refreshed_at(kind).await? {
            Some(at) => println!("  Refreshed:  {}", format_timestamp(at)),
            None => println!("  Refreshed:  never"),
        }
        if let Some(at) = store.last_cached_at(kind).await? {
            println!("  Updated:    {}", format_timestamp(at));
        }
        println!("  Generation: {}", store.generation(kind).await?.value());

        match store.last_cursor(kind).await? {
            Some(entry) => {
                let next = entry
                    .next_page
                    .map(|page| format!("page {}", page))
                    .unwrap_or_else(|| "end of data".to_string());
                println!("  Last:       #{} (next: {})", entry.id, next);
            }
            None if cached > 0 => println!("  Last:       no cursor"),
            None => {}
        }
        println!();
    }

    Ok(())
}

/// Format a Unix timestamp as a human-readable string.
fn format_timestamp(ts: i64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(ts);

    let diff = now.saturating_sub(ts).max(0);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{more, refresh, testing};
    use tempfile::tempdir;

    #[tokio::test]
    async fn status_on_empty_cache() {
        let dir = tempdir().unwrap();
        let session = testing::session(dir.path(), true).await;

        let result = run(&session).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn status_with_cached_streams() {
        let dir = tempdir().unwrap();
        let session = testing::session(dir.path(), false).await;
        refresh::run(&session, ResourceKind::Feed).await.unwrap();
        more::run(&session, ResourceKind::Feed).await.unwrap();

        let result = run(&session).await;
        assert!(result.is_ok());
    }

    #[test]
    fn format_timestamp_works() {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        assert_eq!(format_timestamp(now), "just now");
        assert!(format_timestamp(now - 120).contains("minutes"));
        assert!(format_timestamp(now - 7200).contains("hours"));
        assert!(format_timestamp(now - 172800).contains("days"));
    }
}
