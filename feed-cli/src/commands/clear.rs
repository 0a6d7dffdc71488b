//! Drop a stream's cache.

use anyhow::Result;
use feed_types::ResourceKind;

use crate::session::Session;

/// Run the clear command.
pub async fn run(session: &Session, kind: ResourceKind) -> Result<()> {
    let deleted = session.repository.clear_cache(kind).await?;
    println!("Cleared {} cached {} records.", deleted, kind);
    Ok(())
}
