//! CLI command implementations.

pub mod clear;
pub mod more;
pub mod refresh;
pub mod show;
pub mod status;

use anyhow::Result;
use feed_client::{PagingState, Reachability, RemoteSource, SyncMediator};
use feed_types::{LoadDirection, MergeOutcome, Record};

/// Run one mediation with no consumer window.
///
/// Appends continue from the last cached record of the kind.
pub(crate) async fn mediate<R, S, N>(
    mediator: &SyncMediator<R, S, N>,
    direction: LoadDirection,
    page_size: u32,
) -> Result<MergeOutcome>
where
    R: Record,
    S: RemoteSource<R>,
    N: Reachability,
{
    let outcome = mediator
        .mediate(direction, &PagingState::new(page_size))
        .await?;
    Ok(outcome)
}
