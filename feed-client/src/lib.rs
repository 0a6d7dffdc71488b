//! # feed-client
//!
//! Offline-first paginated sync engine.
//!
//! This is the library that applications use to page through remote lists
//! with a durable local cache in between.
//!
//! ## Features
//!
//! - **Atomic merges**: every fetched page is written with its cursor entries
//!   in one SQLite transaction; readers never see a torn cache
//! - **Offline tolerant**: forward paging stalls quietly while offline and the
//!   cached data stays visible
//! - **Per-resource policies**: one mediator algorithm, a small injected
//!   policy table (replace, resume-from-anchor, reconcile)
//! - **Remote abstraction**: pluggable page source (HTTP client, mock)
//! - **Pure planning**: uses feed-core for side-effect-free decisions
//!
//! ## Example
//!
//! ```ignore
//! use feed_client::{FeedConfig, FeedRepository, ReachabilityObserver, Remotes, SqliteStore};
//!
//! let config = FeedConfig::from_file("feed.toml".as_ref())?;
//! let store = SqliteStore::new(&config.storage.database).await?;
//! let repository = FeedRepository::new(store, reachability, remotes, &config);
//!
//! let mut feed = repository.feed().await?;
//! feed.read(LoadDirection::Append).await?;
//! for post in feed.snapshot() { /* render */ }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod mediator;
pub mod paged;
pub mod reachability;
pub mod remote;
pub mod repository;
pub mod store;

pub use config::{
    ConfigError, FeedConfig, PagingConfig, PoliciesConfig, PolicyOverride, StorageConfig,
};
pub use error::{MediatorError, StorageError};
pub use mediator::{PagingState, SyncMediator};
pub use paged::PagedView;
pub use reachability::{ConnectivityStream, Reachability, ReachabilityObserver};
pub use remote::{MockRemote, RemoteSource};
pub use repository::{FeedRepository, PostMediator, PostView, Remotes, UserMediator, UserView};
pub use store::{CommitSummary, CursorTracker, MergeBatch, SqliteStore};
