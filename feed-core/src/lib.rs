//! # feed-core
//!
//! Pure paging logic for offline-feed (no I/O, instant tests).
//!
//! This crate implements the decision table, state machines and bookkeeping
//! of the paginated sync engine without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`LoadPlan::decide`] turns a load request into "skip" or "fetch page N"
//! - [`PageBounds`] computes the cursor entries a fetched page produces
//! - [`stale_ids`] computes what a reconciling refresh deletes
//! - [`LoadState`] tracks per-direction load status
//! - [`PagingWindow`] holds the consumer's loaded pages and its refresh key
//!
//! The actual I/O (remote fetches, SQLite transactions) is performed by
//! `feed-client`, which executes the plans produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod generation;
pub mod planner;
pub mod policy;
pub mod reconcile;
pub mod state;
pub mod window;

pub use cursor::PageBounds;
pub use generation::{Generation, StaleGeneration};
pub use planner::{CursorLookup, FetchPlan, LoadPlan, WriteMode};
pub use policy::{InitializeAction, InitializePolicy, RefreshPolicy, SyncPolicy};
pub use reconcile::stale_ids;
pub use state::{FailureKind, LoadEvent, LoadState, LoadStates};
pub use window::{LocalPage, PagingWindow};
