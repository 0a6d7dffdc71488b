//! # feed-types
//!
//! Shared types for the offline-feed paginated sync engine.
//!
//! This crate provides the foundational types used across all offline-feed crates:
//! - [`RecordId`], [`PageKey`] - Identity and page ordering types
//! - [`Record`], [`Post`], [`User`], [`ResourceKind`] - Cached resources
//! - [`CursorEntry`] - Per-record previous/next page bookkeeping
//! - [`LoadDirection`], [`MergeOutcome`] - Mediator inputs and outputs
//! - [`RemoteError`] - Failures reported by the remote list API

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod paging;
mod records;

pub use error::RemoteError;
pub use ids::{PageKey, RecordId};
pub use paging::{CursorEntry, LoadDirection, MergeOutcome};
pub use records::{Post, Record, ResourceKind, User};
