//! Load state machine for offline-feed.
//!
//! Each load direction of a paged view carries its own [`LoadState`]:
//!
//! ```text
//! Idle ──Started──► Loading ──Finished──► Success ──Acknowledged──► Idle
//!                      └──────Failed────► Error   ──Acknowledged──► Idle
//! ```
//!
//! A failed direction stays in `Error` until the consumer retries (another
//! `Started`) or acknowledges it; the other directions are unaffected.

use feed_types::{LoadDirection, MergeOutcome};

/// Category of a failed load, as shown to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote rejected the request shape.
    InvalidRequest,
    /// The remote failed to serve the request.
    Server,
    /// No connectivity or a transport failure.
    Network,
    /// The local transaction failed.
    Storage,
}

impl FailureKind {
    /// Whether re-requesting the same load can succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidRequest)
    }
}

/// Status of one load direction - NO I/O, just transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A mediation is running.
    Loading,
    /// The last mediation committed.
    Success {
        /// No more data in this direction.
        end_of_pagination_reached: bool,
    },
    /// The last mediation failed; nothing was written.
    Error {
        /// Failure category.
        kind: FailureKind,
        /// Error message.
        message: String,
    },
}

/// Inputs to [`LoadState::on_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// A mediation started.
    Started,
    /// The mediation completed.
    Finished(MergeOutcome),
    /// The mediation failed.
    Failed {
        /// Failure category.
        kind: FailureKind,
        /// Error message.
        message: String,
    },
    /// The consumer has seen the result.
    Acknowledged,
}

impl LoadState {
    /// Process an event and return the new state.
    ///
    /// Invalid transitions leave the state unchanged.
    pub fn on_event(self, event: LoadEvent) -> Self {
        match (self, event) {
            (_, LoadEvent::Started) => Self::Loading,

            (Self::Loading, LoadEvent::Finished(outcome)) => Self::Success {
                end_of_pagination_reached: outcome.end_of_pagination_reached,
            },
            (Self::Loading, LoadEvent::Failed { kind, message }) => Self::Error { kind, message },

            (Self::Success { .. } | Self::Error { .. }, LoadEvent::Acknowledged) => Self::Idle,

            (state, _) => state,
        }
    }

    /// Check if a mediation is running.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the direction reported end of data.
    pub fn is_end_reached(&self) -> bool {
        matches!(
            self,
            Self::Success {
                end_of_pagination_reached: true
            }
        )
    }

    /// Check if the direction is in a failure state that a retry may clear.
    pub fn is_retryable_error(&self) -> bool {
        matches!(self, Self::Error { kind, .. } if kind.is_retryable())
    }
}

/// Load states of the three directions of a paged view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadStates {
    /// Refresh status.
    pub refresh: LoadState,
    /// Prepend status.
    pub prepend: LoadState,
    /// Append status.
    pub append: LoadState,
}

impl LoadStates {
    /// State of one direction.
    pub fn get(&self, direction: LoadDirection) -> &LoadState {
        match direction {
            LoadDirection::Refresh => &self.refresh,
            LoadDirection::Prepend => &self.prepend,
            LoadDirection::Append => &self.append,
        }
    }

    /// Apply an event to one direction.
    pub fn apply(&mut self, direction: LoadDirection, event: LoadEvent) {
        let slot = match direction {
            LoadDirection::Refresh => &mut self.refresh,
            LoadDirection::Prepend => &mut self.prepend,
            LoadDirection::Append => &mut self.append,
        };
        *slot = std::mem::take(slot).on_event(event);
    }

    /// Check if any direction is loading.
    pub fn any_loading(&self) -> bool {
        self.refresh.is_loading() || self.prepend.is_loading() || self.append.is_loading()
    }
}
