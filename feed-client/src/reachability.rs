//! Connectivity reporting.
//!
//! The platform integration (or a test) pushes connectivity changes into a
//! [`ReachabilityObserver`]; the mediator only ever reads the last known
//! value and never waits for a fresh network check.

use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;

/// Stream of connectivity changes, current value first.
pub type ConnectivityStream = Pin<Box<dyn Stream<Item = bool> + Send + 'static>>;

/// Source of connectivity state.
pub trait Reachability: Send + Sync {
    /// Last known connectivity. Must not block or query the network.
    fn is_online(&self) -> bool;

    /// Connectivity changes, starting with the current value.
    fn observe(&self) -> ConnectivityStream;
}

impl<T: Reachability + ?Sized> Reachability for Arc<T> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }

    fn observe(&self) -> ConnectivityStream {
        (**self).observe()
    }
}

/// Watch-channel backed [`Reachability`].
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct ReachabilityObserver {
    tx: Arc<watch::Sender<bool>>,
}

impl ReachabilityObserver {
    /// Create an observer with the given initial state.
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx: Arc::new(tx) }
    }

    /// Report a connectivity change.
    ///
    /// Subscribers are only notified when the value actually changes.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!("Connectivity changed: {}", if online { "online" } else { "offline" });
        }
    }
}

impl Default for ReachabilityObserver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reachability for ReachabilityObserver {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn observe(&self) -> ConnectivityStream {
        Box::pin(WatchStream::new(self.tx.subscribe()))
    }
}
