//! Error types for feed-client.

use feed_core::{FailureKind, StaleGeneration};
use feed_types::RemoteError;
use std::path::PathBuf;

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A cached payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// A write was planned against a partition a refresh has since replaced.
    #[error("{0}")]
    StaleGeneration(#[from] StaleGeneration),

    /// Database path error.
    #[error("invalid database path: {path}")]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
    },
}

/// Errors returned by a mediation.
///
/// Nothing is committed when one of these is returned; the cached data is
/// left exactly as it was. The mediator never retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum MediatorError {
    /// The remote rejected the request shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The remote failed to serve the request.
    #[error("server error {status}: {message}")]
    Server {
        /// Status code reported by the remote.
        status: u16,
        /// Error message reported by the remote.
        message: String,
    },

    /// No connectivity or a transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The merge transaction failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<RemoteError> for MediatorError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            RemoteError::Server { status, message } => Self::Server { status, message },
            RemoteError::Network(msg) => Self::Network(msg),
        }
    }
}

impl MediatorError {
    /// Failure category shown to the consumer.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidRequest(_) => FailureKind::InvalidRequest,
            Self::Server { .. } => FailureKind::Server,
            Self::Network(_) => FailureKind::Network,
            Self::Storage(_) => FailureKind::Storage,
        }
    }

    /// Whether re-requesting the same load can succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_map_to_taxonomy() {
        let err: MediatorError = RemoteError::Network("offline".into()).into();
        assert_eq!(err.kind(), FailureKind::Network);
        assert!(err.is_retryable());

        let err: MediatorError = RemoteError::InvalidRequest("size=0".into()).into();
        assert_eq!(err.kind(), FailureKind::InvalidRequest);
        assert!(!err.is_retryable());
    }

    #[test]
    fn storage_errors_are_retryable() {
        let err = MediatorError::from(StorageError::Database(sqlx::Error::PoolClosed));
        assert_eq!(err.kind(), FailureKind::Storage);
        assert!(err.is_retryable());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MediatorError>();
    }
}
