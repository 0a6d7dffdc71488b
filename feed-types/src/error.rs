//! Error types reported by the remote list API.

use thiserror::Error;

/// Errors that can occur while fetching a remote page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The remote rejected the shape of the request.
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RemoteError::Server {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "server error 503: unavailable");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RemoteError>();
    }
}
