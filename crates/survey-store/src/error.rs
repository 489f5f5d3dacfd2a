//! Error types for survey persistence
//!
//! Remote failures are classified so callers can pick a fallback:
//! - `NotConfigured`: remote disabled by a placeholder bin id, no request made
//! - `Transport` / `Status`: the store was unreachable or refused the request
//! - `MalformedPayload`: the store answered with something undecodable

use std::path::PathBuf;

/// Remote document store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Bin id is empty or a placeholder
    #[error("remote document store not configured")]
    NotConfigured,

    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response
    #[error("remote store returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body could not be decoded
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl RemoteError {
    /// Whether the error means "running local-only"
    #[inline]
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Whether the store was unreachable or rejected the call
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedPayload(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Local storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage file could not be read or written
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_classes() {
        assert!(RemoteError::NotConfigured.is_not_configured());
        assert!(RemoteError::Transport("refused".into()).is_transient());
        assert!(RemoteError::Status {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(!RemoteError::MalformedPayload("eof".into()).is_transient());
    }

    #[test]
    fn status_display() {
        let err = RemoteError::Status {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "remote store returned 401: unauthorized");
    }
}
