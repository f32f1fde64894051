use thiserror::Error;

/// Top-level error type returned by the discovery engine.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid input supplied to a search request or session callback.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Catalog payload could not be decoded.
    #[error("catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiscoveryError {
    /// Convenience helper for constructing an [`DiscoveryError::InvalidRequest`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
