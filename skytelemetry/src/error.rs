//! Error types for the telemetry client

/// Result type alias for telemetry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when delivering telemetry events
///
/// These never reach the components that record events: sinks log them and
/// move on. They are only visible through [`crate::HttpSink::send`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Collector returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// Sink is disabled or has no title id
    #[error("Analytics not ready")]
    NotReady,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}
