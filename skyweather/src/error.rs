//! Error types for the weather client

/// Result type alias for weather operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when fetching weather or driving the city rotation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// Response carried no weather condition
    #[error("No weather condition in response for {0}")]
    MissingCondition(String),

    /// The city list is empty
    #[error("No city configured")]
    NoCities,

    /// Configuration error (from skyconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

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
