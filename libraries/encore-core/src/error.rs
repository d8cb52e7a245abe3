//! Core error types for Encore collaborators
use thiserror::Error;

/// Result type alias using `EncoreError`
pub type Result<T> = std::result::Result<T, EncoreError>;

/// Errors raised by track resolvers and stream sinks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncoreError {
    /// No track exists for the identifier
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// The track exists but has no playable stream
    #[error("Track cannot be played: {0}")]
    Unplayable(String),

    /// Search or suggestion lookup returned nothing
    #[error("No results for: {0}")]
    NoResults(String),

    /// Upstream service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Audio sink failed to open or broke mid-stream
    #[error("Sink error: {0}")]
    Sink(String),
}

impl EncoreError {
    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
