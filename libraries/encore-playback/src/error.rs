//! Error types for playback management

use thiserror::Error;

/// Player errors
///
/// Queue and transport operations return these directly. Failures inside the
/// play loop (`Resolution`, `SinkOpen`, `Stream`) are published on the
/// player's event stream instead, so the type is `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Index outside the queue
    #[error("Track not found: {0}")]
    NotFound(usize),

    /// Index is the track currently playing or paused
    #[error("Cannot remove the playing track: {0}")]
    CannotRemoveActiveTrack(usize),

    /// Queue is empty
    #[error("Queue is empty")]
    EmptyQueue,

    /// Transport request made from the wrong state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Resolver could not produce a stream for the track
    #[error("Cannot resolve track {track_id}: {message}")]
    Resolution { track_id: String, message: String },

    /// Sink refused to open a stream
    #[error("Cannot open stream: {0}")]
    SinkOpen(String),

    /// Stream broke before reaching its end
    #[error("Stream error: {0}")]
    Stream(String),

    /// Auto-discovery found nothing to queue
    #[error("Cannot discover next track: {0}")]
    Discovery(String),

    /// Player was closed
    #[error("Player is closed")]
    Closed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
