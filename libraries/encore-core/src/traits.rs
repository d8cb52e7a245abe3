//! Collaborator traits driven by the playback engine
use crate::error::{EncoreError, Result};
use crate::types::{StreamSession, StreamSource, Track};
use async_trait::async_trait;

/// Track lookup service
///
/// Implementers resolve identifiers into playable sources and provide
/// search and "suggested next" lookups. Calls may block on the network; the
/// player never holds its lock across them and may drop an in-flight call
/// when playback is stopped.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a track identifier into a playable stream source
    ///
    /// # Errors
    /// Returns an error if the track is unknown or has no playable stream
    async fn resolve(&self, track_id: &str) -> Result<StreamSource>;

    /// Suggested follow-up tracks, most relevant first
    async fn suggest(&self, track_id: &str) -> Result<Vec<Track>>;

    /// Free-text search, best match first
    async fn search(&self, query: &str) -> Result<Vec<Track>>;

    /// Best search match
    async fn search_one(&self, query: &str) -> Result<Track> {
        self.search(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EncoreError::NoResults(query.to_string()))
    }
}

/// Audio streaming sink
///
/// One sink instance is bound to one output (a voice connection, a device,
/// ...). The player opens at most one session on it at a time.
#[async_trait]
pub trait StreamSink: Send + Sync {
    /// Start streaming a resolved source
    ///
    /// # Errors
    /// Returns an error if the stream cannot be opened. The player treats
    /// this as fatal for the current play loop.
    async fn open(&self, source: StreamSource) -> Result<StreamSession>;

    /// Release the underlying output connection
    async fn disconnect(&self) {}
}

/// Control handle for a live stream
pub trait StreamHandle: Send + Sync {
    fn set_paused(&self, paused: bool);

    /// Stop streaming and release resources. Must be idempotent.
    fn stop(&self);
}
