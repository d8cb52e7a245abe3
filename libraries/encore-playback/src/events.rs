//! Player Events
//!
//! Event-based communication for whatever announces playback to users.
//! Events are emitted at key points:
//! - State changes (idle/playing/paused)
//! - A track starting to stream
//! - Queue length changes
//! - Auto-discovery progress
//! - Asynchronous failures inside the play loop
//!
//! Publishing never blocks the player: a missing subscriber is ignored and a
//! lagging one loses its oldest events.

use crate::error::PlaybackError;
use crate::types::PlaybackState;
use encore_core::Track;

/// Events emitted by a player
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A track's stream was opened
    NowPlaying {
        /// Queue index of the track
        index: usize,
        track: Track,
    },

    /// Tracks were added or removed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Auto-discovery is looking up suggestions
    Discovering {
        /// Track the suggestions are based on
        seed: Track,
    },

    /// Auto-discovery queued a track
    Discovered { track: Track },

    /// Play loop failure
    ///
    /// `Resolution` errors skip the track; `SinkOpen` and `Stream` errors
    /// end the play loop.
    Error {
        error: PlaybackError,
        /// Track being played when the error happened
        track: Option<Track>,
    },

    /// Player was closed; no further events follow
    Closed,
}
