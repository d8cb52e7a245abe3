//! Core data types shared between the player and its collaborators

use crate::error::Result;
use crate::traits::StreamHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// A queued playable item
///
/// Tracks are immutable values: the player clones them into its queue and
/// drops them on removal, clear or reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Resolver-specific identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Track length
    pub duration: Duration,
}

impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
        }
    }
}

/// A resolved, playable stream location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSource {
    /// Track this source was resolved from
    pub track_id: String,

    /// Sink-specific location (URL, path, ...)
    pub location: String,

    /// Stream length, when the resolver knows it
    pub duration: Option<Duration>,
}

/// A live streaming operation opened by a `StreamSink`
///
/// The completion receiver yields `Ok(())` on a benign end of stream and an
/// error when streaming broke. A dropped sender counts as end of stream.
pub struct StreamSession {
    /// Control handle for pause/stop
    pub handle: Arc<dyn StreamHandle>,

    /// Fires once when the stream ends
    pub completion: oneshot::Receiver<Result<()>>,
}

impl StreamSession {
    /// Create a session and the sender used to signal its completion
    pub fn new(handle: Arc<dyn StreamHandle>) -> (Self, oneshot::Sender<Result<()>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                handle,
                completion: rx,
            },
            tx,
        )
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession").finish_non_exhaustive()
    }
}
