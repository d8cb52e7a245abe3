//! Turns player events into chat-style announcements

use encore_playback::{PlaybackError, Player, PlayerEvent};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

/// A line to show the user, tagged with the session that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub session: String,
    pub text: String,
}

/// Announcement text for an event, if it is worth telling the user about
pub fn describe(event: &PlayerEvent) -> Option<String> {
    match event {
        PlayerEvent::NowPlaying { track, .. } => Some(format!("Playing `{}`", track.name)),
        PlayerEvent::Discovering { .. } => Some("Discovering next music...".to_string()),
        PlayerEvent::Discovered { track } => Some(format!("Discovered `{}`", track.name)),
        PlayerEvent::Error {
            error: PlaybackError::Resolution { .. },
            track: Some(track),
        } => Some(format!("Cannot play `{}`, skipping...", track.name)),
        PlayerEvent::Error { error, .. } => Some(error.to_string()),
        PlayerEvent::StateChanged { .. } | PlayerEvent::QueueChanged { .. } | PlayerEvent::Closed => {
            None
        }
    }
}

/// Forwards the events of watched players to one channel
#[derive(Debug, Clone)]
pub struct Announcer {
    tx: mpsc::UnboundedSender<Announcement>,
}

impl Announcer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Announcement>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Spawn a task announcing `player`'s events until it closes
    pub fn watch(&self, session: &str, player: &Player) {
        let mut events = player.subscribe();
        let tx = self.tx.clone();
        let session = session.to_string();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(PlayerEvent::Closed) | Err(broadcast::error::RecvError::Closed) => break,
                    Ok(event) => {
                        let Some(text) = describe(&event) else {
                            continue;
                        };
                        let announcement = Announcement {
                            session: session.clone(),
                            text,
                        };
                        if tx.send(announcement).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(session = %session, skipped, "Announcer lagged behind player events");
                    }
                }
            }
            debug!(session = %session, "Announcer stopped");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::Track;
    use encore_playback::PlaybackState;
    use std::time::Duration;

    fn track() -> Track {
        Track::new("n1", "Night Drive", Duration::from_secs(200))
    }

    #[test]
    fn describes_user_facing_events() {
        assert_eq!(
            describe(&PlayerEvent::NowPlaying {
                index: 0,
                track: track()
            })
            .as_deref(),
            Some("Playing `Night Drive`")
        );
        assert_eq!(
            describe(&PlayerEvent::Discovered { track: track() }).as_deref(),
            Some("Discovered `Night Drive`")
        );
        assert_eq!(
            describe(&PlayerEvent::Discovering { seed: track() }).as_deref(),
            Some("Discovering next music...")
        );
    }

    #[test]
    fn resolution_errors_mention_the_skipped_track() {
        let event = PlayerEvent::Error {
            error: PlaybackError::Resolution {
                track_id: "n1".to_string(),
                message: "gone".to_string(),
            },
            track: Some(track()),
        };
        assert_eq!(
            describe(&event).as_deref(),
            Some("Cannot play `Night Drive`, skipping...")
        );

        let event = PlayerEvent::Error {
            error: PlaybackError::Stream("socket closed".to_string()),
            track: Some(track()),
        };
        assert_eq!(
            describe(&event).as_deref(),
            Some("Stream error: socket closed")
        );
    }

    #[test]
    fn bookkeeping_events_stay_quiet() {
        assert!(describe(&PlayerEvent::StateChanged {
            state: PlaybackState::Idle
        })
        .is_none());
        assert!(describe(&PlayerEvent::QueueChanged { length: 3 }).is_none());
        assert!(describe(&PlayerEvent::Closed).is_none());
    }
}
