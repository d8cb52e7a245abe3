//! Player - per-session queue playback
//!
//! Coordinates the queue, the playback state machine and the play loop task.
//! One lock guards all mutable state; it is held only for in-memory updates,
//! never across a resolver, sink or signal await.

use crate::{
    discovery::pick_suggestion,
    error::{PlaybackError, Result},
    events::PlayerEvent,
    play_loop,
    queue::Queue,
    signal::{loop_channel, LoopControl},
    types::{PlaybackState, PlayerConfig, TrackPage},
};
use encore_core::{StreamHandle, StreamSink, Track, TrackResolver};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, info};

/// State guarded by the player lock
pub(crate) struct Inner {
    pub queue: Queue,
    pub state: PlaybackState,
    pub auto_discover: bool,

    /// A discovery lookup is in flight
    pub discovering: bool,

    /// Handle of the stream the play loop currently has open
    pub stream: Option<Arc<dyn StreamHandle>>,

    /// Signal senders of the running play loop; `None` exactly when idle
    pub control: Option<LoopControl>,

    /// Bumped on every loop launch
    pub generation: u64,

    pub closed: bool,
}

pub(crate) struct Shared {
    pub inner: Mutex<Inner>,
    pub resolver: Arc<dyn TrackResolver>,
    pub sink: Arc<dyn StreamSink>,
    pub events: broadcast::Sender<PlayerEvent>,
    pub config: PlayerConfig,
}

impl Shared {
    /// Publish an event without waiting on subscribers
    pub fn emit(&self, event: PlayerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Queue player bound to one resolver and one sink
///
/// Cloning is cheap; clones share the same queue and play loop.
///
/// # Example
///
/// ```rust,no_run
/// use encore_playback::{Player, PlayerConfig};
/// # use encore_core::{StreamSink, TrackResolver, Track};
/// # use std::sync::Arc;
/// # async fn demo(resolver: Arc<dyn TrackResolver>, sink: Arc<dyn StreamSink>, track: Track)
/// #     -> encore_playback::Result<()> {
/// let player = Player::new(resolver, sink, PlayerConfig::default());
/// let mut events = player.subscribe();
///
/// player.add(track).await?; // starts the play loop
/// player.pause().await?;
/// player.resume().await?;
/// player.next(1).await?;
///
/// println!("{}", player.list(0, 0).await);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Player {
    pub(crate) shared: Arc<Shared>,
}

impl Player {
    /// Create an idle player
    pub fn new(
        resolver: Arc<dyn TrackResolver>,
        sink: Arc<dyn StreamSink>,
        config: PlayerConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let inner = Inner {
            queue: Queue::new(),
            state: PlaybackState::Idle,
            auto_discover: config.auto_discover,
            discovering: false,
            stream: None,
            control: None,
            generation: 0,
            closed: false,
        };

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                resolver,
                sink,
                events,
                config,
            }),
        }
    }

    /// Subscribe to player events, including asynchronous playback errors
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.shared.events.subscribe()
    }

    async fn lock_open(&self) -> Result<MutexGuard<'_, Inner>> {
        let inner = self.shared.inner.lock().await;
        if inner.closed {
            return Err(PlaybackError::Closed);
        }
        Ok(inner)
    }

    /// Launch the play loop. Caller holds the lock and has checked for idle.
    fn start_loop(&self, inner: &mut Inner) {
        debug_assert!(inner.control.is_none(), "play loop already running");

        inner.generation += 1;
        let generation = inner.generation;
        let (control, signals) = loop_channel();
        inner.control = Some(control);
        inner.state = PlaybackState::Playing;

        info!(generation, cursor = inner.queue.cursor(), "Starting play loop");
        self.shared.emit(PlayerEvent::StateChanged {
            state: PlaybackState::Playing,
        });

        tokio::spawn(play_loop::run(self.clone(), generation, signals));
    }

    /// Append under the lock, starting playback if idle
    fn push_track(&self, inner: &mut Inner, track: Track) -> usize {
        let index = inner.queue.push(track);
        self.shared.emit(PlayerEvent::QueueChanged {
            length: inner.queue.len(),
        });

        if inner.control.is_none() {
            self.start_loop(inner);
        }
        index
    }

    /// Append a track, returning its index
    ///
    /// Starts the play loop at the cursor when the player is idle.
    pub async fn add(&self, track: Track) -> Result<usize> {
        let mut inner = self.lock_open().await?;
        debug!(track_id = %track.id, "Adding track");
        Ok(self.push_track(&mut inner, track))
    }

    /// Remove the track at `index` (0-based)
    pub async fn remove(&self, index: usize) -> Result<Track> {
        let mut inner = self.lock_open().await?;
        let active = inner.state.is_active();
        let track = inner.queue.remove(index, active)?;

        self.shared.emit(PlayerEvent::QueueChanged {
            length: inner.queue.len(),
        });
        Ok(track)
    }

    /// Move the cursor to `index`, clamped into `[0, len]`
    ///
    /// While idle the cursor moves directly and playback starts if it lands on
    /// a track; landing past the end runs auto-discovery (when enabled) before
    /// returning. While a track is streaming this waits until the play loop
    /// has torn the stream down and placed the cursor.
    pub async fn go_to(&self, index: isize) -> Result<()> {
        loop {
            let (control, target) = {
                let mut inner = self.lock_open().await?;
                if inner.queue.is_empty() {
                    return Err(PlaybackError::EmptyQueue);
                }

                let target = inner.queue.clamp(index);
                match inner.control.clone() {
                    Some(control) => (control, target),
                    None => {
                        inner.queue.set_cursor(target);
                        if !inner.queue.is_exhausted() {
                            self.start_loop(&mut inner);
                            return Ok(());
                        }
                        if !Self::begin_discovery(&mut inner) {
                            return Ok(());
                        }
                        drop(inner);
                        return self.run_discovery().await.map(|_| ());
                    }
                }
            };

            debug!(target, "Skipping");
            if control.skip(target).await {
                return Ok(());
            }
            debug!(target, "Play loop ended before the skip landed, retrying");
        }
    }

    /// Skip `n` tracks forward
    pub async fn next(&self, n: usize) -> Result<()> {
        let cursor = self.cursor().await as isize;
        self.go_to(cursor.saturating_add(step(n))).await
    }

    /// Go back `n` tracks
    pub async fn prev(&self, n: usize) -> Result<()> {
        let cursor = self.cursor().await as isize;
        self.go_to(cursor.saturating_sub(step(n))).await
    }

    pub async fn pause(&self) -> Result<()> {
        let mut inner = self.lock_open().await?;
        if inner.state != PlaybackState::Playing {
            return Err(PlaybackError::InvalidState(
                "cannot pause: no music is playing".to_string(),
            ));
        }

        // Between tracks there is no handle; the next stream opens paused
        inner.state = PlaybackState::Paused;
        if let Some(stream) = &inner.stream {
            stream.set_paused(true);
        }

        self.shared.emit(PlayerEvent::StateChanged {
            state: PlaybackState::Paused,
        });
        Ok(())
    }

    pub async fn resume(&self) -> Result<()> {
        let mut inner = self.lock_open().await?;
        if inner.state != PlaybackState::Paused {
            return Err(PlaybackError::InvalidState(
                "cannot resume: music is not paused".to_string(),
            ));
        }

        inner.state = PlaybackState::Playing;
        if let Some(stream) = &inner.stream {
            stream.set_paused(false);
        }

        self.shared.emit(PlayerEvent::StateChanged {
            state: PlaybackState::Playing,
        });
        Ok(())
    }

    /// Clear the queue, returning the number of tracks dropped
    ///
    /// With `all` set every track goes, except the one streaming. Without it
    /// only upcoming tracks are dropped, and an idle player is left untouched.
    /// The current track always ends up at index 0.
    pub async fn clear(&self, all: bool) -> Result<usize> {
        let mut inner = self.lock_open().await?;
        let active = inner.state.is_active();
        let removed = inner.queue.clear(all, active);

        if removed > 0 {
            self.shared.emit(PlayerEvent::QueueChanged {
                length: inner.queue.len(),
            });
        }
        Ok(removed)
    }

    /// Stop playback and forget the queue and the auto-discovery flag
    pub async fn reset(&self) -> Result<()> {
        loop {
            self.stop_loop().await;

            let mut inner = self.lock_open().await?;
            if inner.control.is_some() {
                // Someone restarted playback while we waited
                continue;
            }

            inner.queue.reset();
            inner.auto_discover = false;
            inner.state = PlaybackState::Idle;

            info!("Player reset");
            self.shared.emit(PlayerEvent::QueueChanged { length: 0 });
            return Ok(());
        }
    }

    /// Stop playback, release the sink and reject further operations
    pub async fn close(&self) {
        {
            let mut inner = self.shared.inner.lock().await;
            if inner.closed {
                return;
            }
            inner.closed = true;
        }

        self.stop_loop().await;
        self.shared.sink.disconnect().await;

        info!("Player closed");
        self.shared.emit(PlayerEvent::Closed);
    }

    /// Send stop signals until no play loop is running
    async fn stop_loop(&self) {
        loop {
            let control = self.shared.inner.lock().await.control.clone();
            let Some(control) = control else {
                return;
            };

            debug!("Stopping play loop");
            control.stop().await;
        }
    }

    /// One page of the queue listing
    ///
    /// `page_size == 0` uses the configured default; `page == 0` selects the
    /// page holding the cursor.
    pub async fn list(&self, page: usize, page_size: usize) -> TrackPage {
        let inner = self.shared.inner.lock().await;
        let page_size = if page_size == 0 {
            self.shared.config.page_size
        } else {
            page_size
        };

        inner.queue.page(page, page_size, inner.state.is_active())
    }

    pub async fn state(&self) -> PlaybackState {
        self.shared.inner.lock().await.state
    }

    /// Index of the track playing or about to play
    pub async fn cursor(&self) -> usize {
        self.shared.inner.lock().await.queue.cursor()
    }

    pub async fn total_tracks(&self) -> usize {
        self.shared.inner.lock().await.queue.len()
    }

    /// Track at the cursor, if any
    pub async fn current_track(&self) -> Option<Track> {
        self.shared.inner.lock().await.queue.current().cloned()
    }

    /// Snapshot of the queue
    pub async fn tracks(&self) -> Vec<Track> {
        self.shared.inner.lock().await.queue.tracks().to_vec()
    }

    pub async fn auto_discover(&self) -> bool {
        self.shared.inner.lock().await.auto_discover
    }

    pub async fn set_auto_discover(&self, enabled: bool) {
        self.shared.inner.lock().await.auto_discover = enabled;
    }

    pub async fn is_closed(&self) -> bool {
        self.shared.inner.lock().await.closed
    }

    /// Claim the discovery slot; `false` if disabled or already running
    pub(crate) fn begin_discovery(inner: &mut Inner) -> bool {
        if !inner.auto_discover || inner.discovering {
            return false;
        }
        inner.discovering = true;
        true
    }

    /// Queue a suggested follow-up of the last track
    ///
    /// Caller must have claimed the slot with `begin_discovery`.
    pub(crate) async fn run_discovery(&self) -> Result<Track> {
        let result = self.discover().await;
        if result.is_err() {
            self.shared.inner.lock().await.discovering = false;
        }
        result
    }

    async fn discover(&self) -> Result<Track> {
        let seed = self
            .lock_open()
            .await?
            .queue
            .last()
            .cloned()
            .ok_or(PlaybackError::EmptyQueue)?;

        info!(seed = %seed.id, "Discovering next track");
        self.shared.emit(PlayerEvent::Discovering { seed: seed.clone() });

        let suggestions = self
            .shared
            .resolver
            .suggest(&seed.id)
            .await
            .map_err(|e| PlaybackError::Discovery(e.to_string()))?;

        let track = {
            let mut rng = rand::thread_rng();
            pick_suggestion(&mut rng, &suggestions).cloned()
        }
        .ok_or_else(|| PlaybackError::Discovery("no tracks discovered".to_string()))?;

        let mut inner = self.lock_open().await?;
        if !inner.auto_discover {
            return Err(PlaybackError::Discovery(
                "auto-discovery was turned off".to_string(),
            ));
        }
        inner.discovering = false;

        info!(track_id = %track.id, name = %track.name, "Discovered track");
        self.shared.emit(PlayerEvent::Discovered {
            track: track.clone(),
        });
        self.push_track(&mut inner, track.clone());

        Ok(track)
    }
}

/// Relative move as a signed offset; anything past `isize::MAX` clamps anyway
fn step(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player").finish_non_exhaustive()
    }
}
