//! The play loop task
//!
//! One task per busy period: launched when an idle player gets something to
//! play, exits when the queue runs out, on a stop signal, or on a fatal
//! sink failure. Each iteration streams the track at the cursor:
//!
//! ```text
//! pick cursor track -> resolve -> open -> register handle -> wait
//!        ^                                                    |
//!        +------------- finished / skipped / failed ----------+
//! ```
//!
//! Every await races the stop and skip signals, stop first.

use crate::{
    error::PlaybackError,
    events::PlayerEvent,
    player::{Inner, Player},
    signal::{LoopSignals, SkipRequest},
    types::PlaybackState,
};
use encore_core::{StreamSession, Track};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// How the wait on an open stream ended
enum Outcome {
    Stopped(oneshot::Sender<()>),
    Skipped(SkipRequest),
    Finished(encore_core::Result<()>),
}

pub(crate) async fn run(player: Player, generation: u64, mut signals: LoopSignals) {
    let shared = player.shared.clone();
    debug!(generation, "Play loop running");

    loop {
        let (index, track) = {
            let mut inner = shared.inner.lock().await;
            if inner.generation != generation {
                return;
            }

            while let Ok(request) = signals.skip_rx.try_recv() {
                apply_skip(&player, &mut inner, request);
            }

            match inner.queue.current() {
                Some(track) => (inner.queue.cursor(), track.clone()),
                None => {
                    finish(&player, &mut inner, generation);
                    return;
                }
            }
        };

        debug!(generation, index, track_id = %track.id, "Resolving track");
        let resolved = tokio::select! {
            biased;
            Some(ack) = signals.stop_rx.recv() => {
                return stop(&player, generation, ack).await;
            }
            Some(request) = signals.skip_rx.recv() => {
                skip(&player, request).await;
                continue;
            }
            result = shared.resolver.resolve(&track.id) => result,
        };

        let source = match resolved {
            Ok(source) => source,
            Err(e) => {
                warn!(generation, track_id = %track.id, error = %e, "Failed to resolve track, skipping");
                shared.emit(PlayerEvent::Error {
                    error: PlaybackError::Resolution {
                        track_id: track.id.clone(),
                        message: e.to_string(),
                    },
                    track: Some(track),
                });

                let mut inner = shared.inner.lock().await;
                advance(&player, &mut inner);
                continue;
            }
        };

        let opened = tokio::select! {
            biased;
            Some(ack) = signals.stop_rx.recv() => {
                return stop(&player, generation, ack).await;
            }
            Some(request) = signals.skip_rx.recv() => {
                skip(&player, request).await;
                continue;
            }
            result = shared.sink.open(source) => result,
        };

        let StreamSession { handle, completion } = match opened {
            Ok(session) => session,
            Err(e) => {
                error!(generation, track_id = %track.id, error = %e, "Failed to open stream");
                shared.emit(PlayerEvent::Error {
                    error: PlaybackError::SinkOpen(e.to_string()),
                    track: Some(track),
                });

                let mut inner = shared.inner.lock().await;
                finish(&player, &mut inner, generation);
                return;
            }
        };

        {
            let mut inner = shared.inner.lock().await;
            if inner.state == PlaybackState::Paused {
                handle.set_paused(true);
            }
            inner.stream = Some(handle.clone());
        }

        info!(generation, index, track_id = %track.id, name = %track.name, "Now playing");
        shared.emit(PlayerEvent::NowPlaying {
            index,
            track: track.clone(),
        });

        let outcome = tokio::select! {
            biased;
            Some(ack) = signals.stop_rx.recv() => Outcome::Stopped(ack),
            Some(request) = signals.skip_rx.recv() => Outcome::Skipped(request),
            // A dropped sender means the sink gave up on the stream quietly
            result = completion => Outcome::Finished(result.unwrap_or(Ok(()))),
        };

        handle.stop();
        shared.inner.lock().await.stream = None;

        match outcome {
            Outcome::Stopped(ack) => return stop(&player, generation, ack).await,
            Outcome::Skipped(request) => skip(&player, request).await,
            Outcome::Finished(Ok(())) => {
                debug!(generation, index, "Track finished");
                let mut inner = shared.inner.lock().await;
                advance(&player, &mut inner);
            }
            Outcome::Finished(Err(e)) => {
                error!(generation, track_id = %track.id, error = %e, "Stream failed");
                report_stream_error(&player, track, e.to_string());

                let mut inner = shared.inner.lock().await;
                finish(&player, &mut inner, generation);
                return;
            }
        }
    }
}

fn report_stream_error(player: &Player, track: Track, message: String) {
    player.shared.emit(PlayerEvent::Error {
        error: PlaybackError::Stream(message),
        track: Some(track),
    });
}

/// Go idle and tell the stopper once the state is observable
async fn stop(player: &Player, generation: u64, ack: oneshot::Sender<()>) {
    {
        let mut inner = player.shared.inner.lock().await;
        finish(player, &mut inner, generation);
    }
    debug!(generation, "Play loop stopped");
    let _ = ack.send(());
}

async fn skip(player: &Player, request: SkipRequest) {
    let mut inner = player.shared.inner.lock().await;
    apply_skip(player, &mut inner, request);
}

fn apply_skip(player: &Player, inner: &mut Inner, request: SkipRequest) {
    inner.queue.set_cursor(request.target);
    debug!(cursor = inner.queue.cursor(), "Skip applied");
    let _ = request.ack.send(());
    discover_if_exhausted(player, inner);
}

/// Step past the consumed track
fn advance(player: &Player, inner: &mut Inner) {
    inner.queue.advance();
    discover_if_exhausted(player, inner);
}

/// Start a background discovery when the cursor has run off the end
fn discover_if_exhausted(player: &Player, inner: &mut Inner) {
    if !inner.queue.is_exhausted() || !Player::begin_discovery(inner) {
        return;
    }

    let player = player.clone();
    tokio::spawn(async move {
        if let Err(e) = player.run_discovery().await {
            warn!(error = %e, "Auto-discovery failed");
        }
    });
}

/// Tear down loop bookkeeping; a no-op for a superseded loop
fn finish(player: &Player, inner: &mut Inner, generation: u64) {
    if inner.generation != generation {
        return;
    }

    inner.state = PlaybackState::Idle;
    inner.stream = None;
    inner.control = None;

    info!(generation, "Play loop finished");
    player.shared.emit(PlayerEvent::StateChanged {
        state: PlaybackState::Idle,
    });
}
