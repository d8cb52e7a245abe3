//! Clock-driven stand-in for an audio output
//!
//! Each opened stream is a tokio task that sleeps for the source's length
//! divided by the speed factor, then reports completion. Pausing freezes the
//! remaining time; stopping ends the task without reporting.

use crate::error::{CatalogError, Result as CatalogResult};
use async_trait::async_trait;
use encore_core::{
    EncoreError, Result, StreamHandle, StreamSession, StreamSink, StreamSource,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Control {
    paused: bool,
    stopped: bool,
}

/// Handle to one simulated stream
#[derive(Debug)]
pub struct SimulatedHandle {
    control: watch::Sender<Control>,
}

impl StreamHandle for SimulatedHandle {
    fn set_paused(&self, paused: bool) {
        self.control.send_modify(|c| c.paused = paused);
    }

    fn stop(&self) {
        self.control.send_modify(|c| c.stopped = true);
    }
}

#[derive(Debug)]
pub struct SimulatedSink {
    speed: f64,
    disconnected: AtomicBool,
}

impl SimulatedSink {
    /// Create a sink playing `speed` times faster than real time
    pub fn new(speed: f64) -> CatalogResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(CatalogError::InvalidSpeed(speed));
        }
        Ok(Self {
            speed,
            disconnected: AtomicBool::new(false),
        })
    }

    /// A new, connected sink with the same speed
    pub fn fresh(&self) -> Self {
        Self {
            speed: self.speed,
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamSink for SimulatedSink {
    async fn open(&self, source: StreamSource) -> Result<StreamSession> {
        if self.is_disconnected() {
            return Err(EncoreError::sink("sink is disconnected"));
        }

        let length = source
            .duration
            .unwrap_or(Duration::ZERO)
            .div_f64(self.speed);

        let (control, watcher) = watch::channel(Control::default());
        let (session, completion) = StreamSession::new(Arc::new(SimulatedHandle { control }));

        debug!(location = %source.location, ?length, "Opening simulated stream");
        tokio::spawn(drive(source.track_id, length, watcher, completion));

        Ok(session)
    }

    async fn disconnect(&self) {
        if !self.disconnected.swap(true, Ordering::SeqCst) {
            info!("Simulated sink disconnected");
        }
    }
}

async fn drive(
    track_id: String,
    length: Duration,
    mut control: watch::Receiver<Control>,
    completion: oneshot::Sender<Result<()>>,
) {
    let mut remaining = length;

    loop {
        let state = *control.borrow_and_update();
        if state.stopped {
            debug!(track_id, "Simulated stream stopped");
            return;
        }

        if state.paused {
            if control.changed().await.is_err() {
                return;
            }
            continue;
        }

        let started = Instant::now();
        tokio::select! {
            () = tokio::time::sleep(remaining) => {
                debug!(track_id, "Simulated stream finished");
                let _ = completion.send(Ok(()));
                return;
            }
            changed = control.changed() => {
                remaining = remaining.saturating_sub(started.elapsed());
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}
