//! Shared test doubles for player tests
//!
//! `ScriptedSink` records every stream it opens and leaves completion to the
//! test; `FakeResolver` serves a fixed set of tracks.

#![allow(dead_code)]

use async_trait::async_trait;
use encore_core::{
    EncoreError, Result, StreamHandle, StreamSession, StreamSink, StreamSource, Track,
    TrackResolver,
};
use encore_playback::{PlaybackState, Player, PlayerConfig, PlayerEvent};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id.to_uppercase()), Duration::from_secs(180))
}

pub fn source(track_id: &str) -> StreamSource {
    StreamSource {
        track_id: track_id.to_string(),
        location: format!("memory://{}", track_id),
        duration: None,
    }
}

/// Await `fut` or panic after `TIMEOUT`
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(TIMEOUT, fut)
        .await
        .expect("timed out waiting")
}

/// Poll until `check` holds
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    within(async {
        while !check().await {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await;
}

pub async fn wait_for_state(player: &Player, state: PlaybackState) {
    eventually(|| async move { player.state().await == state }).await;
}

/// Receive events until one matches
pub async fn expect_event<F>(rx: &mut broadcast::Receiver<PlayerEvent>, mut matches: F) -> PlayerEvent
where
    F: FnMut(&PlayerEvent) -> bool,
{
    within(async {
        loop {
            match rx.recv().await {
                Ok(event) if matches(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event stream closed"),
            }
        }
    })
    .await
}

// ===== Stream handle =====

#[derive(Debug, Default)]
pub struct TestHandle {
    paused: AtomicBool,
    stopped: AtomicBool,
    stop_calls: AtomicUsize,
}

impl TestHandle {
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl StreamHandle for TestHandle {
    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== Sink =====

pub struct OpenedStream {
    pub track_id: String,
    pub handle: Arc<TestHandle>,
    completion: Option<oneshot::Sender<Result<()>>>,
}

/// Sink whose streams only end when the test says so
#[derive(Default)]
pub struct ScriptedSink {
    opened: Mutex<Vec<OpenedStream>>,
    fail_open: AtomicBool,
    disconnected: AtomicBool,
}

impl ScriptedSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_opens(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn opened_ids(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.track_id.clone())
            .collect()
    }

    pub fn handle(&self, index: usize) -> Arc<TestHandle> {
        self.opened.lock().unwrap()[index].handle.clone()
    }

    /// Streams opened and not stopped by the player
    pub fn live_count(&self) -> usize {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.handle.is_stopped())
            .count()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }

    pub async fn wait_for_opens(&self, n: usize) {
        eventually(|| async move { self.open_count() >= n }).await;
    }

    fn complete(&self, index: usize, result: Option<Result<()>>) {
        let sender = self.opened.lock().unwrap()[index]
            .completion
            .take()
            .expect("stream already completed");
        if let Some(result) = result {
            let _ = sender.send(result);
        }
    }

    /// End stream `index` normally
    pub fn finish(&self, index: usize) {
        self.complete(index, Some(Ok(())));
    }

    /// Break stream `index` mid-playback
    pub fn fail(&self, index: usize, message: &str) {
        self.complete(index, Some(Err(EncoreError::sink(message))));
    }

    /// Drop the completion sender without reporting anything
    pub fn abandon(&self, index: usize) {
        self.complete(index, None);
    }
}

#[async_trait]
impl StreamSink for ScriptedSink {
    async fn open(&self, source: StreamSource) -> Result<StreamSession> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(EncoreError::sink("device unavailable"));
        }

        let handle = Arc::new(TestHandle::default());
        let (session, completion) = StreamSession::new(handle.clone());
        self.opened.lock().unwrap().push(OpenedStream {
            track_id: source.track_id,
            handle,
            completion: Some(completion),
        });
        Ok(session)
    }

    async fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

// ===== Resolver =====

/// Resolves any id except the ones marked unplayable or blocked
#[derive(Default)]
pub struct FakeResolver {
    unplayable: Mutex<HashSet<String>>,
    blocked: Mutex<HashSet<String>>,
    suggestions: Mutex<HashMap<String, Vec<Track>>>,
    catalog: Mutex<Vec<Track>>,
    resolves: AtomicUsize,
}

impl FakeResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unplayable(&self, id: &str) {
        self.unplayable.lock().unwrap().insert(id.to_string());
    }

    /// Resolution of `id` never completes
    pub fn block(&self, id: &str) {
        self.blocked.lock().unwrap().insert(id.to_string());
    }

    pub fn suggest_for(&self, id: &str, tracks: Vec<Track>) {
        self.suggestions
            .lock()
            .unwrap()
            .insert(id.to_string(), tracks);
    }

    pub fn stock(&self, tracks: Vec<Track>) {
        *self.catalog.lock().unwrap() = tracks;
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackResolver for FakeResolver {
    async fn resolve(&self, track_id: &str) -> Result<StreamSource> {
        self.resolves.fetch_add(1, Ordering::SeqCst);

        let blocked = self.blocked.lock().unwrap().contains(track_id);
        if blocked {
            std::future::pending::<()>().await;
        }
        if self.unplayable.lock().unwrap().contains(track_id) {
            return Err(EncoreError::Unplayable(track_id.to_string()));
        }
        Ok(source(track_id))
    }

    async fn suggest(&self, track_id: &str) -> Result<Vec<Track>> {
        self.suggestions
            .lock()
            .unwrap()
            .get(track_id)
            .cloned()
            .ok_or_else(|| EncoreError::NoResults(track_id.to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        let query = query.to_lowercase();
        Ok(self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}

pub struct Harness {
    pub player: Player,
    pub sink: Arc<ScriptedSink>,
    pub resolver: Arc<FakeResolver>,
}

pub fn harness() -> Harness {
    harness_with(PlayerConfig::default())
}

pub fn harness_with(config: PlayerConfig) -> Harness {
    let sink = ScriptedSink::new();
    let resolver = FakeResolver::new();
    let player = Player::new(resolver.clone(), sink.clone(), config);
    Harness {
        player,
        sink,
        resolver,
    }
}
