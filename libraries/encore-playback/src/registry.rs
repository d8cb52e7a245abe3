//! Session key to player mapping

use crate::{player::Player, types::PlayerConfig};
use encore_core::{StreamSink, TrackResolver};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Builds the sink for a new session
pub type SinkFactory = Arc<dyn Fn(&str) -> Arc<dyn StreamSink> + Send + Sync>;

/// Players by session key
///
/// Players created here share one resolver; each gets its own sink from the
/// factory.
pub struct PlayerRegistry {
    players: RwLock<HashMap<String, Player>>,
    resolver: Arc<dyn TrackResolver>,
    sinks: SinkFactory,
    config: PlayerConfig,
}

impl PlayerRegistry {
    pub fn new(resolver: Arc<dyn TrackResolver>, sinks: SinkFactory, config: PlayerConfig) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            resolver,
            sinks,
            config,
        }
    }

    pub async fn get(&self, key: &str) -> Option<Player> {
        self.players.read().await.get(key).cloned()
    }

    /// Player for `key`, creating an idle one on first use
    pub async fn get_or_create(&self, key: &str) -> Player {
        self.ensure(key).await.0
    }

    /// Like [`get_or_create`](Self::get_or_create), also reporting whether
    /// this call created the player
    pub async fn ensure(&self, key: &str) -> (Player, bool) {
        if let Some(player) = self.get(key).await {
            return (player, false);
        }

        let mut players = self.players.write().await;
        if let Some(player) = players.get(key) {
            return (player.clone(), false);
        }

        info!(session = key, "Creating player");
        let player = Player::new(
            self.resolver.clone(),
            (self.sinks)(key),
            self.config.clone(),
        );
        players.insert(key.to_string(), player.clone());
        (player, true)
    }

    /// Register an externally built player, returning the one it replaced
    pub async fn insert(&self, key: impl Into<String>, player: Player) -> Option<Player> {
        let key = key.into();
        info!(session = %key, "Registering player");
        self.players.write().await.insert(key, player)
    }

    /// Unregister without closing
    pub async fn remove(&self, key: &str) -> Option<Player> {
        let removed = self.players.write().await.remove(key);
        if removed.is_some() {
            info!(session = key, "Removed player");
        }
        removed
    }

    /// Close and unregister; `false` if there was no such session
    pub async fn close(&self, key: &str) -> bool {
        match self.remove(key).await {
            Some(player) => {
                player.close().await;
                true
            }
            None => false,
        }
    }

    /// Close every player
    pub async fn close_all(&self) {
        let players: Vec<(String, Player)> = self.players.write().await.drain().collect();
        for (key, player) in players {
            info!(session = %key, "Closing player");
            player.close().await;
        }
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }

    /// Session keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.players.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for PlayerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
