//! Core types for playback management

use encore_core::time::format_length;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No stream open and no play loop running
    #[default]
    Idle,

    /// Play loop running with an unpaused stream
    Playing,

    /// Play loop running with its stream paused
    Paused,
}

impl PlaybackState {
    /// Whether a play loop currently owns the cursor track
    pub fn is_active(self) -> bool {
        !matches!(self, PlaybackState::Idle)
    }
}

/// Configuration for a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Rows per listing page when the caller passes 0 (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Buffered events per subscriber before old ones are dropped (default: 64)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Initial auto-discovery flag (default: false)
    #[serde(default)]
    pub auto_discover: bool,
}

fn default_page_size() -> usize {
    10
}

fn default_event_capacity() -> usize {
    64
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            event_capacity: default_event_capacity(),
            auto_discover: false,
        }
    }
}

/// One listed track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    /// 1-based queue position
    pub position: usize,
    pub name: String,
    pub duration: Duration,
    /// Row is at the cursor
    pub playing: bool,
}

/// A page of the queue listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPage {
    pub rows: Vec<TrackRow>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_tracks: usize,
    /// Tracks after the cursor (0 while idle)
    pub total_queued: usize,
}

impl fmt::Display for TrackPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "No tracks");
        }

        writeln!(
            f,
            "Total tracks: {} ({} queued)",
            self.total_tracks, self.total_queued
        )?;

        for row in &self.rows {
            write!(
                f,
                "{} {}  {}",
                row.position,
                row.name,
                format_length(row.duration)
            )?;
            if row.playing {
                write!(f, "  [Playing]")?;
            }
            writeln!(f)?;
        }

        write!(f, "Page {} of {}", self.page, self.total_pages)
    }
}
