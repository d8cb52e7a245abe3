//! Ordered track queue with a playback cursor
//!
//! Insertion order is playback order. The cursor addresses the track playing
//! or about to play; `cursor == len` means the queue is exhausted.
//!
//! ```text
//!  0        1        2        3      len
//! [Track A][Track B][Track C][Track D] |
//!           ^ cursor
//! ```

use crate::error::{PlaybackError, Result};
use crate::types::{TrackPage, TrackRow};
use encore_core::Track;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    cursor: usize,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track at the cursor, if the queue is not exhausted
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn last(&self) -> Option<&Track> {
        self.tracks.last()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tracks.len()
    }

    /// Append a track, returning its index
    pub fn push(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Clamp a requested position into `[0, len]`
    pub fn clamp(&self, index: isize) -> usize {
        if index < 0 {
            0
        } else {
            (index as usize).min(self.tracks.len())
        }
    }

    /// Move the cursor, clamped into `[0, len]`
    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.tracks.len());
    }

    /// Step past the cursor track
    pub fn advance(&mut self) {
        if self.cursor < self.tracks.len() {
            self.cursor += 1;
        }
    }

    /// Remove the track at `index`
    ///
    /// With `protect_cursor` set, the cursor track cannot be removed. Tracks
    /// before the cursor shift it down so it keeps addressing the same track.
    pub fn remove(&mut self, index: usize, protect_cursor: bool) -> Result<Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::NotFound(index));
        }

        if protect_cursor && index == self.cursor {
            return Err(PlaybackError::CannotRemoveActiveTrack(index));
        }

        let track = self.tracks.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }

        Ok(track)
    }

    /// Clear tracks, returning how many were dropped
    ///
    /// - idle, `all`: everything goes
    /// - idle, not `all`: nothing is queued, no-op
    /// - active, `all`: only the current track is kept
    /// - active, not `all`: upcoming tracks are dropped (and counted); played
    ///   tracks are trimmed so the current track lands at index 0
    ///
    /// The cursor is reset to 0 unless the call was a no-op.
    pub fn clear(&mut self, all: bool, active: bool) -> usize {
        if self.tracks.is_empty() {
            return 0;
        }

        let current = if active {
            self.tracks.get(self.cursor).cloned()
        } else {
            None
        };

        let removed = match (current, all) {
            (None, true) => {
                let total = self.tracks.len();
                self.tracks.clear();
                total
            }
            (None, false) => return 0,
            (Some(current), true) => {
                let total = self.tracks.len() - 1;
                self.tracks = vec![current];
                total
            }
            (Some(current), false) => {
                let upcoming = self.tracks.len() - self.cursor - 1;
                self.tracks = vec![current];
                upcoming
            }
        };

        self.cursor = 0;
        removed
    }

    /// Drop every track and rewind the cursor
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.cursor = 0;
    }

    /// Build one listing page
    ///
    /// `page == 0` selects the page holding the cursor. `page_size` must be
    /// non-zero.
    pub fn page(&self, page: usize, page_size: usize, active: bool) -> TrackPage {
        let page_size = page_size.max(1);
        let page = if page == 0 {
            self.cursor / page_size + 1
        } else {
            page
        };

        let len = self.tracks.len();
        let start = (page - 1).saturating_mul(page_size).min(len);
        let end = start.saturating_add(page_size).min(len);

        let rows = self.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| TrackRow {
                position: start + offset + 1,
                name: track.name.clone(),
                duration: track.duration,
                playing: start + offset == self.cursor,
            })
            .collect();

        let total_queued = if active {
            len.saturating_sub(self.cursor + 1)
        } else {
            0
        };

        TrackPage {
            rows,
            page,
            page_size,
            total_pages: len / page_size + 1,
            total_tracks: len,
            total_queued,
        }
    }
}
