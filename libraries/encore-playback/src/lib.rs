//! Encore - Queue Playback
//!
//! Per-session media queue player.
//!
//! This crate provides:
//! - An ordered queue with a playback cursor
//! - An Idle/Playing/Paused state machine
//! - A background play loop that resolves, opens and waits on one stream at
//!   a time
//! - Skip and stop signals that hand control to the play loop and wait for it
//! - Weighted auto-discovery of the next track when the queue runs out
//! - Paged queue listings
//! - A registry mapping session keys to players
//!
//! # Architecture
//!
//! `encore-playback` does no I/O of its own. Track lookup and audio output
//! are provided through the `TrackResolver` and `StreamSink` traits from
//! `encore-core`. Asynchronous failures and progress are published as
//! [`PlayerEvent`]s.
//!
//! ```text
//!   add / go_to / pause / ...        subscribe()
//!              |                          ^
//!              v                          |
//!   +---------------------+   events   +--+
//!   | Player (one lock)   |----------->|  |
//!   +---------------------+            +--+
//!         | spawn      ^ skip / stop
//!         v            |
//!   +---------------------+
//!   | play loop task      |--> TrackResolver::resolve
//!   |                     |--> StreamSink::open --> StreamHandle
//!   +---------------------+
//! ```
//!
//! # Example: Listing
//!
//! ```rust
//! use encore_core::Track;
//! use encore_playback::Queue;
//! use std::time::Duration;
//!
//! let mut queue = Queue::new();
//! queue.push(Track::new("a", "Opening", Duration::from_secs(95)));
//! queue.push(Track::new("b", "Closing", Duration::from_secs(240)));
//!
//! let page = queue.page(1, 10, false);
//! assert_eq!(page.total_tracks, 2);
//! assert!(page.to_string().ends_with("Page 1 of 1"));
//! ```

pub mod discovery;
pub mod error;
pub mod events;
mod play_loop;
pub mod player;
pub mod queue;
pub mod registry;
mod signal;
pub mod types;

pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use player::Player;
pub use queue::Queue;
pub use registry::{PlayerRegistry, SinkFactory};
pub use types::{PlaybackState, PlayerConfig, TrackPage, TrackRow};
