//! Encore Core
//!
//! Platform-agnostic types and collaborator traits for the Encore queue player.
//!
//! The playback engine (`encore-playback`) never talks to a network or an audio
//! device directly. It drives two collaborators defined here:
//! - **`TrackResolver`**: turns a track identifier into a playable `StreamSource`,
//!   searches for tracks and suggests what to play next
//! - **`StreamSink`**: streams a resolved source and reports completion
//!
//! # Example
//!
//! ```rust
//! use encore_core::{time, Track};
//! use std::time::Duration;
//!
//! let length = time::parse_length_text("3:25").unwrap();
//! let track = Track::new("abc123", "My Song", length);
//!
//! assert_eq!(track.duration, Duration::from_secs(205));
//! assert_eq!(time::format_length(track.duration), "3:25");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EncoreError, Result};
pub use traits::{StreamHandle, StreamSink, TrackResolver};
pub use types::{StreamSession, StreamSource, Track};
