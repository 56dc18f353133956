//! Cadence Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! every Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `Artist`, `Playlist`, `HistoryEntry`
//! - **Playback Vocabulary**: `RepeatMode`, `PlaybackContext`
//! - **Collaborator Traits**: `TrackCatalog`, `PlaybackEngine`, `KeyValueStore`,
//!   `HistoryLog`, `NowPlayingSink`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Track, TrackKey};
//!
//! let a = Track::new("Intro", "The Band", "file:///music/a.mp3");
//! let b = Track::new("Intro", "The Band", "file:///music/b.mp3");
//!
//! // Identity is (title, artist), not the content reference
//! assert!(a.same_identity(&b));
//! assert_eq!(a.key(), TrackKey::new("Intro", "The Band"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use traits::{HistoryLog, KeyValueStore, NowPlayingSink, PlaybackEngine, TrackCatalog};

pub use types::{
    Album, Artist, ContextKind, HistoryEntry, PlaybackContext, Playlist, RepeatMode, Track,
    TrackKey,
};
