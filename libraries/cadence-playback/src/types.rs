//! Playback data types

use cadence_core::{PlaybackContext, RepeatMode, Track};
use serde::{Deserialize, Serialize};

/// What is needed to resume the last session
///
/// Written after every track change and every seek, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPlaybackState {
    pub title: String,
    pub artist: String,
    pub uri: String,
    #[serde(default)]
    pub cover_uri: Option<String>,
    #[serde(default)]
    pub album_id: Option<u64>,
    #[serde(default)]
    pub context: PlaybackContext,
    /// Last known position; recorded but not used when resuming
    #[serde(default)]
    pub position_ms: u64,
}

impl PersistedPlaybackState {
    /// Capture the state for `track` playing from `context`
    pub fn capture(track: &Track, context: &PlaybackContext, position_ms: u64) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            uri: track.uri.clone(),
            cover_uri: track.cover_uri.clone(),
            album_id: track.album_id,
            context: context.clone(),
            position_ms,
        }
    }

    /// Minimal track carrying the persisted identity
    pub fn to_track(&self) -> Track {
        let mut track = Track::new(self.title.clone(), self.artist.clone(), self.uri.clone());
        track.cover_uri.clone_from(&self.cover_uri);
        track.album_id = self.album_id;
        track
    }
}

/// Controller configuration
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// Seed for shuffling; `None` seeds from entropy
    pub shuffle_seed: Option<u64>,
}

/// Point-in-time copy of everything the player exposes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSnapshot {
    pub current_track: Option<Track>,
    pub queue: Vec<Track>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub context: PlaybackContext,
    pub position_ms: u64,
    pub duration_ms: u64,
}
