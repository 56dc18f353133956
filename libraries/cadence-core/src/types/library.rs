/// Browse-level domain types derived from the catalog
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Album summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album identifier
    pub id: u64,

    /// Album name
    pub name: String,

    /// Artist shown for the album
    pub artist: String,

    /// Cover art reference
    pub cover_uri: Option<String>,
}

/// Artist summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Single artist name (already split from multi-artist strings)
    pub name: String,

    /// Cover of the first track seen for this artist
    pub cover_uri: Option<String>,
}

/// User playlist
///
/// Playlists are identified by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist name (unique)
    pub name: String,

    /// Tracks in insertion order
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Optional cover image
    #[serde(default)]
    pub image_uri: Option<String>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(name: impl Into<String>, image_uri: Option<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            image_uri,
        }
    }

    /// Whether the playlist already holds this exact track
    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.iter().any(|t| t == track)
    }
}
