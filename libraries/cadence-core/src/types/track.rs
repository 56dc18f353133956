/// Track domain types
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Logical identity of a track: the `(title, artist)` pair
///
/// Two files with identical title and artist share a key. Queue lookups and
/// the daily history both compare keys, never content references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackKey {
    /// Track title
    pub title: String,

    /// Artist string as tagged (may be comma-joined)
    pub artist: String,
}

impl TrackKey {
    /// Create a new key
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// An indexed audio file
///
/// Produced by the catalog loader and treated as read-only by playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track title
    pub title: String,

    /// Artist (may be a comma-joined multi-artist string)
    pub artist: String,

    /// Stable content reference (URI or path string)
    pub uri: String,

    /// When the file was added to the library (local wall clock)
    pub added_at: NaiveDateTime,

    /// Cover art reference
    #[serde(default)]
    pub cover_uri: Option<String>,

    /// Track number within the album
    #[serde(default)]
    pub track_number: Option<u32>,

    /// Album identifier
    #[serde(default)]
    pub album_id: Option<u64>,

    /// Album name
    #[serde(default)]
    pub album_name: Option<String>,

    /// Album artist
    #[serde(default)]
    pub album_artist: Option<String>,

    /// Release year
    #[serde(default)]
    pub year: Option<u32>,

    /// Local file path, when the content reference is a file
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Duration in milliseconds, when known
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Create a track with only the required fields set
    ///
    /// `added_at` defaults to now.
    pub fn new(title: impl Into<String>, artist: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            uri: uri.into(),
            added_at: Local::now().naive_local(),
            cover_uri: None,
            track_number: None,
            album_id: None,
            album_name: None,
            album_artist: None,
            year: None,
            path: None,
            duration_ms: None,
        }
    }

    /// Set album id and name
    #[must_use]
    pub fn with_album(mut self, album_id: u64, album_name: impl Into<String>) -> Self {
        self.album_id = Some(album_id);
        self.album_name = Some(album_name.into());
        self
    }

    /// Set the track number
    #[must_use]
    pub fn with_track_number(mut self, track_number: u32) -> Self {
        self.track_number = Some(track_number);
        self
    }

    /// Set the cover art reference
    #[must_use]
    pub fn with_cover(mut self, cover_uri: impl Into<String>) -> Self {
        self.cover_uri = Some(cover_uri.into());
        self
    }

    /// Set the added-at timestamp
    #[must_use]
    pub fn with_added_at(mut self, added_at: NaiveDateTime) -> Self {
        self.added_at = added_at;
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Logical identity of this track
    pub fn key(&self) -> TrackKey {
        TrackKey::new(self.title.clone(), self.artist.clone())
    }

    /// Whether `other` is the same logical track (same title and artist)
    pub fn same_identity(&self, other: &Track) -> bool {
        self.title == other.title && self.artist == other.artist
    }

    /// Whether this track matches a `(title, artist)` pair
    pub fn matches_key(&self, key: &TrackKey) -> bool {
        self.title == key.title && self.artist == key.artist
    }
}
