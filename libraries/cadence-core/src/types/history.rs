/// Daily listening history entries
use crate::types::{Track, TrackKey};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One "played today" record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title: String,
    pub artist: String,
    pub uri: String,
    #[serde(default)]
    pub cover_uri: Option<String>,
    pub played_at: NaiveDateTime,
}

impl HistoryEntry {
    /// Build an entry for `track` played at `played_at`
    pub fn from_track(track: &Track, played_at: NaiveDateTime) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            uri: track.uri.clone(),
            cover_uri: track.cover_uri.clone(),
            played_at,
        }
    }

    pub fn key(&self) -> TrackKey {
        TrackKey::new(self.title.clone(), self.artist.clone())
    }

    /// Calendar day the entry belongs to
    pub fn day(&self) -> NaiveDate {
        self.played_at.date()
    }

    /// Same `(title, artist)` on the same day
    pub fn is_duplicate_of(&self, track: &Track, day: NaiveDate) -> bool {
        self.title == track.title && self.artist == track.artist && self.day() == day
    }
}
