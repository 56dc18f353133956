/// Collaborator traits consumed by the playback controller
///
/// Each trait is a narrow contract over something the host platform provides:
/// the media index, the decoder/output engine, a key-value preferences store,
/// the daily history file, and the now-playing surface.
use crate::error::Result;
use crate::types::{HistoryEntry, Track};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Read-only access to the indexed tracks
pub trait TrackCatalog: Send {
    /// Every track in the library, in no particular order
    fn all_tracks(&self) -> Vec<Track>;

    /// Tracks belonging to an album
    fn tracks_for_album(&self, album_id: u64) -> Vec<Track> {
        self.all_tracks()
            .into_iter()
            .filter(|t| t.album_id == Some(album_id))
            .collect()
    }

    /// Tracks credited to `name`
    ///
    /// The default compares the whole artist string.
    fn tracks_for_artist(&self, name: &str) -> Vec<Track> {
        self.all_tracks()
            .into_iter()
            .filter(|t| t.artist == name)
            .collect()
    }

    /// Tracks of a named playlist, `None` when no such playlist exists
    fn playlist_tracks(&self, _name: &str) -> Option<Vec<Track>> {
        None
    }
}

/// Decoder/output engine for a single track at a time
///
/// The controller exclusively owns its engine: only the controller loads,
/// starts, pauses and releases it.
pub trait PlaybackEngine: Send {
    /// Open a content reference, replacing whatever was loaded
    ///
    /// # Errors
    /// Returns an error if the reference cannot be opened
    fn load(&mut self, uri: &str) -> Result<()>;

    /// Start or resume output
    fn start(&mut self);

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Move to `position_ms` in the loaded track
    fn seek(&mut self, position_ms: u64);

    /// Drop the loaded track
    fn release(&mut self);

    /// Whether output is running
    fn is_playing(&self) -> bool;

    /// Current position in the loaded track
    fn position_ms(&self) -> u64;

    /// Length of the loaded track, 0 when unknown
    fn duration_ms(&self) -> u64;

    /// Register the callback fired once the loaded track plays to its end
    ///
    /// Replaces any previously registered callback.
    fn on_completion(&mut self, callback: Box<dyn FnMut() + Send>);
}

/// Synchronous key-value preferences store
pub trait KeyValueStore: Send {
    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns an error if the write cannot be persisted
    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    /// Read a value
    fn get(&self, key: &str) -> Option<Value>;

    /// Delete a value
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Delete every value
    fn clear(&mut self) -> Result<()>;
}

/// Append-only daily listening log
pub trait HistoryLog: Send {
    /// Record that `track` started playing at `at`
    ///
    /// Returns `false` when an entry with the same `(title, artist)` already
    /// exists for that calendar day.
    fn append(&mut self, track: &Track, at: NaiveDateTime) -> Result<bool>;

    /// Entries recorded on `day`, newest first
    fn entries_on(&self, day: NaiveDate) -> Vec<HistoryEntry>;

    /// Entries recorded today, newest first
    fn load_today(&self) -> Vec<HistoryEntry> {
        self.entries_on(Local::now().date_naive())
    }
}

/// Fire-and-forget now-playing surface (notification, media session, status line)
pub trait NowPlayingSink: Send {
    fn update(&mut self, track: Option<&Track>, is_playing: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCatalog(Vec<Track>);

    impl TrackCatalog for FixedCatalog {
        fn all_tracks(&self) -> Vec<Track> {
            self.0.clone()
        }
    }

    #[test]
    fn default_filters_use_all_tracks() {
        let catalog = FixedCatalog(vec![
            Track::new("A", "Solo", "a").with_album(1, "One"),
            Track::new("B", "Solo, Guest", "b").with_album(1, "One"),
            Track::new("C", "Solo", "c").with_album(2, "Two"),
        ]);

        assert_eq!(catalog.tracks_for_album(1).len(), 2);
        // Exact equality, not membership in a multi-artist string
        let solo: Vec<String> = catalog
            .tracks_for_artist("Solo")
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(solo, vec!["A", "C"]);
        assert!(catalog.playlist_tracks("anything").is_none());
    }
}
