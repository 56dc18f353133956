/// In-memory catalog and browse views
use crate::calendar::{self, MonthEntry};
use crate::search::{contains_term, normalize_query, SearchFilter, SearchResults};
use cadence_core::{Album, Artist, Playlist, Track, TrackCatalog};
use std::collections::{BTreeMap, HashSet};

/// Artist strings that contain a comma but name a single artist
pub const DEFAULT_UNSPLITTABLE_ARTISTS: &[&str] = &["Tyler, The Creator"];

/// Split a tagged artist string into individual artist names
///
/// Names listed in `unsplittable` (compared after trimming) are kept whole.
pub fn split_artists(raw: &str, unsplittable: &[String]) -> Vec<String> {
    let trimmed = raw.trim();
    if unsplittable.iter().any(|name| name == trimmed) {
        return vec![trimmed.to_string()];
    }

    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// The indexed tracks plus the user's playlists
#[derive(Debug, Clone)]
pub struct Library {
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
    unsplittable: Vec<String>,
}

impl Library {
    /// Create a library over `tracks` with the default unsplittable artists
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            playlists: Vec::new(),
            unsplittable: DEFAULT_UNSPLITTABLE_ARTISTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Replace the unsplittable artist list
    #[must_use]
    pub fn with_unsplittable_artists(mut self, names: Vec<String>) -> Self {
        self.unsplittable = names;
        self
    }

    /// Attach playlists
    #[must_use]
    pub fn with_playlists(mut self, playlists: Vec<Playlist>) -> Self {
        self.playlists = playlists;
        self
    }

    /// Replace the playlists (after the playlist store changed)
    pub fn set_playlists(&mut self, playlists: Vec<Playlist>) {
        self.playlists = playlists;
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks sorted by title, case-insensitive
    pub fn songs(&self) -> Vec<Track> {
        let mut songs = self.tracks.clone();
        songs.sort_by_cached_key(|t| t.title.to_lowercase());
        songs
    }

    /// One album per distinct album id, sorted by name
    ///
    /// Name, artist and cover come from the first track seen. Tracks without
    /// an album id are skipped.
    pub fn albums(&self) -> Vec<Album> {
        let mut seen = HashSet::new();
        let mut albums = Vec::new();

        for track in &self.tracks {
            let Some(id) = track.album_id else { continue };
            if !seen.insert(id) {
                continue;
            }

            albums.push(Album {
                id,
                name: track.album_name.clone().unwrap_or_default(),
                artist: track
                    .album_artist
                    .clone()
                    .unwrap_or_else(|| track.artist.clone()),
                cover_uri: track.cover_uri.clone(),
            });
        }

        albums.sort_by_cached_key(|a| a.name.to_lowercase());
        albums
    }

    /// Individual artists across every track, sorted by name
    pub fn artists(&self) -> Vec<Artist> {
        let mut covers: BTreeMap<String, Option<String>> = BTreeMap::new();

        for track in &self.tracks {
            for name in split_artists(&track.artist, &self.unsplittable) {
                covers
                    .entry(name)
                    .or_insert_with(|| track.cover_uri.clone());
            }
        }

        let mut artists: Vec<Artist> = covers
            .into_iter()
            .map(|(name, cover_uri)| Artist { name, cover_uri })
            .collect();
        artists.sort_by_cached_key(|a| a.name.to_lowercase());
        artists
    }

    /// Tracks on which `name` appears as one of the split artists
    pub fn tracks_for_artist_name(&self, name: &str) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| split_artists(&t.artist, &self.unsplittable).iter().any(|a| a == name))
            .cloned()
            .collect()
    }

    /// Tracks of an album, in track-number order
    pub fn album_tracks(&self, album_id: u64) -> Vec<Track> {
        let mut tracks = self.tracks_for_album(album_id);
        tracks.sort_by_key(|t| t.track_number.unwrap_or(u32::MAX));
        tracks
    }

    /// Case-insensitive substring search
    pub fn search(&self, query: &str, filter: SearchFilter) -> SearchResults {
        let Some(term) = normalize_query(query) else {
            return SearchResults::default();
        };

        let mut results = SearchResults::default();

        if filter.includes_songs() {
            results.songs = self
                .songs()
                .into_iter()
                .filter(|t| contains_term(&t.title, &term) || contains_term(&t.artist, &term))
                .collect();
        }

        if filter.includes_artists() {
            results.artists = self
                .artists()
                .into_iter()
                .filter(|a| contains_term(&a.name, &term))
                .collect();
        }

        if filter.includes_albums() {
            results.albums = self
                .albums()
                .into_iter()
                .filter(|a| contains_term(&a.name, &term) || contains_term(&a.artist, &term))
                .collect();
        }

        results
    }

    /// Newest additions first
    pub fn recently_added(&self, limit: usize) -> Vec<Track> {
        let mut tracks = self.tracks.clone();
        tracks.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        tracks.truncate(limit);
        tracks
    }

    /// Additions grouped by month and day, newest month first
    pub fn added_by_month(&self) -> Vec<MonthEntry> {
        calendar::group_by_month(&self.tracks)
    }

    /// Tracks sharing a cover reference
    pub fn tracks_by_cover(&self, cover_uri: &str) -> Vec<Track> {
        self.tracks
            .iter()
            .filter(|t| t.cover_uri.as_deref() == Some(cover_uri))
            .cloned()
            .collect()
    }

    /// Sum of known durations
    pub fn total_duration_ms(tracks: &[Track]) -> u64 {
        tracks.iter().filter_map(|t| t.duration_ms).sum()
    }

    /// Swap in an edited track, matched by content reference
    ///
    /// Returns `false` when no track has that reference.
    pub fn replace_track(&mut self, updated: Track) -> bool {
        match self.tracks.iter_mut().find(|t| t.uri == updated.uri) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}

impl TrackCatalog for Library {
    fn all_tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    /// Same membership as the artist browse view, so a restored artist
    /// queue matches the one that was played
    fn tracks_for_artist(&self, name: &str) -> Vec<Track> {
        self.tracks_for_artist_name(name)
    }

    fn playlist_tracks(&self, name: &str) -> Option<Vec<Track>> {
        self.playlists
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.tracks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsplittable() -> Vec<String> {
        vec!["Tyler, The Creator".to_string()]
    }

    #[test]
    fn split_on_commas() {
        assert_eq!(
            split_artists("Daft Punk, Pharrell Williams ,", &unsplittable()),
            vec!["Daft Punk", "Pharrell Williams"]
        );
    }

    #[test]
    fn unsplittable_artist_kept_whole() {
        assert_eq!(
            split_artists(" Tyler, The Creator ", &unsplittable()),
            vec!["Tyler, The Creator"]
        );
        // Only an exact match is protected
        assert_eq!(
            split_artists("Tyler, The Creator, Kali Uchis", &unsplittable()),
            vec!["Tyler", "The Creator", "Kali Uchis"]
        );
    }

    #[test]
    fn replace_track_by_uri() {
        let mut library = Library::new(vec![Track::new("Old", "A", "file:///a.mp3")]);

        assert!(library.replace_track(Track::new("New", "A", "file:///a.mp3")));
        assert!(!library.replace_track(Track::new("X", "A", "file:///missing.mp3")));
        assert_eq!(library.tracks()[0].title, "New");
    }

    #[test]
    fn playlist_lookup() {
        let mut gym = Playlist::new("Gym", None);
        gym.tracks.push(Track::new("Run", "A", "r"));
        let library = Library::new(Vec::new()).with_playlists(vec![gym]);

        assert_eq!(library.playlist_tracks("Gym").map(|t| t.len()), Some(1));
        assert!(library.playlist_tracks("Sleep").is_none());
    }
}
