//! Shared fakes for playback integration tests

use cadence_core::{
    HistoryEntry, HistoryLog, KeyValueStore, NowPlayingSink, PlaybackEngine, Result, Track,
    TrackCatalog,
};
use cadence_playback::{ControllerConfig, PlaybackQueueController};
use cadence_storage::{HistoryStore, MemoryStore};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ===== Track helpers =====

pub fn numbered(title: &str, n: u32) -> Track {
    Track::new(title, "Band", format!("/music/{}.mp3", title))
        .with_album(1, "Album")
        .with_track_number(n)
}

pub fn loose(title: &str, artist: &str) -> Track {
    Track::new(title, artist, format!("/music/{}-{}.mp3", artist, title))
}

pub fn titles(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.title.clone()).collect()
}

/// Album tracks numbered 3, 1, 2 with titles C, A, B
pub fn album_cab() -> Vec<Track> {
    vec![numbered("C", 3), numbered("A", 1), numbered("B", 2)]
}

// ===== Catalog =====

#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub tracks: Vec<Track>,
    pub playlists: HashMap<String, Vec<Track>>,
}

impl TrackCatalog for FakeCatalog {
    fn all_tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    fn playlist_tracks(&self, name: &str) -> Option<Vec<Track>> {
        self.playlists.get(name).cloned()
    }
}

// ===== Engine =====

#[derive(Default)]
pub struct EngineState {
    pub loaded: Option<String>,
    pub playing: bool,
    pub position_ms: u64,
    pub loads: Vec<String>,
    pub releases: usize,
    pub fail_uris: HashSet<String>,
    completion: Option<Box<dyn FnMut() + Send>>,
}

/// Engine that records calls; clones share state
#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<EngineState>>,
}

impl FakeEngine {
    pub fn loads(&self) -> Vec<String> {
        self.state.lock().unwrap().loads.clone()
    }

    pub fn loaded(&self) -> Option<String> {
        self.state.lock().unwrap().loaded.clone()
    }

    pub fn playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn set_position(&self, position_ms: u64) {
        self.state.lock().unwrap().position_ms = position_ms;
    }

    pub fn fail_on(&self, uri: &str) {
        self.state.lock().unwrap().fail_uris.insert(uri.to_string());
    }

    /// Fire the registered completion callback, as the engine would at end of track
    pub fn complete(&self) {
        let callback = self.state.lock().unwrap().completion.take();
        if let Some(mut callback) = callback {
            callback();
            let mut state = self.state.lock().unwrap();
            if state.completion.is_none() {
                state.completion = Some(callback);
            }
        }
    }
}

impl PlaybackEngine for FakeEngine {
    fn load(&mut self, uri: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.loads.push(uri.to_string());
        if state.fail_uris.contains(uri) {
            state.loaded = None;
            return Err(cadence_core::CadenceError::engine(format!("cannot open {}", uri)));
        }
        state.loaded = Some(uri.to_string());
        state.position_ms = 0;
        Ok(())
    }

    fn start(&mut self) {
        self.state.lock().unwrap().playing = true;
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().playing = false;
    }

    fn seek(&mut self, position_ms: u64) {
        self.state.lock().unwrap().position_ms = position_ms;
    }

    fn release(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.loaded = None;
        state.playing = false;
        state.releases += 1;
        state.completion = None;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().unwrap().position_ms
    }

    fn duration_ms(&self) -> u64 {
        180_000
    }

    fn on_completion(&mut self, callback: Box<dyn FnMut() + Send>) {
        self.state.lock().unwrap().completion = Some(callback);
    }
}

// ===== Store =====

/// Key-value store the test keeps a view into after handing it over
#[derive(Clone, Default)]
pub struct SharedStore(pub Arc<Mutex<MemoryStore>>);

impl SharedStore {
    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.0.lock().unwrap().get(key)
    }
}

impl KeyValueStore for SharedStore {
    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        self.0.lock().unwrap().put(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.0.lock().unwrap().get(key)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.0.lock().unwrap().remove(key)
    }

    fn clear(&mut self) -> Result<()> {
        self.0.lock().unwrap().clear()
    }
}

// ===== History =====

#[derive(Clone)]
pub struct SharedHistory(pub Arc<Mutex<HistoryStore>>);

impl SharedHistory {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().entries().len()
    }
}

impl HistoryLog for SharedHistory {
    fn append(&mut self, track: &Track, at: NaiveDateTime) -> Result<bool> {
        self.0.lock().unwrap().append(track, at)
    }

    fn entries_on(&self, day: NaiveDate) -> Vec<HistoryEntry> {
        self.0.lock().unwrap().entries_on(day)
    }
}

// ===== Sink =====

#[derive(Clone, Default)]
pub struct RecordingSink(pub Arc<Mutex<Vec<(Option<String>, bool)>>>);

impl RecordingSink {
    pub fn last(&self) -> Option<(Option<String>, bool)> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl NowPlayingSink for RecordingSink {
    fn update(&mut self, track: Option<&Track>, is_playing: bool) {
        self.0
            .lock()
            .unwrap()
            .push((track.map(|t| t.title.clone()), is_playing));
    }
}

// ===== Harness =====

pub struct Harness {
    pub controller: PlaybackQueueController,
    pub engine: FakeEngine,
    pub store: SharedStore,
    pub history: SharedHistory,
    pub sink: RecordingSink,
    _dir: TempDir,
}

pub fn harness(tracks: Vec<Track>) -> Harness {
    harness_with(
        FakeCatalog {
            tracks,
            ..FakeCatalog::default()
        },
        SharedStore::default(),
    )
}

pub fn harness_with(catalog: FakeCatalog, store: SharedStore) -> Harness {
    let dir = TempDir::new().unwrap();
    let history = SharedHistory(Arc::new(Mutex::new(
        HistoryStore::open(dir.path().join("song_history.json")).unwrap(),
    )));
    let engine = FakeEngine::default();
    let sink = RecordingSink::default();

    let controller = PlaybackQueueController::new(
        Box::new(catalog),
        Box::new(engine.clone()),
        Box::new(store.clone()),
        Box::new(history.clone()),
        Box::new(sink.clone()),
        ControllerConfig {
            shuffle_seed: Some(42),
        },
    );

    Harness {
        controller,
        engine,
        store,
        history,
        sink,
        _dir: dir,
    }
}
