//! Playback queue controller
//!
//! Owns the queue, the pointer into it, the shuffle/repeat modes and the
//! engine. Every mutation publishes to [`PlayerSignals`] and persists through
//! [`SessionStore`] before returning.

use crate::queue::{order_candidates, position_of, shuffled};
use crate::session::SessionStore;
use crate::signals::PlayerSignals;
use crate::types::{ControllerConfig, PersistedPlaybackState, PlayerSnapshot};
use cadence_core::{
    HistoryLog, KeyValueStore, NowPlayingSink, PlaybackContext, PlaybackEngine, RepeatMode, Track,
    TrackCatalog,
};
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives the load generation of a track that played to its end
pub type CompletionNotifier = Arc<dyn Fn(u64) + Send + Sync>;

/// Single owner of queue and transport state
pub struct PlaybackQueueController {
    catalog: Box<dyn TrackCatalog>,
    engine: Box<dyn PlaybackEngine>,
    session: SessionStore,
    history: Box<dyn HistoryLog>,
    sink: Box<dyn NowPlayingSink>,
    signals: Arc<PlayerSignals>,
    rng: StdRng,

    queue: Vec<Track>,
    index: Option<usize>,
    current: Option<Track>,
    context: PlaybackContext,
    /// Candidate set the queue was derived from; `None` means the whole catalog
    context_tracks: Option<Vec<Track>>,

    shuffle: bool,
    repeat: RepeatMode,
    is_playing: bool,
    loaded: bool,

    /// Cleared by `stop()` so stale completions cannot advance
    should_advance: bool,
    /// Bumped on every load and on stop
    generation: u64,
    completion_notifier: Option<CompletionNotifier>,
}

impl PlaybackQueueController {
    /// Create a controller; shuffle and repeat are read back from the store
    pub fn new(
        catalog: Box<dyn TrackCatalog>,
        engine: Box<dyn PlaybackEngine>,
        store: Box<dyn KeyValueStore>,
        history: Box<dyn HistoryLog>,
        sink: Box<dyn NowPlayingSink>,
        config: ControllerConfig,
    ) -> Self {
        let session = SessionStore::new(store);
        let shuffle = session.shuffle();
        let repeat = session.repeat();

        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let signals = Arc::new(PlayerSignals::new());
        signals.set_shuffle(shuffle);
        signals.set_repeat(repeat);

        Self {
            catalog,
            engine,
            session,
            history,
            sink,
            signals,
            rng,
            queue: Vec::new(),
            index: None,
            current: None,
            context: PlaybackContext::None,
            context_tracks: None,
            shuffle,
            repeat,
            is_playing: false,
            loaded: false,
            should_advance: true,
            generation: 0,
            completion_notifier: None,
        }
    }

    /// Forward engine completions to `notifier` instead of requiring callers
    /// to invoke [`track_completed`](Self::track_completed) themselves
    pub fn set_completion_notifier(&mut self, notifier: CompletionNotifier) {
        self.completion_notifier = Some(notifier);
    }

    // ===== Queries =====

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// `None` when nothing is current
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn context(&self) -> &PlaybackContext {
        &self.context
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn load_generation(&self) -> u64 {
        self.generation
    }

    pub fn signals(&self) -> Arc<PlayerSignals> {
        Arc::clone(&self.signals)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current.clone(),
            queue: self.queue.clone(),
            current_index: self.index,
            is_playing: self.is_playing,
            shuffle: self.shuffle,
            repeat: self.repeat,
            context: self.context.clone(),
            position_ms: if self.loaded { self.engine.position_ms() } else { 0 },
            duration_ms: if self.loaded { self.engine.duration_ms() } else { 0 },
        }
    }

    // ===== Queue building =====

    /// Build a queue from `context_tracks` (or the whole catalog) and play `track`
    ///
    /// The queue is positioned at the first entry with the same title and
    /// artist as `track`, or at 0 when there is none. An empty candidate set
    /// leaves everything untouched. The entry at that index is what becomes
    /// current and what is persisted.
    pub fn play_from(
        &mut self,
        track: &Track,
        context_tracks: Option<Vec<Track>>,
        context: PlaybackContext,
    ) {
        let candidates = match &context_tracks {
            Some(tracks) => tracks.clone(),
            None => self.catalog.all_tracks(),
        };

        if candidates.is_empty() {
            debug!(title = %track.title, "play_from with no candidates, ignoring");
            return;
        }

        let queue = order_candidates(&candidates, context.kind(), self.shuffle, &mut self.rng);
        let index = position_of(&queue, track).unwrap_or(0);

        info!(
            title = %track.title,
            artist = %track.artist,
            context = %context,
            queue_len = queue.len(),
            index,
            "Playing from context"
        );

        self.current = Some(queue[index].clone());
        self.queue = queue;
        self.index = Some(index);
        self.context = context;
        self.context_tracks = context_tracks;

        self.publish_queue();
        self.signals.set_context(self.context.clone());
        self.play_current();
    }

    /// Jump to the first queue entry with the same identity as `track`
    pub fn play_from_queue(&mut self, track: &Track) {
        let Some(index) = position_of(&self.queue, track) else {
            debug!(title = %track.title, "Track not in queue");
            return;
        };

        self.index = Some(index);
        self.current = Some(self.queue[index].clone());
        self.signals.set_current_index(self.index);
        self.play_current();
    }

    /// Queue the whole library in random order and play the first track
    pub fn play_random(&mut self) {
        let all = self.catalog.all_tracks();
        if all.is_empty() {
            return;
        }

        self.queue = shuffled(&all, &mut self.rng);
        self.index = Some(0);
        self.current = Some(self.queue[0].clone());
        self.context = PlaybackContext::None;
        self.context_tracks = None;

        self.publish_queue();
        self.signals.set_context(PlaybackContext::None);
        self.play_current();
    }

    /// Insert `track` right after the current position
    ///
    /// Does not move the current index and is not persisted.
    pub fn enqueue_next(&mut self, track: Track) {
        let at = self.index.map_or(0, |i| i + 1).min(self.queue.len());
        debug!(title = %track.title, at, "Enqueue next");
        self.queue.insert(at, track);
        self.signals.set_queue(self.queue.clone());
    }

    // ===== Transport =====

    /// Advance per the repeat mode
    ///
    /// At the last index with repeat off this is a full [`stop`](Self::stop).
    pub fn next(&mut self) {
        if !self.should_advance || self.queue.is_empty() {
            return;
        }

        let last = self.queue.len() - 1;
        let target = match (self.repeat, self.index) {
            (RepeatMode::One, Some(i)) => i,
            (RepeatMode::One, None) => return,
            (RepeatMode::Off, Some(i)) if i >= last => {
                info!("End of queue reached");
                self.stop();
                return;
            }
            (RepeatMode::All, Some(i)) if i >= last => 0,
            (_, Some(i)) => i + 1,
            (_, None) => 0,
        };

        self.index = Some(target);
        self.current = Some(self.queue[target].clone());
        self.signals.set_current_index(self.index);
        self.play_current();
    }

    /// Step back one entry; never wraps
    pub fn previous(&mut self) {
        let Some(i) = self.index else { return };
        if self.queue.is_empty() || i == 0 {
            return;
        }

        self.index = Some(i - 1);
        self.current = Some(self.queue[i - 1].clone());
        self.signals.set_current_index(self.index);
        self.play_current();
    }

    /// Pause a playing track or resume a paused one
    pub fn toggle_play_pause(&mut self) {
        if !self.loaded {
            return;
        }

        if self.engine.is_playing() {
            self.engine.pause();
            self.is_playing = false;
        } else {
            self.engine.start();
            self.is_playing = true;
        }

        self.signals.set_is_playing(self.is_playing);
        self.signals.set_position_ms(self.engine.position_ms());
        self.sink.update(self.current.as_ref(), self.is_playing);
    }

    /// Flip shuffle and rebuild the queue around the current track
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        if let Err(e) = self.session.save_shuffle(self.shuffle) {
            warn!("Failed to persist shuffle mode: {}", e);
        }
        self.signals.set_shuffle(self.shuffle);
        info!(shuffle = self.shuffle, "Shuffle toggled");

        let Some(current) = self.current.clone() else { return };

        let candidates = match &self.context_tracks {
            Some(tracks) => tracks.clone(),
            None => self.catalog.all_tracks(),
        };
        if candidates.is_empty() {
            return;
        }

        self.queue = order_candidates(
            &candidates,
            self.context.kind(),
            self.shuffle,
            &mut self.rng,
        );
        self.index = Some(position_of(&self.queue, &current).unwrap_or(0));
        self.publish_queue();
    }

    /// Cycle Off → All → One → Off
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.next();
        if let Err(e) = self.session.save_repeat(self.repeat) {
            warn!("Failed to persist repeat mode: {}", e);
        }
        self.signals.set_repeat(self.repeat);
        info!(repeat = %self.repeat, "Repeat toggled");
    }

    /// Move within the loaded track and persist the position
    pub fn seek(&mut self, position_ms: u64) {
        if !self.loaded {
            return;
        }

        self.engine.seek(position_ms);
        self.signals.set_position_ms(position_ms);
        self.persist_last_playback(position_ms);
    }

    /// Full reset: release the engine, drop queue and context, clear the store
    pub fn stop(&mut self) {
        self.should_advance = false;
        self.generation += 1;

        if self.loaded {
            self.engine.pause();
            self.engine.release();
        }
        self.loaded = false;
        self.is_playing = false;

        self.current = None;
        self.queue.clear();
        self.index = None;
        self.context = PlaybackContext::None;
        self.context_tracks = None;

        if let Err(e) = self.session.clear() {
            warn!("Failed to clear persisted playback state: {}", e);
        }

        self.publish_queue();
        self.signals.set_current_track(None);
        self.signals.set_is_playing(false);
        self.signals.set_context(PlaybackContext::None);
        self.signals.set_position_ms(0);
        self.signals.set_duration_ms(0);
        self.sink.update(None, false);

        info!("Playback stopped");
    }

    /// Completion entry point; stale generations are dropped
    pub fn track_completed(&mut self, generation: u64) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Dropping stale completion");
            return;
        }
        if !self.should_advance {
            return;
        }

        self.is_playing = false;
        self.signals.set_is_playing(false);
        self.next();
    }

    /// Sample the engine position into the position signal
    pub fn refresh_position(&mut self) {
        if self.loaded {
            self.signals.set_position_ms(self.engine.position_ms());
        }
    }

    // ===== Restore =====

    /// Rebuild the last persisted session and leave it paused
    ///
    /// Missing or malformed state is a no-op. The saved position is not
    /// applied; playback resumes from the start of the track.
    pub fn restore_last_session(&mut self) {
        let Some(state) = self.session.last_playback() else {
            debug!("No session to restore");
            return;
        };

        let (context_tracks, context) = self.rebuild_context(&state);

        let target = context_tracks
            .as_deref()
            .and_then(|tracks| tracks.iter().find(|t| t.title == state.title && t.artist == state.artist))
            .cloned()
            .unwrap_or_else(|| state.to_track());

        info!(title = %state.title, context = %context, "Restoring last session");

        self.play_from(&target, context_tracks, context);
        if self.is_playing {
            self.toggle_play_pause();
        }
    }

    /// Candidate set for a saved context
    ///
    /// The saved track is always part of the result: when the catalog's
    /// filter no longer yields it (an artist queue built from shared credits,
    /// say), the catalog's copy of it is added back.
    fn rebuild_context(&self, state: &PersistedPlaybackState) -> (Option<Vec<Track>>, PlaybackContext) {
        let context = &state.context;
        let tracks = match context {
            PlaybackContext::None => return (None, PlaybackContext::None),
            PlaybackContext::Album { album_id } => Some(self.catalog.tracks_for_album(*album_id)),
            PlaybackContext::Artist { name } => Some(self.catalog.tracks_for_artist(name)),
            PlaybackContext::Playlist { name } => self.catalog.playlist_tracks(name),
        };

        match tracks {
            Some(mut tracks) if !tracks.is_empty() => {
                let saved = state.to_track();
                if position_of(&tracks, &saved).is_none() {
                    if let Some(track) = self
                        .catalog
                        .all_tracks()
                        .into_iter()
                        .find(|t| t.same_identity(&saved))
                    {
                        debug!(title = %track.title, "Saved track re-added to its context");
                        tracks.push(track);
                    }
                }
                (Some(tracks), context.clone())
            }
            _ => {
                warn!(context = %context, "Saved context no longer resolves, using whole library");
                (None, PlaybackContext::None)
            }
        }
    }

    // ===== Internals =====

    fn play_current(&mut self) {
        let Some(track) = self.current.clone() else { return };

        self.generation += 1;
        self.should_advance = true;

        if self.loaded {
            self.engine.release();
        }

        match self.engine.load(&track.uri) {
            Ok(()) => {
                self.loaded = true;
                self.register_completion();
                self.engine.start();
                self.is_playing = true;
                self.record_history(&track);
            }
            Err(e) => {
                warn!(title = %track.title, uri = %track.uri, "Failed to load track: {}", e);
                self.loaded = false;
                self.is_playing = false;
            }
        }

        self.signals.set_current_track(Some(track.clone()));
        self.signals.set_current_index(self.index);
        self.signals.set_is_playing(self.is_playing);
        self.signals.set_position_ms(0);
        self.signals
            .set_duration_ms(if self.loaded { self.engine.duration_ms() } else { 0 });
        self.sink.update(Some(&track), self.is_playing);

        self.persist_last_playback(0);
    }

    fn register_completion(&mut self) {
        let Some(notifier) = self.completion_notifier.clone() else { return };
        let generation = self.generation;
        self.engine
            .on_completion(Box::new(move || notifier(generation)));
    }

    fn record_history(&mut self, track: &Track) {
        match self.history.append(track, Local::now().naive_local()) {
            Ok(true) => debug!(title = %track.title, "Added to today's history"),
            Ok(false) => {}
            Err(e) => warn!("Failed to record history: {}", e),
        }
    }

    /// Saves the resolved current track, which is the queue entry at the
    /// index and not necessarily the track `play_from` was asked for
    fn persist_last_playback(&mut self, position_ms: u64) {
        let Some(track) = &self.current else { return };
        let state = PersistedPlaybackState::capture(track, &self.context, position_ms);
        if let Err(e) = self.session.save_last_playback(&state) {
            warn!("Failed to persist playback state: {}", e);
        }
    }

    fn publish_queue(&self) {
        self.signals.set_queue(self.queue.clone());
        self.signals.set_current_index(self.index);
    }
}

impl Drop for PlaybackQueueController {
    fn drop(&mut self) {
        if self.loaded {
            self.engine.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{HistoryEntry, Result as CoreResult};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::Value;
    use std::collections::HashMap;

    struct Catalog(Vec<Track>);

    impl TrackCatalog for Catalog {
        fn all_tracks(&self) -> Vec<Track> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct Engine {
        playing: bool,
        fail_uri: Option<String>,
    }

    impl PlaybackEngine for Engine {
        fn load(&mut self, uri: &str) -> CoreResult<()> {
            if self.fail_uri.as_deref() == Some(uri) {
                return Err(cadence_core::CadenceError::engine("cannot open"));
            }
            Ok(())
        }
        fn start(&mut self) {
            self.playing = true;
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn seek(&mut self, _position_ms: u64) {}
        fn release(&mut self) {
            self.playing = false;
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn position_ms(&self) -> u64 {
            0
        }
        fn duration_ms(&self) -> u64 {
            180_000
        }
        fn on_completion(&mut self, _callback: Box<dyn FnMut() + Send>) {}
    }

    #[derive(Default)]
    struct Store(HashMap<String, Value>);

    impl KeyValueStore for Store {
        fn put(&mut self, key: &str, value: Value) -> CoreResult<()> {
            self.0.insert(key.to_string(), value);
            Ok(())
        }
        fn get(&self, key: &str) -> Option<Value> {
            self.0.get(key).cloned()
        }
        fn remove(&mut self, key: &str) -> CoreResult<()> {
            self.0.remove(key);
            Ok(())
        }
        fn clear(&mut self) -> CoreResult<()> {
            self.0.clear();
            Ok(())
        }
    }

    struct NoHistory;

    impl HistoryLog for NoHistory {
        fn append(&mut self, _track: &Track, _at: NaiveDateTime) -> CoreResult<bool> {
            Ok(true)
        }
        fn entries_on(&self, _day: NaiveDate) -> Vec<HistoryEntry> {
            Vec::new()
        }
    }

    struct NullSink;

    impl NowPlayingSink for NullSink {
        fn update(&mut self, _track: Option<&Track>, _is_playing: bool) {}
    }

    fn album() -> Vec<Track> {
        vec![
            Track::new("C", "Band", "c").with_track_number(3),
            Track::new("A", "Band", "a").with_track_number(1),
            Track::new("B", "Band", "b").with_track_number(2),
        ]
    }

    fn controller_with(engine: Engine) -> PlaybackQueueController {
        PlaybackQueueController::new(
            Box::new(Catalog(album())),
            Box::new(engine),
            Box::new(Store::default()),
            Box::new(NoHistory),
            Box::new(NullSink),
            ControllerConfig {
                shuffle_seed: Some(1),
            },
        )
    }

    #[test]
    fn new_controller_is_idle() {
        let controller = controller_with(Engine::default());
        assert!(controller.queue().is_empty());
        assert_eq!(controller.current_index(), None);
        assert!(controller.current_track().is_none());
        assert!(!controller.is_playing());
    }

    #[test]
    fn load_failure_keeps_track_but_not_playing() {
        let mut controller = controller_with(Engine {
            fail_uri: Some("b".to_string()),
            ..Engine::default()
        });

        controller.play_from(&album()[2], Some(album()), PlaybackContext::Album { album_id: 1 });

        assert_eq!(controller.current_track().map(|t| t.title.as_str()), Some("B"));
        assert!(!controller.is_playing());
        // Nothing loaded, so toggling does not start anything
        controller.toggle_play_pause();
        assert!(!controller.is_playing());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut controller = controller_with(Engine::default());
        controller.play_from(&album()[1], Some(album()), PlaybackContext::Album { album_id: 1 });
        let stale = controller.load_generation();

        controller.next();
        assert_eq!(controller.current_index(), Some(1));

        controller.track_completed(stale);
        assert_eq!(controller.current_index(), Some(1));

        controller.track_completed(controller.load_generation());
        assert_eq!(controller.current_index(), Some(2));
    }

    #[test]
    fn enqueue_with_nothing_current_inserts_at_front() {
        let mut controller = controller_with(Engine::default());
        controller.enqueue_next(Track::new("Solo", "X", "s"));
        assert_eq!(controller.queue().len(), 1);
        assert_eq!(controller.current_index(), None);
    }
}
