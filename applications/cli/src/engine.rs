//! Clock-driven playback engine
//!
//! Keeps time for the loaded track without producing audio. Position comes
//! from a monotonic clock; completion fires from a tokio timer once the
//! track's known duration has elapsed.

use cadence_core::{CadenceError, PlaybackEngine, Result, Track};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

type CompletionCallback = Box<dyn FnMut() + Send>;

#[derive(Default)]
struct ClockState {
    uri: Option<String>,
    duration_ms: u64,
    /// Position reached before the current run
    offset: Duration,
    /// Set while running
    started_at: Option<Instant>,
    /// Bumped whenever a pending timer becomes stale
    epoch: u64,
    timer: Option<JoinHandle<()>>,
    callback: Option<CompletionCallback>,
}

impl ClockState {
    fn position(&self) -> Duration {
        let running = self.started_at.map_or(Duration::ZERO, |t| t.elapsed());
        let position = self.offset + running;
        let total = Duration::from_millis(self.duration_ms);
        if self.duration_ms > 0 && position > total {
            total
        } else {
            position
        }
    }

    fn cancel_timer(&mut self) {
        self.epoch += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn lock(state: &Mutex<ClockState>) -> MutexGuard<'_, ClockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`PlaybackEngine`] that only keeps time
///
/// Durations are looked up by content reference; a track with no known
/// duration runs until paused or replaced and never completes.
pub struct ClockEngine {
    state: Arc<Mutex<ClockState>>,
    durations: HashMap<String, u64>,
    runtime: Option<Handle>,
}

impl ClockEngine {
    /// Create an engine with known durations keyed by uri
    ///
    /// Completion timers need a tokio runtime; without one the engine still
    /// keeps time but never reports completion.
    pub fn new(durations: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState::default())),
            durations: durations.into_iter().collect(),
            runtime: Handle::try_current().ok(),
        }
    }

    /// Engine knowing the duration of every track that has one
    pub fn for_tracks(tracks: &[Track]) -> Self {
        Self::new(
            tracks
                .iter()
                .filter_map(|t| t.duration_ms.map(|d| (t.uri.clone(), d))),
        )
    }

    pub fn loaded_uri(&self) -> Option<String> {
        lock(&self.state).uri.clone()
    }

    fn schedule_completion(&self, state: &mut ClockState) {
        let Some(runtime) = &self.runtime else { return };
        if state.duration_ms == 0 {
            return;
        }

        let remaining = Duration::from_millis(state.duration_ms).saturating_sub(state.position());
        let epoch = state.epoch;
        let shared = Arc::clone(&self.state);

        trace!(remaining_ms = remaining.as_millis() as u64, "Completion timer armed");
        state.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(remaining).await;
            fire_completion(&shared, epoch);
        }));
    }
}

fn fire_completion(shared: &Mutex<ClockState>, epoch: u64) {
    let callback = {
        let mut state = lock(shared);
        if state.epoch != epoch {
            return;
        }
        state.offset = state.position();
        state.started_at = None;
        state.timer = None;
        state.callback.take()
    };

    let Some(mut callback) = callback else { return };
    debug!("Track reached its end");
    callback();

    let mut state = lock(shared);
    if state.callback.is_none() {
        state.callback = Some(callback);
    }
}

fn local_path(uri: &str) -> &Path {
    Path::new(uri.strip_prefix("file://").unwrap_or(uri))
}

impl PlaybackEngine for ClockEngine {
    fn load(&mut self, uri: &str) -> Result<()> {
        let mut state = lock(&self.state);
        state.cancel_timer();
        state.uri = None;
        state.offset = Duration::ZERO;
        state.started_at = None;

        if !local_path(uri).is_file() {
            return Err(CadenceError::engine(format!("File not found: {}", uri)));
        }

        state.uri = Some(uri.to_string());
        state.duration_ms = self.durations.get(uri).copied().unwrap_or(0);
        debug!(uri, duration_ms = state.duration_ms, "Loaded");
        Ok(())
    }

    fn start(&mut self) {
        let mut state = lock(&self.state);
        if state.uri.is_none() || state.started_at.is_some() {
            return;
        }
        if state.duration_ms > 0 && state.position() >= Duration::from_millis(state.duration_ms) {
            return;
        }

        state.started_at = Some(Instant::now());
        self.schedule_completion(&mut state);
    }

    fn pause(&mut self) {
        let mut state = lock(&self.state);
        if state.started_at.is_none() {
            return;
        }
        state.offset = state.position();
        state.started_at = None;
        state.cancel_timer();
    }

    fn seek(&mut self, position_ms: u64) {
        let mut state = lock(&self.state);
        if state.uri.is_none() {
            return;
        }

        let target = if state.duration_ms > 0 {
            position_ms.min(state.duration_ms)
        } else {
            position_ms
        };

        state.cancel_timer();
        state.offset = Duration::from_millis(target);
        if state.started_at.is_some() {
            state.started_at = Some(Instant::now());
            self.schedule_completion(&mut state);
        }
    }

    fn release(&mut self) {
        let mut state = lock(&self.state);
        state.cancel_timer();
        state.uri = None;
        state.duration_ms = 0;
        state.offset = Duration::ZERO;
        state.started_at = None;
        state.callback = None;
    }

    fn is_playing(&self) -> bool {
        lock(&self.state).started_at.is_some()
    }

    fn position_ms(&self) -> u64 {
        lock(&self.state).position().as_millis() as u64
    }

    fn duration_ms(&self) -> u64 {
        lock(&self.state).duration_ms
    }

    fn on_completion(&mut self, callback: Box<dyn FnMut() + Send>) {
        lock(&self.state).callback = Some(callback);
    }
}

impl Drop for ClockEngine {
    fn drop(&mut self) {
        lock(&self.state).cancel_timer();
    }
}
