//! Observable player state
//!
//! Each field is a `watch` channel: readers always see the latest value,
//! writers replace it whole.

use cadence_core::{PlaybackContext, RepeatMode, Track};
use tokio::sync::watch;

use crate::types::PlayerSnapshot;

pub struct PlayerSignals {
    current_track: watch::Sender<Option<Track>>,
    queue: watch::Sender<Vec<Track>>,
    current_index: watch::Sender<Option<usize>>,
    is_playing: watch::Sender<bool>,
    shuffle: watch::Sender<bool>,
    repeat: watch::Sender<RepeatMode>,
    context: watch::Sender<PlaybackContext>,
    position_ms: watch::Sender<u64>,
    duration_ms: watch::Sender<u64>,
}

impl PlayerSignals {
    pub fn new() -> Self {
        Self {
            current_track: watch::channel(None).0,
            queue: watch::channel(Vec::new()).0,
            current_index: watch::channel(None).0,
            is_playing: watch::channel(false).0,
            shuffle: watch::channel(false).0,
            repeat: watch::channel(RepeatMode::Off).0,
            context: watch::channel(PlaybackContext::None).0,
            position_ms: watch::channel(0).0,
            duration_ms: watch::channel(0).0,
        }
    }

    pub fn subscribe_current_track(&self) -> watch::Receiver<Option<Track>> {
        self.current_track.subscribe()
    }

    pub fn subscribe_queue(&self) -> watch::Receiver<Vec<Track>> {
        self.queue.subscribe()
    }

    pub fn subscribe_current_index(&self) -> watch::Receiver<Option<usize>> {
        self.current_index.subscribe()
    }

    pub fn subscribe_is_playing(&self) -> watch::Receiver<bool> {
        self.is_playing.subscribe()
    }

    pub fn subscribe_shuffle(&self) -> watch::Receiver<bool> {
        self.shuffle.subscribe()
    }

    pub fn subscribe_repeat(&self) -> watch::Receiver<RepeatMode> {
        self.repeat.subscribe()
    }

    pub fn subscribe_context(&self) -> watch::Receiver<PlaybackContext> {
        self.context.subscribe()
    }

    pub fn subscribe_position_ms(&self) -> watch::Receiver<u64> {
        self.position_ms.subscribe()
    }

    pub fn subscribe_duration_ms(&self) -> watch::Receiver<u64> {
        self.duration_ms.subscribe()
    }

    /// Latest value of every signal
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current_track.borrow().clone(),
            queue: self.queue.borrow().clone(),
            current_index: *self.current_index.borrow(),
            is_playing: *self.is_playing.borrow(),
            shuffle: *self.shuffle.borrow(),
            repeat: *self.repeat.borrow(),
            context: self.context.borrow().clone(),
            position_ms: *self.position_ms.borrow(),
            duration_ms: *self.duration_ms.borrow(),
        }
    }

    // Publishing works with or without subscribers.

    pub(crate) fn set_current_track(&self, track: Option<Track>) {
        self.current_track.send_replace(track);
    }

    pub(crate) fn set_queue(&self, queue: Vec<Track>) {
        self.queue.send_replace(queue);
    }

    pub(crate) fn set_current_index(&self, index: Option<usize>) {
        self.current_index.send_replace(index);
    }

    pub(crate) fn set_is_playing(&self, is_playing: bool) {
        self.is_playing.send_if_modified(|current| {
            let changed = *current != is_playing;
            *current = is_playing;
            changed
        });
    }

    pub(crate) fn set_shuffle(&self, shuffle: bool) {
        self.shuffle.send_replace(shuffle);
    }

    pub(crate) fn set_repeat(&self, repeat: RepeatMode) {
        self.repeat.send_replace(repeat);
    }

    pub(crate) fn set_context(&self, context: PlaybackContext) {
        self.context.send_replace(context);
    }

    pub(crate) fn set_position_ms(&self, position_ms: u64) {
        self.position_ms.send_if_modified(|current| {
            let changed = *current != position_ms;
            *current = position_ms;
            changed
        });
    }

    pub(crate) fn set_duration_ms(&self, duration_ms: u64) {
        self.duration_ms.send_replace(duration_ms);
    }
}

impl Default for PlayerSignals {
    fn default() -> Self {
        Self::new()
    }
}
