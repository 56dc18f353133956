//! Typed access to the persisted session

use crate::error::Result;
use crate::types::PersistedPlaybackState;
use cadence_core::{KeyValueStore, RepeatMode};
use serde_json::Value;
use tracing::warn;

pub const LAST_PLAYBACK_KEY: &str = "last_playback";
pub const SHUFFLE_KEY: &str = "shuffle_mode";
pub const REPEAT_KEY: &str = "repeat_mode";

/// Session state kept in a [`KeyValueStore`]
///
/// Malformed values read back as absent.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn last_playback(&self) -> Option<PersistedPlaybackState> {
        let value = self.store.get(LAST_PLAYBACK_KEY)?;
        match serde_json::from_value(value) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", LAST_PLAYBACK_KEY, e);
                None
            }
        }
    }

    pub fn save_last_playback(&mut self, state: &PersistedPlaybackState) -> Result<()> {
        let value = serde_json::to_value(state)?;
        self.store.put(LAST_PLAYBACK_KEY, value)?;
        Ok(())
    }

    pub fn shuffle(&self) -> bool {
        self.store
            .get(SHUFFLE_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn save_shuffle(&mut self, shuffle: bool) -> Result<()> {
        self.store.put(SHUFFLE_KEY, Value::Bool(shuffle))?;
        Ok(())
    }

    pub fn repeat(&self) -> RepeatMode {
        self.store
            .get(REPEAT_KEY)
            .and_then(|v| v.as_str().and_then(RepeatMode::from_str))
            .unwrap_or_default()
    }

    pub fn save_repeat(&mut self, repeat: RepeatMode) -> Result<()> {
        self.store
            .put(REPEAT_KEY, Value::String(repeat.as_str().to_string()))?;
        Ok(())
    }

    /// Remove every value in the underlying store, not only session keys
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()?;
        Ok(())
    }
}
