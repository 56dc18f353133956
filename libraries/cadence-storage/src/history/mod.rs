//! Daily listening history
//!
//! Keeps one entry per `(title, artist)` per calendar day. Only the current
//! day survives a restart: opening the store prunes older entries and
//! rewrites the file.

use crate::error::Result;
use crate::json_file;
use cadence_core::{HistoryEntry, HistoryLog, Track};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// `HistoryLog` persisted as a JSON array
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the log, keeping only today's entries
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_on(path, Local::now().date_naive())
    }

    /// Open the log, keeping only entries from `today`
    pub fn open_on(path: impl AsRef<Path>, today: NaiveDate) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let loaded: Vec<HistoryEntry> = json_file::read(&path)?.unwrap_or_default();
        let total = loaded.len();

        let entries: Vec<HistoryEntry> = loaded.into_iter().filter(|e| e.day() == today).collect();

        if entries.len() != total {
            tracing::debug!(
                dropped = total - entries.len(),
                kept = entries.len(),
                "Pruned history entries from previous days"
            );
            json_file::write(&path, &entries)?;
        }

        Ok(Self { path, entries })
    }

    /// All retained entries in insertion order
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Record a play, unless `(title, artist)` was already played that day
    pub fn record(&mut self, track: &Track, at: NaiveDateTime) -> Result<bool> {
        let day = at.date();
        if self.entries.iter().any(|e| e.is_duplicate_of(track, day)) {
            return Ok(false);
        }

        self.entries.push(HistoryEntry::from_track(track, at));
        json_file::write(&self.path, &self.entries)?;
        Ok(true)
    }
}

impl HistoryLog for HistoryStore {
    fn append(&mut self, track: &Track, at: NaiveDateTime) -> cadence_core::Result<bool> {
        Ok(self.record(track, at)?)
    }

    fn entries_on(&self, day: NaiveDate) -> Vec<HistoryEntry> {
        let mut day_entries: Vec<HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.day() == day)
            .cloned()
            .collect();
        day_entries.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        day_entries
    }
}
