//! Named playlists
//!
//! Playlists are keyed by name and stored together in one JSON array.

use crate::error::{Result, StorageError};
use crate::json_file;
use cadence_core::{Playlist, Track};
use std::path::{Path, PathBuf};

/// Result of adding a track to a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The exact track was already in the playlist; nothing changed
    AlreadyPresent,
}

/// Playlist collection persisted to a JSON file
#[derive(Debug)]
pub struct PlaylistStore {
    path: PathBuf,
    playlists: Vec<Playlist>,
}

impl PlaylistStore {
    /// Open (or lazily create) the playlist file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let playlists = json_file::read(&path)?.unwrap_or_default();
        Ok(Self { path, playlists })
    }

    /// All playlists in creation order
    pub fn list(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Look up a playlist by name
    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    /// Re-read the file, discarding in-memory state
    pub fn reload(&mut self) -> Result<()> {
        self.playlists = json_file::read(&self.path)?.unwrap_or_default();
        Ok(())
    }

    /// Create an empty playlist
    pub fn create(&mut self, name: &str, image_uri: Option<String>) -> Result<()> {
        if self.get(name).is_some() {
            return Err(StorageError::duplicate("Playlist", name));
        }

        self.playlists.push(Playlist::new(name, image_uri));
        self.save()?;
        tracing::info!(playlist = name, "Created playlist");
        Ok(())
    }

    /// Append a track unless the identical track is already present
    pub fn add_track(&mut self, name: &str, track: Track) -> Result<AddOutcome> {
        let playlist = self.get_mut(name)?;

        if playlist.contains(&track) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        playlist.tracks.push(track);
        self.save()?;
        Ok(AddOutcome::Added)
    }

    /// Rename a playlist and/or change its image
    pub fn edit(&mut self, original: &str, new_name: &str, image_uri: Option<String>) -> Result<()> {
        if original != new_name && self.get(new_name).is_some() {
            return Err(StorageError::duplicate("Playlist", new_name));
        }

        let playlist = self.get_mut(original)?;
        playlist.name = new_name.to_string();
        playlist.image_uri = image_uri;
        self.save()
    }

    /// Remove every copy of `track` from a playlist
    pub fn remove_track(&mut self, name: &str, track: &Track) -> Result<()> {
        let playlist = self.get_mut(name)?;
        playlist.tracks.retain(|t| t != track);
        self.save()
    }

    /// Delete a playlist; deleting an unknown name is a no-op
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let before = self.playlists.len();
        self.playlists.retain(|p| p.name != name);
        if self.playlists.len() != before {
            self.save()?;
        }
        Ok(())
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| StorageError::not_found("Playlist", name))
    }

    fn save(&self) -> Result<()> {
        json_file::write(&self.path, &self.playlists)
    }
}
