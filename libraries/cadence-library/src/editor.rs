/// Tag writing for edited tracks
use crate::error::{LibraryError, Result};
use lofty::{Accessor, ItemKey, Probe, Tag, TagExt, TaggedFileExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fields to overwrite; `None` leaves the existing value alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEdit {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub track_number: Option<u32>,
    pub year: Option<u32>,
}

impl TagEdit {
    /// Whether the edit would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.album_artist.is_none()
            && self.track_number.is_none()
            && self.year.is_none()
    }

    fn write_into(&self, tag: &mut Tag) {
        if let Some(title) = &self.title {
            tag.set_title(title.clone());
        }
        if let Some(artist) = &self.artist {
            tag.set_artist(artist.clone());
        }
        if let Some(album) = &self.album {
            tag.set_album(album.clone());
        }
        if let Some(album_artist) = &self.album_artist {
            tag.insert_text(ItemKey::AlbumArtist, album_artist.clone());
        }
        if let Some(track_number) = self.track_number {
            tag.set_track(track_number);
        }
        if let Some(year) = self.year {
            tag.set_year(year);
        }
    }
}

/// Writes [`TagEdit`]s to audio files
#[derive(Debug, Default)]
pub struct TagEditor;

impl TagEditor {
    pub fn new() -> Self {
        Self
    }

    /// Write `edit` into the file's primary tag, creating the tag if absent
    pub fn apply(&self, path: &Path, edit: &TagEdit) -> Result<()> {
        if !path.exists() {
            return Err(LibraryError::FileNotFound(path.display().to_string()));
        }

        if edit.is_empty() {
            return Ok(());
        }

        let mut tagged_file = Probe::open(path)?.read()?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| LibraryError::TagWrite(format!("no writable tag in {}", path.display())))?;

        edit.write_into(tag);

        tag.save_to_path(path)
            .map_err(|e: lofty::error::LoftyError| LibraryError::TagWrite(e.to_string()))?;

        debug!("Wrote tags to {:?}", path);
        Ok(())
    }

    /// Apply each edit in turn, continuing past failures
    pub fn apply_many(&self, edits: &[(PathBuf, TagEdit)]) -> Vec<(PathBuf, Result<()>)> {
        edits
            .iter()
            .map(|(path, edit)| (path.clone(), self.apply(path, edit)))
            .collect()
    }
}
