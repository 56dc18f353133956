/// Directory scanning and tag reading
use crate::error::{LibraryError, Result};
use cadence_core::Track;
use chrono::{DateTime, Local, NaiveDateTime};
use lofty::{Accessor, AudioFile, ItemKey, Probe, TaggedFileExt};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Artist recorded for files without an artist tag
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Sibling files picked up as cover art, in order of preference
const COVER_FILE_NAMES: &[&str] = &["cover.jpg", "folder.jpg", "cover.png"];

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Supported audio file extensions, lowercase
    pub extensions: Vec<String>,

    /// Files whose path contains any of these fragments are skipped
    pub exclude_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"]
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            exclude_patterns: vec!["WhatsApp/Media/WhatsApp Audio".to_string()],
        }
    }
}

/// Result of a scan
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Tracks read successfully
    pub tracks: Vec<Track>,

    /// Files that could not be read, with the reason
    pub errors: Vec<(PathBuf, String)>,
}

/// Walks music directories and turns audio files into tracks
pub struct LibraryScanner {
    config: ScanConfig,
}

impl LibraryScanner {
    /// Create a scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan several directories
    ///
    /// A missing directory is reported in `errors` and the rest are still
    /// scanned.
    pub fn scan(&self, dirs: &[PathBuf]) -> ScanReport {
        let mut report = ScanReport::default();

        for dir in dirs {
            match self.scan_dir(dir) {
                Ok(mut partial) => {
                    report.tracks.append(&mut partial.tracks);
                    report.errors.append(&mut partial.errors);
                }
                Err(e) => {
                    warn!("Failed to scan {}: {}", dir.display(), e);
                    report.errors.push((dir.clone(), e.to_string()));
                }
            }
        }

        info!(
            tracks = report.tracks.len(),
            errors = report.errors.len(),
            "Scan finished"
        );
        report
    }

    /// Scan a single directory recursively
    pub fn scan_dir(&self, dir: &Path) -> Result<ScanReport> {
        let files = self.discover_files(dir)?;
        debug!(dir = %dir.display(), files = files.len(), "Discovered audio files");

        let mut report = ScanReport::default();
        for path in files {
            match self.read_track(&path) {
                Ok(track) => report.tracks.push(track),
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", path.display(), e);
                    report.errors.push((path, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Audio files under `dir` that pass the extension and exclude filters
    pub fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Err(LibraryError::FileNotFound(dir.display().to_string()));
        }

        if !dir.is_dir() {
            return Err(LibraryError::InvalidPath(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| self.is_supported_file(p) && !self.is_excluded(p))
            .collect();

        files.sort();
        Ok(files)
    }

    /// Read one file into a track
    pub fn read_track(&self, path: &Path) -> Result<Track> {
        if !path.exists() {
            return Err(LibraryError::FileNotFound(path.display().to_string()));
        }

        let tagged_file = Probe::open(path)?.read()?;
        let duration_ms = tagged_file.properties().duration().as_millis() as u64;
        let tag = tagged_file.primary_tag().or(tagged_file.first_tag());

        let title = tag
            .and_then(|t| t.title().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_default();

        let artist = tag
            .and_then(|t| t.artist().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        let album_name = tag.and_then(|t| t.album().map(|s| s.to_string()));
        let album_artist = tag.and_then(|t| t.get_string(&ItemKey::AlbumArtist).map(|s| s.to_string()));

        let mut track = Track::new(title, artist, path.to_string_lossy())
            .with_added_at(modified_at(path)?);
        track.path = Some(path.to_path_buf());
        track.duration_ms = Some(duration_ms);
        track.track_number = tag.and_then(|t| t.track()).map(normalize_track_number);
        track.year = tag.and_then(|t| t.year());
        track.album_id = album_name
            .as_deref()
            .map(|name| album_id(name, album_artist.as_deref().unwrap_or("")));
        track.album_name = album_name;
        track.album_artist = album_artist;
        track.cover_uri = find_cover(path);

        Ok(track)
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.config.extensions.contains(&e.to_lowercase()))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.config
            .exclude_patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && path.contains(pattern.as_str()))
    }
}

impl Default for LibraryScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Disc-encoded track numbers (`1003` for disc 1, track 3) keep the track part
pub(crate) fn normalize_track_number(raw: u32) -> u32 {
    raw % 1000
}

/// Stable album identifier derived from album name and album artist
pub(crate) fn album_id(name: &str, album_artist: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(album_artist.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn find_cover(path: &Path) -> Option<String> {
    let dir = path.parent()?;
    COVER_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|cover| cover.to_string_lossy().into_owned())
}

fn modified_at(path: &Path) -> Result<NaiveDateTime> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}
