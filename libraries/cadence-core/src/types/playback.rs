/// Playback vocabulary shared between playback and persistence
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,
    /// Wrap to the first track after the last
    All,
    /// Replay the current track
    One,
}

impl RepeatMode {
    /// Next mode in the Off → All → One → Off cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of source a queue was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    None,
    Album,
    Artist,
    Playlist,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
        }
    }
}

/// Source of the current queue, with the key needed to rebuild it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlaybackContext {
    /// Whole library
    #[default]
    None,
    /// One album's tracks
    Album { album_id: u64 },
    /// Tracks whose artist string equals `name`
    Artist { name: String },
    /// A named playlist
    Playlist { name: String },
}

impl PlaybackContext {
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::None => ContextKind::None,
            Self::Album { .. } => ContextKind::Album,
            Self::Artist { .. } => ContextKind::Artist,
            Self::Playlist { .. } => ContextKind::Playlist,
        }
    }

    /// Context key as a string (album id, artist or playlist name)
    pub fn key(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Album { album_id } => Some(album_id.to_string()),
            Self::Artist { name } | Self::Playlist { name } => Some(name.clone()),
        }
    }
}

impl fmt::Display for PlaybackContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "{}:{}", self.kind().as_str(), key),
            None => write!(f, "{}", self.kind().as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cycles_through_all_modes() {
        assert_eq!(RepeatMode::Off.next(), RepeatMode::All);
        assert_eq!(RepeatMode::All.next(), RepeatMode::One);
        assert_eq!(RepeatMode::One.next(), RepeatMode::Off);
    }

    #[test]
    fn repeat_string_roundtrip() {
        for mode in [RepeatMode::Off, RepeatMode::All, RepeatMode::One] {
            assert_eq!(RepeatMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::from_str("sometimes"), None);
    }

    #[test]
    fn context_serializes_with_kind_tag() {
        let ctx = PlaybackContext::Album { album_id: 42 };
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["kind"], "album");
        assert_eq!(json["album_id"], 42);

        let none: PlaybackContext = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(none, PlaybackContext::None);
    }

    #[test]
    fn context_display() {
        let ctx = PlaybackContext::Playlist {
            name: "Gym".to_string(),
        };
        assert_eq!(ctx.to_string(), "playlist:Gym");
        assert_eq!(PlaybackContext::None.to_string(), "none");
    }
}
