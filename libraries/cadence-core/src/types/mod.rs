mod history;
mod library;
mod playback;
mod track;

pub use history::HistoryEntry;
pub use library::{Album, Artist, Playlist};
pub use playback::{ContextKind, PlaybackContext, RepeatMode};
pub use track::{Track, TrackKey};
