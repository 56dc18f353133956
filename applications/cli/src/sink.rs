/// Now-playing surface for a terminal session
use cadence_core::{NowPlayingSink, Track};
use tracing::info;

/// Logs now-playing changes, skipping repeats of the same state
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<(Option<String>, bool)>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uri and play state of the last logged update
    pub fn last(&self) -> Option<(Option<&str>, bool)> {
        self.last
            .as_ref()
            .map(|(uri, playing)| (uri.as_deref(), *playing))
    }
}

impl NowPlayingSink for LogSink {
    fn update(&mut self, track: Option<&Track>, is_playing: bool) {
        let state = (track.map(|t| t.uri.clone()), is_playing);
        if self.last.as_ref() == Some(&state) {
            return;
        }

        match track {
            Some(track) if is_playing => {
                info!(title = %track.title, artist = %track.artist, "Now playing");
            }
            Some(track) => info!(title = %track.title, artist = %track.artist, "Paused"),
            None => info!("Playback stopped"),
        }

        self.last = Some(state);
    }
}
