//! Interactive player shell
//!
//! Reads one command per line and drives a [`PlayerHandle`]. Lookups by
//! title, album or artist go through the in-memory [`Library`].

use crate::error::{CliError, Result};
use cadence_core::{PlaybackContext, Track};
use cadence_library::Library;
use cadence_playback::{PlayerHandle, PlayerSnapshot, TransportControls};
use std::fmt::Write as _;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  play <title>              play a track, queueing the whole library
  album <name>              play an album from its first track
  artist <name>             play every track by an artist
  playlist <name> [title]   play a playlist
  random                    play a random track
  toggle                    pause or resume
  next | prev               skip forward or back
  shuffle | repeat          cycle shuffle or repeat mode
  seek <ms>                 jump within the current track
  enqueue <title>           play a track after the current one
  queue | now               show the queue or the current track
  stop                      stop and forget the session
  quit                      leave the shell";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Play(String),
    Album(String),
    Artist(String),
    Playlist { name: String, title: Option<String> },
    Random,
    Toggle,
    Next,
    Prev,
    Shuffle,
    Repeat,
    Seek(u64),
    Enqueue(String),
    Queue,
    Now,
    Stop,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let argument = |what: &str| {
            if rest.is_empty() {
                Err(CliError::InvalidCommand(format!("{} needs {}", word, what)))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match word.to_lowercase().as_str() {
            "play" => Self::Play(argument("a title")?),
            "album" => Self::Album(argument("an album name")?),
            "artist" => Self::Artist(argument("an artist name")?),
            "playlist" => {
                let rest = argument("a playlist name")?;
                match rest.split_once(char::is_whitespace) {
                    Some((name, title)) => Self::Playlist {
                        name: name.to_string(),
                        title: Some(title.trim().to_string()),
                    },
                    None => Self::Playlist {
                        name: rest,
                        title: None,
                    },
                }
            }
            "random" => Self::Random,
            "toggle" | "pause" => Self::Toggle,
            "next" => Self::Next,
            "prev" | "previous" => Self::Prev,
            "shuffle" => Self::Shuffle,
            "repeat" => Self::Repeat,
            "seek" => {
                let ms = argument("a position in milliseconds")?;
                Self::Seek(ms.parse().map_err(|_| {
                    CliError::InvalidCommand(format!("not a position: {}", ms))
                })?)
            }
            "enqueue" => Self::Enqueue(argument("a title")?),
            "queue" => Self::Queue,
            "now" => Self::Now,
            "stop" => Self::Stop,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CliError::InvalidCommand(format!("unknown command: {}", other))),
        };

        Ok(command)
    }
}

/// What the shell prints after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Silent,
    Quit,
}

/// Format milliseconds as `m:ss`
pub fn format_ms(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub struct Shell {
    library: Library,
    player: PlayerHandle,
}

impl Shell {
    pub fn new(library: Library, player: PlayerHandle) -> Self {
        Self { library, player }
    }

    /// Run until `quit` or end of input
    pub async fn run<R>(&self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let reply = match line.parse::<ShellCommand>() {
                Ok(command) => self.execute(command).await,
                Err(e) => Err(e),
            };

            match reply {
                Ok(Reply::Text(text)) => println!("{}", text),
                Ok(Reply::Silent) => {}
                Ok(Reply::Quit) => break,
                Err(e) => println!("error: {}", e),
            }
        }

        Ok(())
    }

    pub async fn execute(&self, command: ShellCommand) -> Result<Reply> {
        debug!(?command, "Shell command");
        let player = &self.player;

        match command {
            ShellCommand::Play(title) => {
                let track = self.find_track(&title)?;
                player.play_from(track, None, PlaybackContext::None)?;
            }
            ShellCommand::Album(name) => self.play_album(&name)?,
            ShellCommand::Artist(name) => self.play_artist(&name)?,
            ShellCommand::Playlist { name, title } => self.play_playlist(&name, title.as_deref())?,
            ShellCommand::Random => player.play_random()?,
            ShellCommand::Toggle => player.play_pause()?,
            ShellCommand::Next => player.next()?,
            ShellCommand::Prev => player.previous()?,
            ShellCommand::Shuffle => {
                player.toggle_shuffle()?;
                let snapshot = player.snapshot().await?;
                let state = if snapshot.shuffle { "on" } else { "off" };
                return Ok(Reply::Text(format!("Shuffle {}", state)));
            }
            ShellCommand::Repeat => {
                player.toggle_repeat()?;
                let snapshot = player.snapshot().await?;
                return Ok(Reply::Text(format!("Repeat {}", snapshot.repeat)));
            }
            ShellCommand::Seek(position_ms) => player.seek(position_ms)?,
            ShellCommand::Enqueue(title) => {
                let track = self.find_track(&title)?;
                let reply = format!("Up next: {} - {}", track.title, track.artist);
                player.enqueue_next(track)?;
                return Ok(Reply::Text(reply));
            }
            ShellCommand::Queue => {
                return Ok(Reply::Text(render_queue(&player.snapshot().await?)));
            }
            ShellCommand::Now => {
                return Ok(Reply::Text(render_now(&player.snapshot().await?)));
            }
            ShellCommand::Stop => player.stop()?,
            ShellCommand::Help => return Ok(Reply::Text(HELP.to_string())),
            ShellCommand::Quit => return Ok(Reply::Quit),
        }

        Ok(Reply::Silent)
    }

    /// Exact title match first, then substring, both case-insensitive
    fn find_track(&self, title: &str) -> Result<Track> {
        let needle = title.trim().to_lowercase();
        let tracks = self.library.songs();

        tracks
            .iter()
            .find(|t| t.title.to_lowercase() == needle)
            .or_else(|| tracks.iter().find(|t| t.title.to_lowercase().contains(&needle)))
            .cloned()
            .ok_or_else(|| CliError::NotFound(format!("no track matching '{}'", title)))
    }

    fn play_album(&self, name: &str) -> Result<()> {
        let needle = name.trim().to_lowercase();
        let album = self
            .library
            .albums()
            .into_iter()
            .find(|a| a.name.to_lowercase() == needle)
            .ok_or_else(|| CliError::NotFound(format!("no album named '{}'", name)))?;

        let tracks = self.library.album_tracks(album.id);
        let first = first_in_order(&tracks)
            .ok_or_else(|| CliError::NotFound(format!("album '{}' has no tracks", album.name)))?;

        self.player.play_from(
            first,
            Some(tracks),
            PlaybackContext::Album { album_id: album.id },
        )?;
        Ok(())
    }

    fn play_artist(&self, name: &str) -> Result<()> {
        let needle = name.trim().to_lowercase();
        let artist = self
            .library
            .artists()
            .into_iter()
            .find(|a| a.name.to_lowercase() == needle)
            .ok_or_else(|| CliError::NotFound(format!("no artist named '{}'", name)))?;

        let tracks = self.library.tracks_for_artist_name(&artist.name);
        let first = first_in_order(&tracks)
            .ok_or_else(|| CliError::NotFound(format!("artist '{}' has no tracks", artist.name)))?;

        self.player.play_from(
            first,
            Some(tracks),
            PlaybackContext::Artist { name: artist.name },
        )?;
        Ok(())
    }

    fn play_playlist(&self, name: &str, title: Option<&str>) -> Result<()> {
        let playlist = self
            .library
            .playlists()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CliError::NotFound(format!("no playlist named '{}'", name)))?;

        let start = match title {
            Some(title) => {
                let needle = title.to_lowercase();
                playlist
                    .tracks
                    .iter()
                    .find(|t| t.title.to_lowercase().contains(&needle))
                    .cloned()
                    .ok_or_else(|| {
                        CliError::NotFound(format!("'{}' is not in {}", title, playlist.name))
                    })?
            }
            None => playlist.tracks.first().cloned().ok_or_else(|| {
                CliError::NotFound(format!("playlist '{}' is empty", playlist.name))
            })?,
        };

        self.player.play_from(
            start,
            Some(playlist.tracks.clone()),
            PlaybackContext::Playlist {
                name: playlist.name.clone(),
            },
        )?;
        Ok(())
    }
}

/// Lowest track number, then title
fn first_in_order(tracks: &[Track]) -> Option<Track> {
    tracks
        .iter()
        .min_by_key(|t| (t.track_number.unwrap_or(u32::MAX), t.title.to_lowercase()))
        .cloned()
}

pub fn render_now(snapshot: &PlayerSnapshot) -> String {
    let Some(track) = &snapshot.current_track else {
        return "Nothing playing".to_string();
    };

    format!(
        "{} {} - {} [{} / {}] shuffle {} repeat {}",
        if snapshot.is_playing { ">" } else { "||" },
        track.title,
        track.artist,
        format_ms(snapshot.position_ms),
        format_ms(snapshot.duration_ms),
        if snapshot.shuffle { "on" } else { "off" },
        snapshot.repeat,
    )
}

pub fn render_queue(snapshot: &PlayerSnapshot) -> String {
    if snapshot.queue.is_empty() {
        return "Queue is empty".to_string();
    }

    let mut out = String::new();
    for (i, track) in snapshot.queue.iter().enumerate() {
        let marker = if snapshot.current_index == Some(i) { ">" } else { " " };
        let _ = writeln!(out, "{} {:>3}. {} - {}", marker, i + 1, track.title, track.artist);
    }
    out.trim_end().to_string()
}
