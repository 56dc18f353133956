/// Cadence - music library browser and player
use anyhow::{bail, Context};
use cadence_cli::{CadenceConfig, ClockEngine, LogSink, Shell};
use cadence_core::{HistoryLog, Track};
use cadence_library::{Library, LibraryScanner, SearchFilter, TagEdit, TagEditor};
use cadence_playback::{PlaybackQueueController, PlayerService};
use cadence_storage::{AddOutcome, HistoryStore, JsonFileStore, PlaylistStore};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence music library browser and player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan music directories and list the tracks found
    Scan {
        /// Directory to scan in addition to the configured ones
        dir: Option<PathBuf>,
    },
    /// List albums
    Albums,
    /// List artists
    Artists,
    /// Search songs, artists and albums
    Search {
        query: String,
        /// songs, artists, albums or all
        #[arg(short, long, default_value = "all")]
        filter: SearchFilter,
    },
    /// Most recently added tracks
    Recent {
        #[arg(short, long, default_value_t = 30)]
        limit: usize,
    },
    /// Additions grouped by month and day
    Calendar,
    /// Tracks played today
    History,
    /// Manage playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistAction,
    },
    /// Rewrite tags of an audio file
    Edit {
        path: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        album_artist: Option<String>,
        #[arg(long = "track")]
        track_number: Option<u32>,
        #[arg(long)]
        year: Option<u32>,
    },
    /// Interactive player; restores the last session paused
    Play {
        /// Directory to scan in addition to the configured ones
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PlaylistAction {
    /// List playlists
    List,
    /// Create an empty playlist
    Create {
        name: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Rename a playlist or change its image
    Rename {
        name: String,
        new_name: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Add a library track by title
    Add { name: String, title: String },
    /// Remove a track by title
    Remove { name: String, title: String },
    /// Delete a playlist
    Delete { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CadenceConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Scan { dir } => scan(&config, dir)?,
        Commands::Albums => list_albums(&config)?,
        Commands::Artists => list_artists(&config)?,
        Commands::Search { query, filter } => search(&config, &query, filter)?,
        Commands::Recent { limit } => recent(&config, limit)?,
        Commands::Calendar => calendar(&config)?,
        Commands::History => history(&config)?,
        Commands::Playlist { action } => playlist(&config, action)?,
        Commands::Edit {
            path,
            title,
            artist,
            album,
            album_artist,
            track_number,
            year,
        } => {
            let edit = TagEdit {
                title,
                artist,
                album,
                album_artist,
                track_number,
                year,
            };
            edit_tags(&path, &edit)?;
        }
        Commands::Play { dir } => play(&config, dir).await?,
    }

    Ok(())
}

fn load_library(config: &CadenceConfig, extra_dir: Option<PathBuf>) -> anyhow::Result<Library> {
    let mut dirs = config.library.music_dirs.clone();
    dirs.extend(extra_dir);
    if dirs.is_empty() {
        tracing::warn!("No music directories configured (library.music_dirs)");
    }

    let report = LibraryScanner::new(config.scan_config()).scan(&dirs);
    for (path, reason) in &report.errors {
        tracing::warn!(path = %path.display(), "Skipped: {}", reason);
    }

    let playlists = PlaylistStore::open(config.storage.playlists_path())?;

    Ok(Library::new(report.tracks)
        .with_unsplittable_artists(config.library.unsplittable_artists.clone())
        .with_playlists(playlists.list().to_vec()))
}

fn print_tracks(tracks: &[Track]) {
    for track in tracks {
        println!("  {} - {}", track.title, track.artist);
    }
}

fn scan(config: &CadenceConfig, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let library = load_library(config, dir)?;
    let songs = library.songs();

    print_tracks(&songs);
    println!(
        "{} tracks, {}",
        songs.len(),
        cadence_cli::shell::format_ms(Library::total_duration_ms(&songs))
    );
    Ok(())
}

fn list_albums(config: &CadenceConfig) -> anyhow::Result<()> {
    let library = load_library(config, None)?;
    for album in library.albums() {
        let tracks = library.album_tracks(album.id);
        println!("  {} - {} ({} tracks)", album.name, album.artist, tracks.len());
    }
    Ok(())
}

fn list_artists(config: &CadenceConfig) -> anyhow::Result<()> {
    let library = load_library(config, None)?;
    for artist in library.artists() {
        let count = library.tracks_for_artist_name(&artist.name).len();
        println!("  {} ({} tracks)", artist.name, count);
    }
    Ok(())
}

fn search(config: &CadenceConfig, query: &str, filter: SearchFilter) -> anyhow::Result<()> {
    let library = load_library(config, None)?;
    let results = library.search(query, filter);

    if results.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }

    if !results.songs.is_empty() {
        println!("Songs:");
        print_tracks(&results.songs);
    }
    if !results.artists.is_empty() {
        println!("Artists:");
        for artist in &results.artists {
            println!("  {}", artist.name);
        }
    }
    if !results.albums.is_empty() {
        println!("Albums:");
        for album in &results.albums {
            println!("  {} - {}", album.name, album.artist);
        }
    }
    Ok(())
}

fn recent(config: &CadenceConfig, limit: usize) -> anyhow::Result<()> {
    let library = load_library(config, None)?;
    for track in library.recently_added(limit) {
        println!(
            "  {}  {} - {}",
            track.added_at.format("%Y-%m-%d"),
            track.title,
            track.artist
        );
    }
    Ok(())
}

fn calendar(config: &CadenceConfig) -> anyhow::Result<()> {
    let library = load_library(config, None)?;
    for month in library.added_by_month() {
        println!("{}-{:02} ({} tracks)", month.year, month.month, month.track_count());
        for day in month.days.iter().filter(|d| !d.tracks.is_empty()) {
            println!("  {:02}: {} added", day.day, day.tracks.len());
        }
    }
    Ok(())
}

fn history(config: &CadenceConfig) -> anyhow::Result<()> {
    let store = HistoryStore::open(config.storage.history_path())?;
    let entries = store.load_today();

    if entries.is_empty() {
        println!("Nothing played today");
    }
    for entry in entries {
        println!(
            "  {}  {} - {}",
            entry.played_at.format("%H:%M"),
            entry.title,
            entry.artist
        );
    }
    Ok(())
}

fn playlist(config: &CadenceConfig, action: PlaylistAction) -> anyhow::Result<()> {
    let mut store = PlaylistStore::open(config.storage.playlists_path())?;

    match action {
        PlaylistAction::List => {
            for playlist in store.list() {
                println!("  {} ({} tracks)", playlist.name, playlist.tracks.len());
            }
        }
        PlaylistAction::Create { name, image } => {
            store.create(&name, image)?;
            println!("Created playlist '{}'", name);
        }
        PlaylistAction::Rename {
            name,
            new_name,
            image,
        } => {
            store.edit(&name, &new_name, image)?;
            println!("Updated playlist '{}'", new_name);
        }
        PlaylistAction::Add { name, title } => {
            let library = load_library(config, None)?;
            let needle = title.to_lowercase();
            let track = library
                .songs()
                .into_iter()
                .find(|t| t.title.to_lowercase() == needle)
                .with_context(|| format!("No track titled '{}'", title))?;

            match store.add_track(&name, track)? {
                AddOutcome::Added => println!("Added '{}' to '{}'", title, name),
                AddOutcome::AlreadyPresent => println!("'{}' is already in '{}'", title, name),
            }
        }
        PlaylistAction::Remove { name, title } => {
            let needle = title.to_lowercase();
            let track = store
                .get(&name)
                .with_context(|| format!("No playlist named '{}'", name))?
                .tracks
                .iter()
                .find(|t| t.title.to_lowercase() == needle)
                .cloned()
                .with_context(|| format!("'{}' is not in '{}'", title, name))?;

            store.remove_track(&name, &track)?;
            println!("Removed '{}' from '{}'", title, name);
        }
        PlaylistAction::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted playlist '{}'", name);
        }
    }
    Ok(())
}

fn edit_tags(path: &Path, edit: &TagEdit) -> anyhow::Result<()> {
    if edit.is_empty() {
        bail!("Nothing to change; pass at least one of --title, --artist, --album, --album-artist, --track, --year");
    }

    TagEditor::new().apply(path, edit)?;
    println!("Updated tags of {}", path.display());
    Ok(())
}

async fn play(config: &CadenceConfig, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let library = load_library(config, dir)?;
    tracing::info!("Library loaded: {} tracks", library.len());

    let prefs = JsonFileStore::open(config.storage.prefs_path())?;
    let history = HistoryStore::open(config.storage.history_path())?;
    let engine = ClockEngine::for_tracks(library.tracks());

    let controller = PlaybackQueueController::new(
        Box::new(library.clone()),
        Box::new(engine),
        Box::new(prefs),
        Box::new(history),
        Box::new(LogSink::new()),
        config.controller_config(),
    );

    let (player, task) = PlayerService::spawn(controller, config.service_config());
    player.restore_last_session()?;

    println!("{}", cadence_cli::shell::HELP);
    let shell = Shell::new(library, player.clone());
    shell
        .run(tokio::io::BufReader::new(tokio::io::stdin()))
        .await?;

    player.shutdown()?;
    task.await?;
    Ok(())
}
