/// Interactive shell tests
/// Drives a real player service over the clock engine
use cadence_cli::{ClockEngine, CliError, LogSink, Reply, Shell, ShellCommand};
use cadence_core::{Playlist, RepeatMode, Track};
use cadence_library::Library;
use cadence_playback::{ControllerConfig, PlaybackQueueController, PlayerHandle, PlayerService, ServiceConfig};
use cadence_storage::{HistoryStore, MemoryStore};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, b"fake audio").unwrap();
    path.to_string_lossy().into_owned()
}

/// Album "Night" (Dusk 1, Midnight 2, Dawn 3) plus two loose tracks
fn tracks(dir: &Path) -> Vec<Track> {
    vec![
        Track::new("Midnight", "Nocturne", touch(dir, "midnight.mp3"))
            .with_album(7, "Night")
            .with_track_number(2)
            .with_duration_ms(2_000),
        Track::new("Dawn", "Nocturne", touch(dir, "dawn.mp3"))
            .with_album(7, "Night")
            .with_track_number(3)
            .with_duration_ms(2_000),
        Track::new("Dusk", "Nocturne", touch(dir, "dusk.mp3"))
            .with_album(7, "Night")
            .with_track_number(1)
            .with_duration_ms(2_000),
        Track::new("Alpha", "Solo, Guest", touch(dir, "alpha.mp3")).with_duration_ms(60_000),
        Track::new("Ghost", "Solo", dir.join("ghost.mp3").to_string_lossy().into_owned()),
    ]
}

struct Setup {
    shell: Shell,
    player: PlayerHandle,
    _dir: TempDir,
}

fn setup() -> Setup {
    let dir = TempDir::new().unwrap();
    let tracks = tracks(dir.path());

    let mut mix = Playlist::new("Mix", None);
    mix.tracks = vec![tracks[3].clone(), tracks[0].clone()];
    let library = Library::new(tracks).with_playlists(vec![mix]);

    let controller = PlaybackQueueController::new(
        Box::new(library.clone()),
        Box::new(ClockEngine::for_tracks(library.tracks())),
        Box::new(MemoryStore::new()),
        Box::new(HistoryStore::open(dir.path().join("song_history.json")).unwrap()),
        Box::new(LogSink::new()),
        ControllerConfig {
            shuffle_seed: Some(1),
        },
    );
    let (player, _task) = PlayerService::spawn(controller, ServiceConfig::default());

    Setup {
        shell: Shell::new(library, player.clone()),
        player,
        _dir: dir,
    }
}

fn titles(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.title.clone()).collect()
}

/// Test album playback starts at the first track in album order
#[tokio::test]
async fn test_album_plays_in_track_order() {
    let s = setup();

    s.shell.execute(ShellCommand::Album("night".to_string())).await.unwrap();
    let snap = s.player.snapshot().await.unwrap();

    assert_eq!(titles(&snap.queue), vec!["Dusk", "Midnight", "Dawn"]);
    assert_eq!(snap.current_track.unwrap().title, "Dusk");
    assert!(snap.is_playing);
}

/// Test artist playback uses split artist names
#[tokio::test]
async fn test_artist_includes_shared_credits() {
    let s = setup();

    s.shell.execute(ShellCommand::Artist("Solo".to_string())).await.unwrap();
    let snap = s.player.snapshot().await.unwrap();

    // Artist context orders by title
    assert_eq!(titles(&snap.queue), vec!["Alpha", "Ghost"]);
    assert_eq!(snap.current_index, Some(0));
}

/// Test playlist playback from a named track
#[tokio::test]
async fn test_playlist_from_title() {
    let s = setup();

    s.shell
        .execute("playlist mix midnight".parse().unwrap())
        .await
        .unwrap();
    let snap = s.player.snapshot().await.unwrap();

    assert_eq!(snap.current_track.unwrap().title, "Midnight");
    assert_eq!(snap.queue.len(), 2);
}

/// Test unknown names are reported, not played
#[tokio::test]
async fn test_unknown_title_not_found() {
    let s = setup();

    let result = s.shell.execute(ShellCommand::Play("nothing like it".to_string())).await;
    assert!(matches!(result, Err(CliError::NotFound(_))));

    let result = s.shell.execute(ShellCommand::Album("Day".to_string())).await;
    assert!(matches!(result, Err(CliError::NotFound(_))));

    let snap = s.player.snapshot().await.unwrap();
    assert!(snap.current_track.is_none());
}

/// Test enqueue places the track right after the current one
#[tokio::test]
async fn test_enqueue_after_current() {
    let s = setup();

    s.shell.execute(ShellCommand::Album("Night".to_string())).await.unwrap();
    let reply = s.shell.execute(ShellCommand::Enqueue("alpha".to_string())).await.unwrap();
    assert_eq!(reply, Reply::Text("Up next: Alpha - Solo, Guest".to_string()));

    let snap = s.player.snapshot().await.unwrap();
    assert_eq!(titles(&snap.queue), vec!["Dusk", "Alpha", "Midnight", "Dawn"]);
}

/// Test mode toggles report the new state
#[tokio::test]
async fn test_mode_replies() {
    let s = setup();

    let reply = s.shell.execute(ShellCommand::Shuffle).await.unwrap();
    assert_eq!(reply, Reply::Text("Shuffle on".to_string()));

    let reply = s.shell.execute(ShellCommand::Repeat).await.unwrap();
    assert_eq!(reply, Reply::Text("Repeat all".to_string()));

    let snap = s.player.snapshot().await.unwrap();
    assert_eq!(snap.repeat, RepeatMode::All);
}

/// Test a missing file leaves the track current but not playing
#[tokio::test]
async fn test_missing_file_does_not_play() {
    let s = setup();

    s.shell.execute(ShellCommand::Play("Ghost".to_string())).await.unwrap();
    let snap = s.player.snapshot().await.unwrap();

    assert_eq!(snap.current_track.unwrap().title, "Ghost");
    assert!(!snap.is_playing);

    let reply = s.shell.execute(ShellCommand::Now).await.unwrap();
    assert_eq!(
        reply,
        Reply::Text("|| Ghost - Solo [0:00 / 0:00] shuffle off repeat off".to_string())
    );
}

/// Test the clock engine's completion advances through the service
#[tokio::test(start_paused = true)]
async fn test_track_end_advances() {
    let s = setup();

    s.shell.execute(ShellCommand::Album("Night".to_string())).await.unwrap();
    s.player.snapshot().await.unwrap();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    let snap = s.player.snapshot().await.unwrap();
    assert_eq!(snap.current_track.unwrap().title, "Midnight");

    // Last track ends with repeat off: playback stops entirely
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    let snap = s.player.snapshot().await.unwrap();
    assert!(snap.current_track.is_none());
    assert!(snap.queue.is_empty());
}

/// Test stop clears the session
#[tokio::test]
async fn test_stop_then_now() {
    let s = setup();

    s.shell.execute(ShellCommand::Play("Alpha".to_string())).await.unwrap();
    s.shell.execute(ShellCommand::Stop).await.unwrap();

    let reply = s.shell.execute(ShellCommand::Now).await.unwrap();
    assert_eq!(reply, Reply::Text("Nothing playing".to_string()));
    let reply = s.shell.execute(ShellCommand::Queue).await.unwrap();
    assert_eq!(reply, Reply::Text("Queue is empty".to_string()));
}

/// Test the line loop stops at quit
#[tokio::test]
async fn test_run_until_quit() {
    let s = setup();
    let input: &[u8] = b"album Night\n\nbogus\nnext\nquit\nnext\n";

    s.shell.run(input).await.unwrap();
    let snap = s.player.snapshot().await.unwrap();

    assert_eq!(snap.current_track.unwrap().title, "Midnight");
}
