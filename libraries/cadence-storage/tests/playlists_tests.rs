use cadence_core::Track;
use cadence_storage::{AddOutcome, PlaylistStore, StorageError};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

fn open(dir: &TempDir) -> PlaylistStore {
    PlaylistStore::open(dir.path().join("playlists.json")).unwrap()
}

fn added() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

/// Tracks compare by every field, so the timestamp is pinned
fn track(title: &str) -> Track {
    Track::new(title, "Artist", format!("file:///{}.mp3", title)).with_added_at(added())
}

#[test]
fn test_create_and_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.create("Gym", Some("file:///gym.png".to_string())).unwrap();
        store.add_track("Gym", track("One")).unwrap();
    }

    let store = open(&dir);
    let gym = store.get("Gym").unwrap();
    assert_eq!(gym.tracks.len(), 1);
    assert_eq!(gym.image_uri.as_deref(), Some("file:///gym.png"));
}

#[test]
fn test_duplicate_name_rejected() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.create("Gym", None).unwrap();

    let err = store.create("Gym", None).unwrap_err();
    assert!(matches!(err, StorageError::Duplicate { .. }));
}

#[test]
fn test_add_same_track_twice() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.create("Chill", None).unwrap();

    let song = track("Song");
    assert_eq!(store.add_track("Chill", song.clone()).unwrap(), AddOutcome::Added);
    assert_eq!(
        store.add_track("Chill", song).unwrap(),
        AddOutcome::AlreadyPresent
    );
    assert_eq!(store.get("Chill").unwrap().tracks.len(), 1);
}

#[test]
fn test_add_to_unknown_playlist() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);

    let err = store.add_track("Nope", track("Song")).unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[test]
fn test_edit_rename_and_remove() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.create("Old", None).unwrap();
    store.add_track("Old", track("A")).unwrap();
    store.add_track("Old", track("B")).unwrap();

    store.edit("Old", "New", Some("img".to_string())).unwrap();
    assert!(store.get("Old").is_none());

    store.remove_track("New", &track("A")).unwrap();
    let new = store.get("New").unwrap();
    assert_eq!(new.tracks.len(), 1);
    assert_eq!(new.tracks[0].title, "B");
    assert_eq!(new.image_uri.as_deref(), Some("img"));
}

#[test]
fn test_delete() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.create("A", None).unwrap();
    store.create("B", None).unwrap();

    store.delete("A").unwrap();
    store.delete("missing").unwrap();

    let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["B"]);
}
