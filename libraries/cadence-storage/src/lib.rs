//! Cadence Storage
//!
//! Flat JSON persistence for Cadence. There is no database: each concern owns
//! one JSON file that is rewritten synchronously on every mutation, so a crash
//! right after a change still finds it on disk.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each concern owns its file format and logic
//! - `kv` - key-value preferences (`JsonFileStore`, `MemoryStore`)
//! - `history` - "played today" log (`HistoryStore`)
//! - `playlists` - named playlists (`PlaylistStore`)
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::KeyValueStore;
//! use cadence_storage::{HistoryStore, JsonFileStore, PlaylistStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut prefs = JsonFileStore::open("data/player_prefs.json")?;
//! prefs.put("shuffle_mode", serde_json::json!(true))?;
//!
//! let history = HistoryStore::open("data/song_history.json")?;
//! let playlists = PlaylistStore::open("data/playlists.json")?;
//! # Ok(())
//! # }
//! ```

mod error;
mod json_file;

pub mod history;
pub mod kv;
pub mod playlists;

pub use error::{Result, StorageError};
pub use history::HistoryStore;
pub use kv::{JsonFileStore, MemoryStore};
pub use playlists::{AddOutcome, PlaylistStore};
