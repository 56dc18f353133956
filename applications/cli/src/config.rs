/// CLI configuration
use crate::error::{CliError, Result};
use cadence_library::{ScanConfig, DEFAULT_UNSPLITTABLE_ARTISTS};
use cadence_playback::{ControllerConfig, ServiceConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Environment variable prefix, e.g. `CADENCE_PLAYBACK__POLL_INTERVAL_MS`
pub const ENV_PREFIX: &str = "CADENCE";

/// Keys whose environment values are comma-separated lists
const LIST_KEYS: &[&str] = &[
    "library.music_dirs",
    "library.exclude_patterns",
    "library.unsplittable_artists",
    "library.extensions",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default)]
    pub music_dirs: Vec<PathBuf>,

    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    #[serde(default = "default_unsplittable_artists")]
    pub unsplittable_artists: Vec<String>,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Fixed shuffle seed; entropy when absent
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl StorageSettings {
    /// Preferences and last-session state
    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join("player_prefs.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("song_history.json")
    }

    pub fn playlists_path(&self) -> PathBuf {
        self.data_dir.join("playlists.json")
    }
}

impl CadenceConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `cadence.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Self::environment())
    }

    /// Load with a caller-supplied environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Environment overrides the file
        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Environment source: `CADENCE_` prefix, `__` between nested keys
    pub fn environment() -> config::Environment {
        LIST_KEYS.iter().fold(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .try_parsing(true),
            |env, key| env.with_list_parse_key(key),
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.poll_interval_ms == 0 {
            return Err(CliError::Config(
                "playback.poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.library.extensions.is_empty() {
            return Err(CliError::Config(
                "library.extensions must list at least one extension".to_string(),
            ));
        }

        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            extensions: self
                .library
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: self.library.exclude_patterns.clone(),
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            shuffle_seed: self.playback.shuffle_seed,
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            poll_interval: Duration::from_millis(self.playback.poll_interval_ms),
        }
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        music_dirs: Vec::new(),
        exclude_patterns: default_exclude_patterns(),
        unsplittable_artists: default_unsplittable_artists(),
        extensions: default_extensions(),
    }
}

fn default_exclude_patterns() -> Vec<String> {
    ScanConfig::default().exclude_patterns
}

fn default_unsplittable_artists() -> Vec<String> {
    DEFAULT_UNSPLITTABLE_ARTISTS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_extensions() -> Vec<String> {
    ScanConfig::default().extensions
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        poll_interval_ms: default_poll_interval_ms(),
        shuffle_seed: None,
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            storage: default_storage(),
            playback: default_playback(),
        }
    }
}
