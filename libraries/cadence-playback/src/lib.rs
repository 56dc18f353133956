//! Cadence - Playback Queue
//!
//! The playback state machine of Cadence.
//!
//! This crate provides:
//! - Queue derivation from an album, artist, playlist or the whole library
//! - Shuffle (rebuilds the queue around the current track)
//! - Repeat modes (Off, All, One) and end-of-queue handling
//! - Session persistence and paused restore at startup
//! - Observable state through `tokio::sync::watch` channels
//! - A single-writer service task with a cloneable handle
//!
//! # Architecture
//!
//! `cadence-playback` knows nothing about audio output or file formats.
//! The catalog, engine, key-value store, history log and now-playing surface
//! are collaborator traits from `cadence-core`, injected at construction.
//!
//! # Example: Direct Control
//!
//! ```rust,no_run
//! # use cadence_core::*;
//! # fn collaborators() -> (Box<dyn TrackCatalog>, Box<dyn PlaybackEngine>, Box<dyn KeyValueStore>, Box<dyn HistoryLog>, Box<dyn NowPlayingSink>) { unimplemented!() }
//! use cadence_playback::{ControllerConfig, PlaybackQueueController};
//!
//! let (catalog, engine, store, history, sink) = collaborators();
//! let mut controller = PlaybackQueueController::new(
//!     catalog, engine, store, history, sink, ControllerConfig::default(),
//! );
//!
//! controller.restore_last_session();
//! controller.toggle_shuffle();
//! controller.next();
//! ```
//!
//! # Example: Service
//!
//! ```rust,no_run
//! # use cadence_playback::*;
//! # async fn example(controller: PlaybackQueueController) -> Result<()> {
//! let (player, _task) = PlayerService::spawn(controller, ServiceConfig::default());
//!
//! player.restore_last_session()?;
//! player.play_pause()?;
//!
//! let mut position = player.signals().subscribe_position_ms();
//! position.changed().await.ok();
//! println!("at {} ms", *position.borrow());
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod poller;
pub mod queue;
pub mod session;
mod service;
mod signals;
pub mod types;

// Public exports
pub use controller::{CompletionNotifier, PlaybackQueueController};
pub use error::{PlaybackError, Result};
pub use poller::PositionPoller;
pub use service::{PlayerCommand, PlayerHandle, PlayerService, ServiceConfig, TransportControls};
pub use session::SessionStore;
pub use signals::PlayerSignals;
pub use types::{ControllerConfig, PersistedPlaybackState, PlayerSnapshot};
