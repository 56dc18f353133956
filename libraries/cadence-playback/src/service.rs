//! Single-writer player service
//!
//! The controller lives on one tokio task. Everything that wants to change
//! playback, including engine completions and position ticks, goes through
//! the command channel, so no two mutations interleave.

use crate::controller::PlaybackQueueController;
use crate::error::{PlaybackError, Result};
use crate::poller::PositionPoller;
use crate::signals::PlayerSignals;
use crate::types::PlayerSnapshot;
use cadence_core::{PlaybackContext, Track};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Requests handled by the service task
#[derive(Debug)]
pub enum PlayerCommand {
    PlayFrom {
        track: Track,
        context_tracks: Option<Vec<Track>>,
        context: PlaybackContext,
    },
    PlayFromQueue(Track),
    PlayRandom,
    EnqueueNext(Track),
    TogglePlayPause,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    Seek(u64),
    Stop,
    RestoreLastSession,
    /// Engine reached the end of the track loaded under `generation`
    TrackCompleted {
        generation: u64,
    },
    /// Position poll
    Tick,
    Snapshot(oneshot::Sender<PlayerSnapshot>),
    Shutdown,
}

/// Transport actions, for components that should not see the rest of the player
pub trait TransportControls: Send + Sync {
    fn play_pause(&self) -> Result<()>;
    fn next(&self) -> Result<()>;
    fn previous(&self) -> Result<()>;
    fn toggle_shuffle(&self) -> Result<()>;
    fn toggle_repeat(&self) -> Result<()>;
    fn seek(&self, position_ms: u64) -> Result<()>;
    fn stop(&self) -> Result<()>;
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How often the position signal is refreshed while playing
    pub poll_interval: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
        }
    }
}

/// Owns the controller and drains the command channel
pub struct PlayerService {
    controller: PlaybackQueueController,
    commands: mpsc::UnboundedReceiver<PlayerCommand>,
    self_tx: mpsc::WeakUnboundedSender<PlayerCommand>,
    poller: PositionPoller,
    /// Generation the poller was started for
    polled_generation: Option<u64>,
}

impl PlayerService {
    /// Spawn the service onto the current tokio runtime
    pub fn spawn(
        mut controller: PlaybackQueueController,
        config: ServiceConfig,
    ) -> (PlayerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let weak = tx.downgrade();

        let completion_tx = weak.clone();
        controller.set_completion_notifier(Arc::new(move |generation| {
            if let Some(tx) = completion_tx.upgrade() {
                let _ = tx.send(PlayerCommand::TrackCompleted { generation });
            }
        }));

        let handle = PlayerHandle {
            tx,
            signals: controller.signals(),
        };

        let service = Self {
            controller,
            commands: rx,
            self_tx: weak,
            poller: PositionPoller::new(config.poll_interval),
            polled_generation: None,
        };

        let task = tokio::spawn(service.run());
        (handle, task)
    }

    async fn run(mut self) {
        info!("Player service started");

        while let Some(command) = self.commands.recv().await {
            if matches!(command, PlayerCommand::Shutdown) {
                break;
            }
            self.handle(command);
            self.sync_poller();
        }

        self.poller.stop();
        info!("Player service stopped");
    }

    fn handle(&mut self, command: PlayerCommand) {
        let controller = &mut self.controller;
        match command {
            PlayerCommand::PlayFrom {
                track,
                context_tracks,
                context,
            } => controller.play_from(&track, context_tracks, context),
            PlayerCommand::PlayFromQueue(track) => controller.play_from_queue(&track),
            PlayerCommand::PlayRandom => controller.play_random(),
            PlayerCommand::EnqueueNext(track) => controller.enqueue_next(track),
            PlayerCommand::TogglePlayPause => controller.toggle_play_pause(),
            PlayerCommand::Next => controller.next(),
            PlayerCommand::Previous => controller.previous(),
            PlayerCommand::ToggleShuffle => controller.toggle_shuffle(),
            PlayerCommand::ToggleRepeat => controller.toggle_repeat(),
            PlayerCommand::Seek(position_ms) => controller.seek(position_ms),
            PlayerCommand::Stop => controller.stop(),
            PlayerCommand::RestoreLastSession => controller.restore_last_session(),
            PlayerCommand::TrackCompleted { generation } => controller.track_completed(generation),
            PlayerCommand::Tick => controller.refresh_position(),
            PlayerCommand::Snapshot(reply) => {
                let _ = reply.send(controller.snapshot());
            }
            PlayerCommand::Shutdown => {}
        }
    }

    /// Poll only while playing; restart on every track change
    fn sync_poller(&mut self) {
        let generation = self.controller.load_generation();

        if !self.controller.is_playing() {
            if self.polled_generation.take().is_some() {
                debug!("Position polling stopped");
                self.poller.stop();
            }
            return;
        }

        if self.polled_generation == Some(generation) && self.poller.is_running() {
            return;
        }

        let tx = self.self_tx.clone();
        self.poller.start(move || {
            tx.upgrade()
                .is_some_and(|tx| tx.send(PlayerCommand::Tick).is_ok())
        });
        self.polled_generation = Some(generation);
        debug!(generation, "Position polling started");
    }
}

/// Cloneable front end to a running [`PlayerService`]
#[derive(Clone)]
pub struct PlayerHandle {
    tx: mpsc::UnboundedSender<PlayerCommand>,
    signals: Arc<PlayerSignals>,
}

impl PlayerHandle {
    fn send(&self, command: PlayerCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| PlaybackError::ServiceClosed)
    }

    /// Observable state of the player
    pub fn signals(&self) -> &PlayerSignals {
        &self.signals
    }

    pub fn play_from(
        &self,
        track: Track,
        context_tracks: Option<Vec<Track>>,
        context: PlaybackContext,
    ) -> Result<()> {
        self.send(PlayerCommand::PlayFrom {
            track,
            context_tracks,
            context,
        })
    }

    pub fn play_from_queue(&self, track: Track) -> Result<()> {
        self.send(PlayerCommand::PlayFromQueue(track))
    }

    pub fn play_random(&self) -> Result<()> {
        self.send(PlayerCommand::PlayRandom)
    }

    pub fn enqueue_next(&self, track: Track) -> Result<()> {
        self.send(PlayerCommand::EnqueueNext(track))
    }

    pub fn restore_last_session(&self) -> Result<()> {
        self.send(PlayerCommand::RestoreLastSession)
    }

    /// State after every previously sent command has been applied
    pub async fn snapshot(&self) -> Result<PlayerSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(PlayerCommand::Snapshot(reply))?;
        rx.await.map_err(|_| PlaybackError::NoReply)
    }

    /// Stop the service task; the current track is left as is
    pub fn shutdown(&self) -> Result<()> {
        self.send(PlayerCommand::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl TransportControls for PlayerHandle {
    fn play_pause(&self) -> Result<()> {
        self.send(PlayerCommand::TogglePlayPause)
    }

    fn next(&self) -> Result<()> {
        self.send(PlayerCommand::Next)
    }

    fn previous(&self) -> Result<()> {
        self.send(PlayerCommand::Previous)
    }

    fn toggle_shuffle(&self) -> Result<()> {
        self.send(PlayerCommand::ToggleShuffle)
    }

    fn toggle_repeat(&self) -> Result<()> {
        self.send(PlayerCommand::ToggleRepeat)
    }

    fn seek(&self, position_ms: u64) -> Result<()> {
        self.send(PlayerCommand::Seek(position_ms))
    }

    fn stop(&self) -> Result<()> {
        self.send(PlayerCommand::Stop)
    }
}
