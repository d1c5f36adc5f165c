//! High-level session orchestrator.
//!
//! [`Runtime`] owns the session worker and the backend handle, wires up
//! command/event channels, and exposes a builder-based API for starting a
//! session from player secrets.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{GameConfig, Role, SecretMaterial};
use zk::BackendHandle;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::commitment::{assign_roles, initialize};
use crate::events::{Event, EventBus, Topic};
use crate::workers::SessionWorker;

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates one game session.
///
/// The runtime owns the worker; [`RuntimeHandle`] provides a cloneable
/// facade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    session_handle: JoinHandle<()>,
    backend: BackendHandle,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Cloneable handle, shareable across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shuts the session down gracefully: closes the command channel, waits
    /// for the worker to drain, then releases the backend.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.session_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        self.backend.shutdown();
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    secrets: Option<Vec<SecretMaterial>>,
    roles: Option<Vec<Role>>,
    backend: Option<BackendHandle>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            secrets: None,
            roles: None,
            backend: None,
        }
    }

    /// Overrides the runtime configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Per-player secret material, one entry per player. Required.
    pub fn secrets(mut self, secrets: Vec<SecretMaterial>) -> Self {
        self.secrets = Some(secrets);
        self
    }

    /// Explicit role assignment. When absent, roles are drawn from the game
    /// seed with `imposter_count` imposters.
    pub fn roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Reuses an already-initialized backend instead of creating one.
    pub fn backend(mut self, backend: BackendHandle) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validates the setup, runs the commitment phase, and spawns the
    /// session worker. Must be called within a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let game = self.config.game;

        let secrets = self
            .secrets
            .ok_or_else(|| RuntimeError::Setup("player secrets are required".to_string()))?;
        if secrets.is_empty() || secrets.len() > u8::MAX as usize {
            return Err(RuntimeError::Setup(format!(
                "unsupported player count {}",
                secrets.len()
            )));
        }

        let roles = match self.roles {
            Some(roles) => {
                if roles.len() != secrets.len() {
                    return Err(RuntimeError::Setup(format!(
                        "{} roles for {} players",
                        roles.len(),
                        secrets.len()
                    )));
                }
                roles
            }
            None => assign_roles(secrets.len() as u8, game.imposter_count, game.game_seed),
        };
        if !roles.contains(&Role::Crew) {
            return Err(RuntimeError::Setup(
                "a session needs at least one crew member".to_string(),
            ));
        }

        let backend = match self.backend {
            Some(backend) => backend,
            None => BackendHandle::init(game).map_err(RuntimeError::Initialization)?,
        };

        let setup = initialize(&game, &secrets, &roles, &backend)?;

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);

        let worker = SessionWorker::new(
            game,
            backend.clone(),
            setup,
            command_rx,
            event_bus.clone(),
        );
        let session_handle = tokio::spawn(worker.run());
        let handle = RuntimeHandle::new(command_tx, event_bus);

        info!(
            target: "runtime",
            players = secrets.len(),
            rows = game.rows,
            cols = game.cols,
            "session runtime started"
        );

        Ok(Runtime {
            handle,
            session_handle,
            backend,
        })
    }
}
