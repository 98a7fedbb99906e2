//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up the command channel, and
//! exposes a builder-based API for shells that host the engine. A shell that
//! wants clients to reach the engine by message passing installs the handle
//! with [`install_host`]; clients discover it through [`installed_host`].

use std::sync::{Arc, OnceLock};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::repository::{InMemorySettingsRepository, SettingsRepository};
use crate::session::EngineSession;
use crate::workers::{Command, SessionWorker};

static INSTALLED_HOST: OnceLock<RuntimeHandle> = OnceLock::new();

/// Publishes `handle` as the process-wide engine host.
///
/// The first install wins. Returns `false` if a host was already installed.
pub fn install_host(handle: RuntimeHandle) -> bool {
    let installed = INSTALLED_HOST.set(handle).is_ok();
    if installed {
        info!("Engine host installed");
    } else {
        debug!("Engine host already installed, keeping the first one");
    }
    installed
}

/// The engine host installed for this process, if any.
pub fn installed_host() -> Option<RuntimeHandle> {
    INSTALLED_HOST.get().cloned()
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
        }
    }
}

/// Hosts one engine session behind a command channel.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients. Dropping the
/// runtime stops the worker.
pub struct Runtime {
    handle: RuntimeHandle,
    shutdown_tx: oneshot::Sender<()>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stops the worker after the command it is currently serving.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; joining below reports the outcome.
        let _ = self.shutdown_tx.send(());
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        info!("Engine host stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn SettingsRepository>>,
    session: Option<EngineSession>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            session: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings storage. Defaults to memory only.
    pub fn repository(mut self, repository: Arc<dyn SettingsRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Serve a prepared session instead of opening one from the repository.
    pub fn session(mut self, session: EngineSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Opens the session and spawns the worker. Must run inside a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let session = match self.session {
            Some(session) => session,
            None => {
                let repository = self
                    .repository
                    .unwrap_or_else(|| Arc::new(InMemorySettingsRepository::new()));
                EngineSession::open(repository)?
            }
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = SessionWorker::new(session, command_rx, shutdown_rx);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        info!(
            "Engine host started (command buffer: {})",
            self.config.command_buffer_size
        );

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx),
            shutdown_tx,
            worker_handle,
        })
    }
}
