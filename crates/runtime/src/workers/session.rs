//! Session worker that owns the authoritative [`EngineSession`].
//!
//! Receives named commands from [`crate::RuntimeHandle`], decodes their JSON
//! arguments, runs them against the session and replies with the JSON result.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use game_core::GameSettings;

use crate::api::commands;
use crate::api::{Result, RuntimeError};
use crate::session::EngineSession;

/// A single command invocation sent to the session worker.
pub struct Command {
    pub name: String,
    pub args: Value,
    pub reply: oneshot::Sender<Result<Value>>,
}

/// Background task that serves commands against one engine session.
pub struct SessionWorker {
    session: EngineSession,
    command_rx: mpsc::Receiver<Command>,
    shutdown_rx: oneshot::Receiver<()>,
}

impl SessionWorker {
    pub fn new(
        session: EngineSession,
        command_rx: mpsc::Receiver<Command>,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            session,
            command_rx,
            shutdown_rx,
        }
    }

    /// Main worker loop. Ends on shutdown, when the owning runtime is dropped,
    /// or once every handle is gone.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = &mut self.shutdown_rx => {
                    debug!("SessionWorker received shutdown signal");
                    break;
                }
            }
        }
        debug!("SessionWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        let Command { name, args, reply } = cmd;

        let result = self.dispatch(&name, &args);
        if let Err(err) = &result {
            warn!("Command `{}` failed: {}", name, err);
        }

        if reply.send(result).is_err() {
            debug!("`{}` reply channel closed (caller dropped)", name);
        }
    }

    fn dispatch(&mut self, name: &str, args: &Value) -> Result<Value> {
        let session = &mut self.session;

        match name {
            commands::GET_GAME_STATE => encode(&session.get_game_state()),
            commands::GET_SETTINGS => encode(&session.get_settings()),
            commands::UPDATE_SETTINGS => {
                let settings: GameSettings = arg(name, args, commands::ARG_SETTINGS)?;
                encode(&session.update_settings(settings))
            }
            commands::GO_TO_SETTINGS => encode(&session.go_to_settings()),
            commands::START_NEW_GAME => {
                let variant: String = arg(name, args, commands::ARG_VARIANT)?;
                encode(&session.start_new_game(&variant))
            }
            commands::SUBMIT_ANSWER => {
                let answer: String = arg(name, args, commands::ARG_ANSWER)?;
                encode(&session.submit_answer(&answer))
            }
            commands::MOVE_SELECTION => {
                let delta: i32 = arg(name, args, commands::ARG_DELTA)?;
                encode(&session.move_selection(delta))
            }
            commands::SUBMIT_CURRENT_SELECTION => encode(&session.submit_current_selection()),
            commands::NEXT_LEVEL => encode(&session.next_level()),
            commands::RESET_GAME => encode(&session.reset_game()),
            commands::CONSUME_SOUND => encode(&session.consume_sound()),
            commands::TICK => {
                let dt: f64 = arg(name, args, commands::ARG_DT_SECONDS)?;
                encode(&session.tick(dt))
            }
            unknown => Err(RuntimeError::UnknownCommand(unknown.to_string())),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(RuntimeError::Encode)
}

fn arg<T: DeserializeOwned>(command: &str, args: &Value, key: &'static str) -> Result<T> {
    let value = args
        .get(key)
        .ok_or_else(|| RuntimeError::MissingArgument {
            command: command.to_string(),
            key,
        })?;

    T::deserialize(value).map_err(|source| RuntimeError::InvalidArgument {
        command: command.to_string(),
        key,
        source,
    })
}
