//! Cloneable façade for invoking host commands.
//!
//! [`RuntimeHandle`] hides channel plumbing: a command name plus a JSON
//! argument object goes in, a JSON result comes back.
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::workers::Command;

/// Client-facing handle to the command worker.
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Invoke a named command with an argument object.
    ///
    /// Commands without arguments accept `Value::Null` or an empty object.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::commands;
    /// use serde_json::json;
    ///
    /// let state = handle
    ///     .invoke(commands::START_NEW_GAME, json!({ "variantStr": "Letters" }))
    ///     .await?;
    /// ```
    pub async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command {
                name: command.to_string(),
                args,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Returns true once the command worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }
}
