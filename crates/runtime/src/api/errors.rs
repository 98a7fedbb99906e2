//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from command decoding, worker coordination and the settings
//! repository so callers can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("command `{command}` is missing argument `{key}`")]
    MissingArgument { command: String, key: &'static str },

    #[error("command `{command}` has an invalid `{key}` argument")]
    InvalidArgument {
        command: String,
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode command result")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("command worker channel closed")]
    CommandChannelClosed,

    #[error("command worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("command worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
