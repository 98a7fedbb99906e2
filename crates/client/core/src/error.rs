//! Failures raised by transport adapters.
//!
//! Two families matter to callers: transport failures (the call did not
//! produce a usable snapshot) and initialization failures (the in-process
//! engine could not be created). Neither ever changes previously observed
//! state.
use runtime::{RepositoryError, RuntimeError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("host rejected `{command}`")]
    Transport {
        command: &'static str,
        #[source]
        source: RuntimeError,
    },

    #[error("engine host is not running")]
    HostClosed,

    #[error("engine host dropped the reply to `{0}`")]
    ReplyDropped(&'static str),

    #[error("failed to decode the reply to `{command}`")]
    Decode {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialize the local engine")]
    Initialization(#[source] RepositoryError),
}

impl BackendError {
    /// Maps a host invocation failure for `command` into the adapter taxonomy.
    pub fn from_runtime(command: &'static str, err: RuntimeError) -> Self {
        match err {
            RuntimeError::CommandChannelClosed => Self::HostClosed,
            RuntimeError::ReplyChannelClosed(_) => Self::ReplyDropped(command),
            source => Self::Transport { command, source },
        }
    }

    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization(_))
    }

    pub fn is_transport(&self) -> bool {
        !self.is_initialization()
    }
}
