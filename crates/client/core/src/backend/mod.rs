//! Transport abstraction over the engine.
//!
//! Two adapters implement [`Backend`] with identical meaning:
//! [`IpcBackend`] sends each call to an engine host by message passing,
//! [`LocalBackend`] runs an engine inside this process. Callers only ever see
//! `Arc<dyn Backend>`, chosen once by [`backend`].
mod factory;
mod ipc;
mod local;
pub mod mock;

pub use factory::{Environment, backend, create_backend, detect_environment};
pub use ipc::IpcBackend;
pub use local::LocalBackend;

use async_trait::async_trait;
use game_core::{FrontendState, GameSettings, GameVariant, SoundEvent};
use strum::Display;

use crate::error::Result;

/// Which transport an adapter uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum BackendKind {
    Ipc,
    Local,
}

/// Uniform command surface of the engine.
///
/// Every call returns the engine's snapshot after the operation, except
/// [`Backend::get_settings`] and [`Backend::consume_sound`].
#[async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn get_game_state(&self) -> Result<FrontendState>;

    async fn get_settings(&self) -> Result<GameSettings>;

    /// Replaces the settings. The engine returns to the menu.
    async fn update_settings(&self, settings: GameSettings) -> Result<FrontendState>;

    async fn go_to_settings(&self) -> Result<FrontendState>;

    async fn start_new_game(&self, variant: GameVariant) -> Result<FrontendState>;

    /// Only the first character of `answer` is significant. An empty answer
    /// leaves the engine unchanged.
    async fn submit_answer(&self, answer: &str) -> Result<FrontendState>;

    /// Moves the option cursor by `delta`, wrapping around the options.
    async fn move_selection(&self, delta: i32) -> Result<FrontendState>;

    /// Answers with the option under the cursor.
    async fn submit_current_selection(&self) -> Result<FrontendState>;

    async fn next_level(&self) -> Result<FrontendState>;

    async fn reset_game(&self) -> Result<FrontendState>;

    /// Takes the pending sound, if any. A second call without an intervening
    /// transition returns `None`.
    async fn consume_sound(&self) -> Result<Option<SoundEvent>>;

    async fn tick(&self, delta_seconds: f64) -> Result<FrontendState>;
}
