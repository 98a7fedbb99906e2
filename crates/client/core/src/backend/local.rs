//! Adapter that runs the engine inside this process.
use async_trait::async_trait;
use game_core::{FrontendState, GameSettings, GameVariant, SoundEvent};
use runtime::EngineSession;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::info;

use super::{Backend, BackendKind};
use crate::config::SettingsLocation;
use crate::error::{BackendError, Result};

/// Owns an [`EngineSession`] created on first use.
///
/// Concurrent first calls share one construction. A failed construction is
/// reported as [`BackendError::Initialization`] and retried by the next call.
pub struct LocalBackend {
    settings: SettingsLocation,
    session: OnceCell<Mutex<EngineSession>>,
}

impl LocalBackend {
    pub fn new(settings: SettingsLocation) -> Self {
        Self {
            settings,
            session: OnceCell::new(),
        }
    }

    /// Adapter over an already constructed session.
    pub fn with_session(session: EngineSession) -> Self {
        Self {
            settings: SettingsLocation::Memory,
            session: OnceCell::new_with(Some(Mutex::new(session))),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.session.initialized()
    }

    async fn session(&self) -> Result<MutexGuard<'_, EngineSession>> {
        let session = self
            .session
            .get_or_try_init(|| async move {
                let repository = self
                    .settings
                    .open()
                    .map_err(BackendError::Initialization)?;
                let session =
                    EngineSession::open(repository).map_err(BackendError::Initialization)?;
                info!("Local engine initialized");
                Ok::<_, BackendError>(Mutex::new(session))
            })
            .await?;

        Ok(session.lock().await)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn get_game_state(&self) -> Result<FrontendState> {
        Ok(self.session().await?.get_game_state())
    }

    async fn get_settings(&self) -> Result<GameSettings> {
        Ok(self.session().await?.get_settings())
    }

    async fn update_settings(&self, settings: GameSettings) -> Result<FrontendState> {
        Ok(self.session().await?.update_settings(settings))
    }

    async fn go_to_settings(&self) -> Result<FrontendState> {
        Ok(self.session().await?.go_to_settings())
    }

    async fn start_new_game(&self, variant: GameVariant) -> Result<FrontendState> {
        Ok(self.session().await?.start_new_game(variant.as_ref()))
    }

    async fn submit_answer(&self, answer: &str) -> Result<FrontendState> {
        Ok(self.session().await?.submit_answer(answer))
    }

    async fn move_selection(&self, delta: i32) -> Result<FrontendState> {
        Ok(self.session().await?.move_selection(delta))
    }

    async fn submit_current_selection(&self) -> Result<FrontendState> {
        Ok(self.session().await?.submit_current_selection())
    }

    async fn next_level(&self) -> Result<FrontendState> {
        Ok(self.session().await?.next_level())
    }

    async fn reset_game(&self) -> Result<FrontendState> {
        Ok(self.session().await?.reset_game())
    }

    async fn consume_sound(&self) -> Result<Option<SoundEvent>> {
        Ok(self.session().await?.consume_sound())
    }

    async fn tick(&self, delta_seconds: f64) -> Result<FrontendState> {
        Ok(self.session().await?.tick(delta_seconds))
    }
}
