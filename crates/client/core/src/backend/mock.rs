//! Mock backend for testing without a host.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use game_core::{FrontendState, GameEngine, GameSettings, GameVariant, SoundEvent};
use runtime::{EngineSession, InMemorySettingsRepository};

use super::{Backend, BackendKind, LocalBackend};
use crate::error::{BackendError, Result};

/// In-process engine with a reproducible question sequence that records
/// every call and can be switched into a failing transport.
pub struct MockBackend {
    inner: LocalBackend,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: AtomicBool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_settings(GameSettings::default(), 7)
    }

    pub fn with_settings(settings: GameSettings, seed: u64) -> Self {
        let repository = Arc::new(InMemorySettingsRepository::with_settings(settings.clone()));
        let session = EngineSession::with_engine(GameEngine::with_seed(settings, seed), repository);

        Self {
            inner: LocalBackend::with_session(session),
            calls: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Number of calls made to `command`.
    pub fn calls(&self, command: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(command)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    /// While set, every call is counted and then fails as if the host were gone.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, command: &'static str) -> Result<()> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(command)
            .or_default() += 1;

        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::HostClosed);
        }
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn get_game_state(&self) -> Result<FrontendState> {
        self.record("get_game_state")?;
        self.inner.get_game_state().await
    }

    async fn get_settings(&self) -> Result<GameSettings> {
        self.record("get_settings")?;
        self.inner.get_settings().await
    }

    async fn update_settings(&self, settings: GameSettings) -> Result<FrontendState> {
        self.record("update_settings")?;
        self.inner.update_settings(settings).await
    }

    async fn go_to_settings(&self) -> Result<FrontendState> {
        self.record("go_to_settings")?;
        self.inner.go_to_settings().await
    }

    async fn start_new_game(&self, variant: GameVariant) -> Result<FrontendState> {
        self.record("start_new_game")?;
        self.inner.start_new_game(variant).await
    }

    async fn submit_answer(&self, answer: &str) -> Result<FrontendState> {
        self.record("submit_answer")?;
        self.inner.submit_answer(answer).await
    }

    async fn move_selection(&self, delta: i32) -> Result<FrontendState> {
        self.record("move_selection")?;
        self.inner.move_selection(delta).await
    }

    async fn submit_current_selection(&self) -> Result<FrontendState> {
        self.record("submit_current_selection")?;
        self.inner.submit_current_selection().await
    }

    async fn next_level(&self) -> Result<FrontendState> {
        self.record("next_level")?;
        self.inner.next_level().await
    }

    async fn reset_game(&self) -> Result<FrontendState> {
        self.record("reset_game")?;
        self.inner.reset_game().await
    }

    async fn consume_sound(&self) -> Result<Option<SoundEvent>> {
        self.record("consume_sound")?;
        self.inner.consume_sound().await
    }

    async fn tick(&self, delta_seconds: f64) -> Result<FrontendState> {
        self.record("tick")?;
        self.inner.tick(delta_seconds).await
    }
}
