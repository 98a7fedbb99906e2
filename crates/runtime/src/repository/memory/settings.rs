//! In-memory SettingsRepository implementation.

use std::sync::RwLock;

use game_core::GameSettings;

use crate::repository::{RepositoryError, Result, SettingsRepository};

/// Keeps settings for the lifetime of the process only.
#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<Option<GameSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with settings already stored, as if saved by an earlier run.
    pub fn with_settings(settings: GameSettings) -> Self {
        Self {
            settings: RwLock::new(Some(settings)),
        }
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn load(&self) -> Result<Option<GameSettings>> {
        let settings = self
            .settings
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(settings.clone())
    }

    fn save(&self, settings: &GameSettings) -> Result<()> {
        let mut stored = self
            .settings
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = Some(settings.clone());
        Ok(())
    }
}
