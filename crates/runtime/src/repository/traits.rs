//! Repository contract for saving and loading player settings.

use game_core::GameSettings;

use super::Result;

/// Persistent store for [`GameSettings`].
///
/// `load` returns `Ok(None)` when nothing has been saved yet; callers decide
/// what the defaults are.
pub trait SettingsRepository: Send + Sync {
    fn load(&self) -> Result<Option<GameSettings>>;

    fn save(&self, settings: &GameSettings) -> Result<()>;
}
