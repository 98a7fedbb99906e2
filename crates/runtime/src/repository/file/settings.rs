//! File-based SettingsRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::GameSettings;

use crate::repository::{RepositoryError, Result, SettingsRepository};

const SETTINGS_FILE: &str = "settings.json";

/// Stores settings as a single pretty-printed JSON document.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-save leaves the previous settings intact.
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    /// Create a repository backed by the given file path.
    ///
    /// The parent directory is created if it does not exist yet.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Platform-specific location of the settings file.
///
/// - macOS: `~/Library/Application Support/letterlanders/settings.json`
/// - Linux: `~/.config/letterlanders/settings.json`
/// - Windows: `%APPDATA%\letterlanders\config\settings.json`
/// - Fallback: `./letterlanders/settings.json`
pub fn default_settings_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "letterlanders")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./letterlanders"))
        .join(SETTINGS_FILE)
}

impl SettingsRepository for FileSettingsRepository {
    fn load(&self) -> Result<Option<GameSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(RepositoryError::Io)?;
        let settings: GameSettings = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded settings from {}", self.path.display());

        Ok(Some(settings))
    }

    fn save(&self, settings: &GameSettings) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(settings)?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved settings to {}", self.path.display());

        Ok(())
    }
}
