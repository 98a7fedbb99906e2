//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use runtime::repository::{self, default_settings_path};
use runtime::{FileSettingsRepository, InMemorySettingsRepository, SettingsRepository};

const MIN_INTERVAL_MS: u64 = 10;
const DEFAULT_INTERVAL_MS: u64 = 100;

/// Configuration required to bootstrap the client.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub settings: SettingsLocation,
    pub drivers: DriverConfig,
    /// Spawn an engine host in this process and install it before the
    /// transport is selected.
    pub host: bool,
    pub session_id: Option<String>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `LETTERLANDERS_SOUND_POLL_MS` / `LETTERLANDERS_TICK_MS`
    /// - `LETTERLANDERS_SETTINGS_PATH` (`memory` keeps settings in memory)
    /// - `LETTERLANDERS_HOST`
    /// - `LETTERLANDERS_SESSION_ID`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("LETTERLANDERS_SOUND_POLL_MS") {
            config.drivers.sound_poll_interval = Duration::from_millis(ms.max(MIN_INTERVAL_MS));
        }

        if let Some(ms) = read_env::<u64>("LETTERLANDERS_TICK_MS") {
            config.drivers.tick_interval = Duration::from_millis(ms.max(MIN_INTERVAL_MS));
        }

        if let Ok(path) = env::var("LETTERLANDERS_SETTINGS_PATH") {
            config.settings = SettingsLocation::parse(&path);
        }

        config.host = read_env_bool("LETTERLANDERS_HOST").unwrap_or(false);
        config.session_id = env::var("LETTERLANDERS_SESSION_ID").ok();

        config
    }
}

/// Periods of the sound poller and the tick driver.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub sound_poll_interval: Duration,
    pub tick_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            sound_poll_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            tick_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

/// Where the in-process engine keeps settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SettingsLocation {
    /// Platform configuration directory.
    #[default]
    Default,
    File(PathBuf),
    Memory,
}

impl SettingsLocation {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" => Self::Default,
            v if v.eq_ignore_ascii_case("memory") => Self::Memory,
            path => Self::File(PathBuf::from(path)),
        }
    }

    pub fn path(&self) -> Option<PathBuf> {
        match self {
            Self::Default => Some(default_settings_path()),
            Self::File(path) => Some(path.clone()),
            Self::Memory => None,
        }
    }

    /// Opens the repository this location points at.
    pub fn open(&self) -> repository::Result<Arc<dyn SettingsRepository>> {
        Ok(match self.path() {
            Some(path) => Arc::new(FileSettingsRepository::new(path)?),
            None => Arc::new(InMemorySettingsRepository::new()),
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
