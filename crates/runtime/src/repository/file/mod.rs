//! File-based repository implementations.

mod settings;

pub use settings::{FileSettingsRepository, default_settings_path};
