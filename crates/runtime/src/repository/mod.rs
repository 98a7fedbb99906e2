//! Repository layer for player settings.
//!
//! Settings are the only data the host keeps between runs. Game progress is
//! session-scoped and never persisted.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileSettingsRepository, default_settings_path};
pub use memory::InMemorySettingsRepository;
pub use traits::SettingsRepository;
