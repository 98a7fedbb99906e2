//! In-memory repository implementations for tests and ephemeral runs.

mod settings;

pub use settings::InMemorySettingsRepository;
