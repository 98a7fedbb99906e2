//! Engine host for the quiz game.
//!
//! This crate wraps the [`game_core::GameEngine`] in the command surface
//! clients call, persists settings through a repository, and serves those
//! commands to out-of-process style callers via [`Runtime`].
//!
//! Modules are organized by responsibility:
//! - [`session`] is the command surface over one engine instance
//! - [`runtime`] hosts the orchestrator, builder and the installed-host marker
//! - [`api`] exposes the handle and error types callers interact with
//! - [`repository`] persists settings between runs
//! - `workers` keeps the command worker internal to the crate
pub mod api;
pub mod repository;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, commands};
pub use repository::{
    FileSettingsRepository, InMemorySettingsRepository, RepositoryError, SettingsRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, install_host, installed_host};
pub use session::EngineSession;
