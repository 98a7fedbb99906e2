//! Presentation-side state synchronizer for the quiz game.
//!
//! The engine owns every rule. This crate only reaches it over one of two
//! transports ([`backend`]), keeps the latest snapshot the UI renders from
//! ([`store`]), and runs the small amount of client-side time the engine
//! needs ([`drivers`]): feedback auto-advance, sound polling, and the clock.
//!
//! [`AppContext`] is the single place these pieces are constructed.
pub mod backend;
pub mod config;
pub mod context;
pub mod drivers;
pub mod error;
pub mod frontend;
pub mod store;

pub use backend::{
    Backend, BackendKind, Environment, IpcBackend, LocalBackend, backend, create_backend,
    detect_environment,
};
pub use config::{ClientConfig, DriverConfig, SettingsLocation};
pub use context::AppContext;
pub use drivers::Drivers;
pub use error::{BackendError, Result};
pub use frontend::Frontend;
pub use store::GameStore;
