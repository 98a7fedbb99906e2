//! Quiz rules and snapshot types shared by the engine host and its clients.
//!
//! `game-core` defines the canonical state machine ([`GameEngine`]) and the
//! value shapes that cross the transport boundary: [`FrontendState`],
//! [`GameStatus`], [`SessionState`], [`GameSettings`] and [`SoundEvent`].
//! All state mutation flows through [`engine::GameEngine`]; hosts expose it,
//! clients only ever observe the snapshots it produces.
pub mod config;
pub mod engine;
pub mod settings;
pub mod state;

pub use config::GameConfig;
pub use engine::GameEngine;
pub use settings::{GameSettings, InputMethod};
pub use state::{FrontendState, GameStatus, GameVariant, SessionState, SoundEvent};
