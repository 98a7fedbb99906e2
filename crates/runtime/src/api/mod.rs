//! Public runtime API surface.
//!
//! This module gathers the types exposed to callers of the host so other
//! layers can stay focused on orchestration, workers, or persistence.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;

/// Command names and argument keys understood by the host.
///
/// These strings are the wire contract shared with desktop shells and must
/// not change.
pub mod commands {
    pub const GET_GAME_STATE: &str = "get_game_state";
    pub const GET_SETTINGS: &str = "get_settings";
    pub const UPDATE_SETTINGS: &str = "update_settings";
    pub const GO_TO_SETTINGS: &str = "go_to_settings";
    pub const START_NEW_GAME: &str = "start_new_game";
    pub const SUBMIT_ANSWER: &str = "submit_answer";
    pub const MOVE_SELECTION: &str = "move_selection";
    pub const SUBMIT_CURRENT_SELECTION: &str = "submit_current_selection";
    pub const NEXT_LEVEL: &str = "next_level";
    pub const RESET_GAME: &str = "reset_game";
    pub const CONSUME_SOUND: &str = "consume_sound";
    pub const TICK: &str = "tick";

    pub const ARG_SETTINGS: &str = "settings";
    pub const ARG_VARIANT: &str = "variantStr";
    pub const ARG_ANSWER: &str = "answer";
    pub const ARG_DELTA: &str = "delta";
    pub const ARG_DT_SECONDS: &str = "dtSeconds";
}
