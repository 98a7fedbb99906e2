//! Snapshot vocabulary exchanged between the engine and its observers.
//!
//! Everything here is plain data. The engine owns the live values; hosts hand
//! out clones as [`FrontendState`] snapshots and clients never construct one
//! except the default placeholder shown before the first sync.
use strum::{AsRefStr, Display, EnumString};

use crate::config::GameConfig;

/// Quiz domain selected when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameVariant {
    Numbers,
    Letters,
}

impl GameVariant {
    /// Parses a variant name, falling back to [`GameVariant::Numbers`] for
    /// anything unrecognized.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(GameVariant::Numbers)
    }

    /// Returns the item pool questions are drawn from.
    pub fn item_pool(&self) -> Vec<String> {
        match self {
            GameVariant::Numbers => ('1'..='9').map(String::from).collect(),
            GameVariant::Letters => ('A'..='Z').map(String::from).collect(),
        }
    }
}

/// Position of the game state machine as observed by the client.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    #[default]
    Menu,
    Settings {
        message: Option<String>,
    },
    Playing,
    Feedback {
        success: bool,
        message: String,
    },
    LevelComplete {
        level: u32,
        score: u32,
        passed: bool,
    },
    SessionComplete {
        score: u32,
    },
}

impl GameStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, GameStatus::Playing)
    }

    pub fn is_feedback(&self) -> bool {
        matches!(self, GameStatus::Feedback { .. })
    }

    /// Statuses that carry a [`SessionState`] alongside them.
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            GameStatus::Playing | GameStatus::Feedback { .. } | GameStatus::LevelComplete { .. }
        )
    }
}

/// Progress through the current level.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub variant: GameVariant,
    pub current_level: u32,
    pub current_question_index: u32,
    pub total_questions: u32,
    pub score: u32,
    /// Cumulative score across completed levels.
    pub total_score: u32,
    pub target: String,
    pub options: Vec<String>,
    /// Cursor for arrow-based selection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub selected_index: usize,
    /// Seconds allowed for the current question, `None` when untimed.
    pub level_time_limit: Option<f64>,
    /// Seconds spent on the current question.
    pub level_elapsed_time: f64,
}

impl SessionState {
    /// Creates an empty session positioned at the start of `level`.
    pub fn new(variant: GameVariant, level: u32) -> Self {
        Self {
            variant,
            current_level: level,
            current_question_index: 0,
            total_questions: GameConfig::questions_for_level(level),
            score: 0,
            total_score: 0,
            target: String::new(),
            options: Vec::new(),
            selected_index: 0,
            level_time_limit: None,
            level_elapsed_time: 0.0,
        }
    }

    /// Seconds left before the current question times out.
    pub fn remaining_time(&self) -> Option<f64> {
        self.level_time_limit
            .map(|limit| (limit - self.level_elapsed_time).max(0.0))
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.options.get(self.selected_index).map(String::as_str)
    }
}

/// Atomic snapshot unit exchanged across the transport boundary.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontendState {
    pub status: GameStatus,
    pub session: Option<SessionState>,
}

impl FrontendState {
    pub fn new(status: GameStatus, session: Option<SessionState>) -> Self {
        Self { status, session }
    }
}

/// One-shot audio cue. The engine holds at most one and hands it out once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundEvent {
    #[default]
    None,
    PlaySuccess,
    PlayFailure,
    SayPrompt(String),
    GameStart,
    LevelComplete,
}

impl SoundEvent {
    pub fn is_none(&self) -> bool {
        matches!(self, SoundEvent::None)
    }

    /// Converts the engine's empty slot into an absent value.
    pub fn into_option(self) -> Option<SoundEvent> {
        (!self.is_none()).then_some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_name_falls_back_to_numbers() {
        assert_eq!(GameVariant::from_name("Letters"), GameVariant::Letters);
        assert_eq!(GameVariant::from_name("Numbers"), GameVariant::Numbers);
        assert_eq!(GameVariant::from_name("Hieroglyphs"), GameVariant::Numbers);
        assert_eq!(GameVariant::Letters.as_ref(), "Letters");
    }

    #[test]
    fn session_bearing_statuses() {
        assert!(GameStatus::Playing.has_session());
        assert!(
            GameStatus::LevelComplete {
                level: 1,
                score: 4,
                passed: true
            }
            .has_session()
        );
        assert!(!GameStatus::Menu.has_session());
        assert!(!GameStatus::SessionComplete { score: 3 }.has_session());
    }

    #[test]
    fn empty_sound_slot_is_absent() {
        assert_eq!(SoundEvent::None.into_option(), None);
        assert_eq!(
            SoundEvent::PlaySuccess.into_option(),
            Some(SoundEvent::PlaySuccess)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn status_uses_external_tagging() {
        let json = serde_json::to_value(GameStatus::Feedback {
            success: true,
            message: "Great Job!".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Feedback": {"success": true, "message": "Great Job!"}})
        );
        assert_eq!(
            serde_json::to_value(GameStatus::Menu).unwrap(),
            serde_json::json!("Menu")
        );
    }
}
