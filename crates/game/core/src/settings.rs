//! Player-facing preferences.
//!
//! Settings are owned by the engine. Clients cache a copy and replace it via
//! an explicit save; persistence lives with the host's repository.
use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputMethod {
    DirectKeyboard,
    ArrowSelection,
    Hybrid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSettings {
    #[cfg_attr(feature = "serde", serde(default = "default_feedback_duration"))]
    pub feedback_duration_seconds: u64,

    #[cfg_attr(feature = "serde", serde(default = "default_show_target"))]
    pub show_target_visual: bool,

    #[cfg_attr(feature = "serde", serde(default = "default_input_method"))]
    pub input_method: InputMethod,

    #[cfg_attr(feature = "serde", serde(default = "default_start_level"))]
    pub start_level: u32,
}

fn default_feedback_duration() -> u64 {
    2
}

fn default_show_target() -> bool {
    false
}

fn default_input_method() -> InputMethod {
    InputMethod::Hybrid
}

fn default_start_level() -> u32 {
    1
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            feedback_duration_seconds: default_feedback_duration(),
            show_target_visual: default_show_target(),
            input_method: default_input_method(),
            start_level: default_start_level(),
        }
    }
}

impl GameSettings {
    /// Clamps values into the ranges the engine can play with.
    pub fn normalized(mut self) -> Self {
        self.feedback_duration_seconds = self.feedback_duration_seconds.max(1);
        self.start_level = self.start_level.clamp(1, GameConfig::MAX_START_LEVEL);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_clamps_out_of_range_values() {
        let settings = GameSettings {
            feedback_duration_seconds: 0,
            start_level: 9,
            ..GameSettings::default()
        }
        .normalized();

        assert_eq!(settings.feedback_duration_seconds, 1);
        assert_eq!(settings.start_level, GameConfig::MAX_START_LEVEL);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let settings: GameSettings =
            serde_json::from_str(r#"{"show_target_visual": true}"#).unwrap();
        assert!(settings.show_target_visual);
        assert_eq!(settings.feedback_duration_seconds, 2);
        assert_eq!(settings.input_method, InputMethod::Hybrid);
        assert_eq!(settings.start_level, 1);
    }
}
