/// Level layout constants and tunable rule parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Fraction of a level's questions that must be answered correctly to pass.
    pub pass_ratio: f32,
    /// Seconds allowed for each boss question.
    pub boss_time_limit_seconds: f64,
}

impl GameConfig {
    // ===== level layout =====
    /// First level that is played as a boss level.
    pub const BOSS_LEVEL: u32 = 4;
    /// Questions per regular level.
    pub const REGULAR_QUESTIONS: u32 = 5;
    /// Questions per boss level.
    pub const BOSS_QUESTIONS: u32 = 1;
    /// Highest level a session may be configured to start on.
    pub const MAX_START_LEVEL: u32 = Self::BOSS_LEVEL;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PASS_RATIO: f32 = 0.8;
    pub const DEFAULT_BOSS_TIME_LIMIT_SECONDS: f64 = 5.0;

    pub fn new() -> Self {
        Self {
            pass_ratio: Self::DEFAULT_PASS_RATIO,
            boss_time_limit_seconds: Self::DEFAULT_BOSS_TIME_LIMIT_SECONDS,
        }
    }

    pub fn is_boss_level(level: u32) -> bool {
        level >= Self::BOSS_LEVEL
    }

    /// Number of questions asked on `level`.
    pub fn questions_for_level(level: u32) -> u32 {
        if Self::is_boss_level(level) {
            Self::BOSS_QUESTIONS
        } else {
            Self::REGULAR_QUESTIONS
        }
    }

    /// Number of answer options shown per question on `level`.
    pub fn options_for_level(level: u32) -> usize {
        match level {
            0 | 1 => 2,
            2 => 3,
            3 => 5,
            _ => 9,
        }
    }

    /// Time limit for a question on `level`, if any.
    pub fn time_limit_for_level(&self, level: u32) -> Option<f64> {
        Self::is_boss_level(level).then_some(self.boss_time_limit_seconds)
    }

    /// Minimum score needed to pass a level of `total_questions`, rounded up.
    pub fn pass_threshold(&self, total_questions: u32) -> u32 {
        (total_questions as f32 * self.pass_ratio).ceil() as u32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
