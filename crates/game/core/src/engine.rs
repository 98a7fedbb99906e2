//! Quiz state machine.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameStatus`] and
//! [`SessionState`]. Every transition (start, answer, advance, retry, timeout)
//! goes through one of its methods, and each transition leaves at most one
//! pending [`SoundEvent`] for observers to pick up via
//! [`GameEngine::consume_sound`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::settings::GameSettings;
use crate::state::{FrontendState, GameStatus, GameVariant, SessionState, SoundEvent};

/// Game engine owning the live status, session, settings and sound slot.
pub struct GameEngine {
    status: GameStatus,
    session: Option<SessionState>,
    last_sound: SoundEvent,
    settings: GameSettings,
    config: GameConfig,
    rng: StdRng,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    pub fn new() -> Self {
        Self::with_settings(GameSettings::default())
    }

    pub fn with_settings(settings: GameSettings) -> Self {
        Self::from_parts(settings, StdRng::from_entropy())
    }

    /// Creates an engine whose question sequence is reproducible.
    pub fn with_seed(settings: GameSettings, seed: u64) -> Self {
        Self::from_parts(settings, StdRng::seed_from_u64(seed))
    }

    fn from_parts(settings: GameSettings, rng: StdRng) -> Self {
        Self {
            status: GameStatus::Menu,
            session: None,
            last_sound: SoundEvent::None,
            settings: settings.normalized(),
            config: GameConfig::default(),
            rng,
        }
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Clones the observable part of the engine.
    pub fn snapshot(&self) -> FrontendState {
        FrontendState::new(self.status.clone(), self.session.clone())
    }

    /// Replaces the settings. Takes effect from the next started game.
    pub fn apply_settings(&mut self, settings: GameSettings) {
        self.settings = settings.normalized();
    }

    /// Leaves any session and shows the settings screen.
    pub fn show_settings(&mut self, message: Option<String>) {
        self.session = None;
        self.status = GameStatus::Settings { message };
    }

    /// Abandons any session and returns to the menu. Settings are kept.
    pub fn return_to_menu(&mut self) {
        self.session = None;
        self.status = GameStatus::Menu;
    }

    pub fn start_game(&mut self, variant: GameVariant) {
        let mut session = SessionState::new(variant, self.settings.start_level);
        self.generate_question(&mut session);

        self.last_sound = SoundEvent::SayPrompt(session.target.clone());
        self.session = Some(session);
        self.status = GameStatus::Playing;
    }

    /// Draws a fresh target and distinct options for the session's level.
    fn generate_question(&mut self, session: &mut SessionState) {
        let num_options = GameConfig::options_for_level(session.current_level);

        session.level_time_limit = self.config.time_limit_for_level(session.current_level);
        session.level_elapsed_time = 0.0;

        let mut pool = session.variant.item_pool();
        pool.shuffle(&mut self.rng);
        pool.truncate(num_options.max(1));

        // The first drawn item is the target; the rest are distinct decoys.
        session.target = pool.first().cloned().unwrap_or_default();
        pool.shuffle(&mut self.rng);
        session.options = pool;
        session.selected_index = 0;
    }

    /// Checks `input` against the current target (case-insensitive).
    ///
    /// Ignored unless a question is pending.
    pub fn submit_answer(&mut self, input: char) {
        if !self.status.is_playing() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let is_correct = session
            .target
            .chars()
            .next()
            .is_some_and(|target| input.eq_ignore_ascii_case(&target));

        if is_correct {
            session.score += 1;
            self.status = GameStatus::Feedback {
                success: true,
                message: "Great Job!".to_string(),
            };
            self.last_sound = SoundEvent::PlaySuccess;
        } else {
            self.status = GameStatus::Feedback {
                success: false,
                message: format!("Oops! That was {}. Try again!", input),
            };
            self.last_sound = SoundEvent::PlayFailure;
        }
    }

    /// Moves past the current question, closing the level when it was the last one.
    pub fn next_level(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        session.current_question_index += 1;

        if session.current_question_index < session.total_questions {
            self.generate_question(&mut session);
            self.last_sound = SoundEvent::SayPrompt(session.target.clone());
            self.session = Some(session);
            self.status = GameStatus::Playing;
            return;
        }

        let threshold = self.config.pass_threshold(session.total_questions);
        let passed = session.score >= threshold;

        if passed && GameConfig::is_boss_level(session.current_level) {
            // Boss defeated: skip the intermediate level screen.
            session.total_score += session.score;
            self.status = GameStatus::SessionComplete {
                score: session.total_score,
            };
            self.last_sound = SoundEvent::LevelComplete;
            return;
        }

        // Keep the question index inside the level while the summary shows.
        session.current_question_index = session.total_questions.saturating_sub(1);
        self.status = GameStatus::LevelComplete {
            level: session.current_level,
            score: session.score,
            passed,
        };
        self.last_sound = if passed {
            SoundEvent::LevelComplete
        } else {
            SoundEvent::PlayFailure
        };
        self.session = Some(session);
    }

    /// From a level summary: move to the next level when passed, retry otherwise.
    pub fn advance_to_next_level_or_retry(&mut self) {
        let GameStatus::LevelComplete { passed, level, .. } = self.status else {
            return;
        };
        let Some(mut session) = self.session.take() else {
            return;
        };

        if passed {
            session.total_score += session.score;

            if GameConfig::is_boss_level(level) {
                self.status = GameStatus::SessionComplete {
                    score: session.total_score,
                };
                self.last_sound = SoundEvent::LevelComplete;
                return;
            }
            session.current_level += 1;
        }

        // total_score survives a retry; only the level's own progress resets.
        session.current_question_index = 0;
        session.score = 0;
        session.total_questions = GameConfig::questions_for_level(session.current_level);
        self.generate_question(&mut session);

        self.last_sound = SoundEvent::SayPrompt(session.target.clone());
        self.session = Some(session);
        self.status = GameStatus::Playing;
    }

    /// Advances the question clock by `dt_seconds` while a timed question is open.
    pub fn tick(&mut self, dt_seconds: f64) {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 || !self.status.is_playing() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(limit) = session.level_time_limit else {
            return;
        };

        session.level_elapsed_time = (session.level_elapsed_time + dt_seconds).min(limit);
        if session.level_elapsed_time >= limit {
            self.status = GameStatus::Feedback {
                success: false,
                message: "Time's Up!".to_string(),
            };
            self.last_sound = SoundEvent::PlayFailure;
        }
    }

    /// Moves the selection cursor by `delta`, wrapping around the options.
    pub fn move_selection(&mut self, delta: i32) {
        if let Some(session) = self.session.as_mut() {
            let len = session.options.len() as i64;
            if len == 0 {
                return;
            }
            let index = (session.selected_index as i64 + i64::from(delta)).rem_euclid(len);
            session.selected_index = index as usize;
        }
    }

    pub fn submit_current_selection(&mut self) {
        let choice = self
            .session
            .as_ref()
            .and_then(|session| session.selected_option())
            .and_then(|option| option.chars().next());

        if let Some(choice) = choice {
            self.submit_answer(choice);
        }
    }

    /// Takes the pending sound, leaving the slot empty.
    pub fn consume_sound(&mut self) -> SoundEvent {
        std::mem::take(&mut self.last_sound)
    }
}
