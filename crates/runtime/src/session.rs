//! Command surface over a single [`GameEngine`].
//!
//! [`EngineSession`] is what both transports ultimately talk to: the host
//! worker wraps one behind a channel, the in-process client owns one behind a
//! mutex. Every operation returns the post-operation snapshot.

use std::sync::Arc;

use game_core::{FrontendState, GameEngine, GameSettings, GameStatus, GameVariant, SoundEvent};
use tracing::{debug, info, warn};

use crate::repository::{InMemorySettingsRepository, Result, SettingsRepository};

pub struct EngineSession {
    engine: GameEngine,
    repository: Arc<dyn SettingsRepository>,
}

impl EngineSession {
    /// Opens a session with settings loaded from `repository`.
    ///
    /// Missing settings fall back to defaults. A corrupted settings document
    /// is logged and replaced by defaults; I/O and lock failures propagate.
    pub fn open(repository: Arc<dyn SettingsRepository>) -> Result<Self> {
        let settings = match repository.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!("No stored settings, using defaults");
                GameSettings::default()
            }
            Err(err) if err.is_corrupted() => {
                warn!("Stored settings are corrupted, using defaults: {}", err);
                GameSettings::default()
            }
            Err(err) => return Err(err),
        };

        Ok(Self::with_engine(GameEngine::with_settings(settings), repository))
    }

    /// Session that keeps settings in memory only.
    pub fn ephemeral() -> Self {
        Self::with_engine(
            GameEngine::new(),
            Arc::new(InMemorySettingsRepository::new()),
        )
    }

    /// Wraps an existing engine, e.g. a seeded one in tests.
    pub fn with_engine(engine: GameEngine, repository: Arc<dyn SettingsRepository>) -> Self {
        Self { engine, repository }
    }

    pub fn get_game_state(&self) -> FrontendState {
        self.engine.snapshot()
    }

    pub fn get_settings(&self) -> GameSettings {
        self.engine.settings().clone()
    }

    /// Stores new settings and returns to the menu.
    ///
    /// A failed save is logged; the new settings still apply to this run.
    pub fn update_settings(&mut self, settings: GameSettings) -> FrontendState {
        self.engine.apply_settings(settings);

        if let Err(err) = self.repository.save(self.engine.settings()) {
            warn!("Failed to persist settings: {}", err);
        } else {
            info!("Settings updated");
        }

        self.engine.return_to_menu();
        self.engine.snapshot()
    }

    pub fn go_to_settings(&mut self) -> FrontendState {
        self.engine.show_settings(None);
        self.engine.snapshot()
    }

    /// Starts a session for the named variant. Unknown names play numbers.
    pub fn start_new_game(&mut self, variant: &str) -> FrontendState {
        let variant = GameVariant::from_name(variant);
        debug!("Starting new game: {}", variant);
        self.engine.start_game(variant);
        self.engine.snapshot()
    }

    /// Submits the first character of `answer`. An empty answer changes nothing.
    pub fn submit_answer(&mut self, answer: &str) -> FrontendState {
        if let Some(choice) = answer.chars().next() {
            self.engine.submit_answer(choice);
        }
        self.engine.snapshot()
    }

    /// Moves the option cursor by `delta`, wrapping at either end.
    pub fn move_selection(&mut self, delta: i32) -> FrontendState {
        self.engine.move_selection(delta);
        self.engine.snapshot()
    }

    /// Answers with the option under the cursor.
    pub fn submit_current_selection(&mut self) -> FrontendState {
        self.engine.submit_current_selection();
        self.engine.snapshot()
    }

    /// Advances from whatever screen expects a "continue".
    pub fn next_level(&mut self) -> FrontendState {
        match self.engine.status() {
            GameStatus::LevelComplete { .. } => self.engine.advance_to_next_level_or_retry(),
            GameStatus::Feedback { .. } => self.engine.next_level(),
            _ => {}
        }
        self.engine.snapshot()
    }

    pub fn reset_game(&mut self) -> FrontendState {
        self.engine.return_to_menu();
        self.engine.snapshot()
    }

    /// Takes the pending sound. `None` when nothing is pending.
    pub fn consume_sound(&mut self) -> Option<SoundEvent> {
        self.engine.consume_sound().into_option()
    }

    pub fn tick(&mut self, dt_seconds: f64) -> FrontendState {
        self.engine.tick(dt_seconds);
        self.engine.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use game_core::InputMethod;

    struct FailingRepository;

    impl SettingsRepository for FailingRepository {
        fn load(&self) -> Result<Option<GameSettings>> {
            Err(RepositoryError::LockPoisoned)
        }

        fn save(&self, _settings: &GameSettings) -> Result<()> {
            Err(RepositoryError::LockPoisoned)
        }
    }

    struct CorruptRepository;

    impl SettingsRepository for CorruptRepository {
        fn load(&self) -> Result<Option<GameSettings>> {
            let err = serde_json::from_str::<GameSettings>("{").unwrap_err();
            Err(err.into())
        }

        fn save(&self, _settings: &GameSettings) -> Result<()> {
            Ok(())
        }
    }

    fn session() -> EngineSession {
        EngineSession::with_engine(
            GameEngine::with_seed(GameSettings::default(), 11),
            Arc::new(InMemorySettingsRepository::new()),
        )
    }

    #[test]
    fn open_uses_stored_settings() {
        let stored = GameSettings {
            start_level: 3,
            ..GameSettings::default()
        };
        let repo = Arc::new(InMemorySettingsRepository::with_settings(stored.clone()));

        let session = EngineSession::open(repo).unwrap();
        assert_eq!(session.get_settings(), stored);
        assert_eq!(session.get_game_state(), FrontendState::default());
    }

    #[test]
    fn open_recovers_from_corrupt_settings() {
        let session = EngineSession::open(Arc::new(CorruptRepository)).unwrap();
        assert_eq!(session.get_settings(), GameSettings::default());
    }

    #[test]
    fn open_propagates_storage_failures() {
        assert!(EngineSession::open(Arc::new(FailingRepository)).is_err());
    }

    #[test]
    fn update_settings_persists_and_returns_to_menu() {
        let repo = Arc::new(InMemorySettingsRepository::new());
        let mut session = EngineSession::with_engine(GameEngine::new(), repo.clone());
        session.go_to_settings();

        let settings = GameSettings {
            feedback_duration_seconds: 0,
            input_method: InputMethod::DirectKeyboard,
            ..GameSettings::default()
        };
        let state = session.update_settings(settings);

        assert_eq!(state.status, GameStatus::Menu);
        let stored = repo.load().unwrap().unwrap();
        assert_eq!(stored.feedback_duration_seconds, 1);
        assert_eq!(stored.input_method, InputMethod::DirectKeyboard);
        assert_eq!(session.get_settings(), stored);
    }

    #[test]
    fn update_settings_survives_save_failure() {
        let mut session =
            EngineSession::with_engine(GameEngine::new(), Arc::new(FailingRepository));
        let settings = GameSettings {
            show_target_visual: true,
            ..GameSettings::default()
        };

        let state = session.update_settings(settings);
        assert_eq!(state.status, GameStatus::Menu);
        assert!(session.get_settings().show_target_visual);
    }

    #[test]
    fn go_to_settings_has_no_message() {
        let mut session = session();
        session.start_new_game("Letters");

        let state = session.go_to_settings();
        assert_eq!(state.status, GameStatus::Settings { message: None });
        assert!(state.session.is_none());
    }

    #[test]
    fn empty_answer_is_ignored() {
        let mut session = session();
        let before = session.start_new_game("Letters");

        let after = session.submit_answer("");
        assert_eq!(before, after);
    }

    #[test]
    fn only_first_character_of_answer_counts() {
        let mut session = session();
        let state = session.start_new_game("Letters");
        let target = state.session.unwrap().target;

        let answer = format!("{}zzz", target.to_lowercase());
        let state = session.submit_answer(&answer);
        assert!(matches!(
            state.status,
            GameStatus::Feedback { success: true, .. }
        ));
    }

    #[test]
    fn selection_cursor_answers_with_the_chosen_option() {
        let mut session = session();
        let state = session.start_new_game("Letters");
        let current = state.session.unwrap();
        let target_index = current
            .options
            .iter()
            .position(|option| *option == current.target)
            .unwrap();

        let state = session.move_selection(target_index as i32);
        assert_eq!(state.session.unwrap().selected_index, target_index);

        let state = session.submit_current_selection();
        assert!(matches!(
            state.status,
            GameStatus::Feedback { success: true, .. }
        ));
        assert_eq!(state.session.unwrap().score, 1);
    }

    #[test]
    fn selection_without_a_game_changes_nothing() {
        let mut session = session();
        assert_eq!(session.move_selection(1), FrontendState::default());
        assert_eq!(session.submit_current_selection(), FrontendState::default());
    }

    #[test]
    fn next_level_outside_feedback_is_a_no_op() {
        let mut session = session();
        assert_eq!(session.next_level(), FrontendState::default());

        let playing = session.start_new_game("Numbers");
        assert_eq!(session.next_level(), playing);
    }

    #[test]
    fn next_level_from_feedback_moves_to_next_question() {
        let mut session = session();
        let state = session.start_new_game("Numbers");
        let target = state.session.unwrap().target;
        session.submit_answer(&target);

        let state = session.next_level();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.session.unwrap().current_question_index, 1);
    }

    #[test]
    fn reset_keeps_settings() {
        let mut session = session();
        session.update_settings(GameSettings {
            start_level: 2,
            ..GameSettings::default()
        });
        session.start_new_game("Letters");

        let state = session.reset_game();
        assert_eq!(state, FrontendState::default());
        assert_eq!(session.get_settings().start_level, 2);
    }

    #[test]
    fn sound_is_delivered_once() {
        let mut session = session();
        session.start_new_game("Letters");

        assert!(matches!(
            session.consume_sound(),
            Some(SoundEvent::SayPrompt(_))
        ));
        assert_eq!(session.consume_sound(), None);
    }

    #[test]
    fn unknown_variant_plays_numbers() {
        let mut session = session();
        let state = session.start_new_game("Planets");
        assert_eq!(state.session.unwrap().variant, GameVariant::Numbers);
    }
}
