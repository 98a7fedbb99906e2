//! Reconciliation store.
//!
//! The store never computes game state. It forwards each user intent to the
//! backend and replaces its copy with whatever snapshot comes back. Every
//! snapshot goes through [`GameStore::process_state`], which is also the only
//! place the feedback auto-advance timer is started or cancelled.
//!
//! Concurrent operations are not sequenced: whichever reply arrives last
//! wins, even if it was requested first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use game_core::{FrontendState, GameSettings, GameVariant, SoundEvent};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::backend::Backend;
use crate::error::Result;

/// Cloneable handle to the client-side game state.
#[derive(Clone)]
pub struct GameStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn Backend>,
    state: watch::Sender<FrontendState>,
    settings: watch::Sender<GameSettings>,
    last_sound: watch::Sender<Option<SoundEvent>>,
    feedback_timer: Mutex<Option<FeedbackTimer>>,
    timer_ids: AtomicU64,
}

struct FeedbackTimer {
    id: u64,
    task: JoinHandle<()>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        let timer = self
            .feedback_timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = timer.take() {
            timer.task.abort();
        }
    }
}

impl GameStore {
    /// Store with a `{Menu, None}` placeholder and default settings until the
    /// first sync.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (state, _) = watch::channel(FrontendState::default());
        let (settings, _) = watch::channel(GameSettings::default());
        let (last_sound, _) = watch::channel(None);

        Self {
            inner: Arc::new(StoreInner {
                backend,
                state,
                settings,
                last_sound,
                feedback_timer: Mutex::new(None),
                timer_ids: AtomicU64::new(0),
            }),
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.inner.backend
    }

    pub fn state(&self) -> FrontendState {
        self.inner.state.borrow().clone()
    }

    pub fn settings(&self) -> GameSettings {
        self.inner.settings.borrow().clone()
    }

    pub fn last_sound(&self) -> Option<SoundEvent> {
        self.inner.last_sound.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<FrontendState> {
        self.inner.state.subscribe()
    }

    pub fn subscribe_settings(&self) -> watch::Receiver<GameSettings> {
        self.inner.settings.subscribe()
    }

    /// Notified on every delivered sound, including repeats of the same cue.
    pub fn subscribe_sound(&self) -> watch::Receiver<Option<SoundEvent>> {
        self.inner.last_sound.subscribe()
    }

    pub fn feedback_timer_active(&self) -> bool {
        self.lock_timer().is_some()
    }

    /// Adopts `new_state` as the current snapshot.
    ///
    /// Entering feedback arms the auto-advance timer unless one is already
    /// running; a running timer is never restarted. Any other status cancels
    /// it. Must be called from within a tokio runtime.
    pub fn process_state(&self, new_state: FrontendState) {
        let mut timer = self.lock_timer();

        if new_state.status.is_feedback() {
            if timer.is_none() {
                *timer = Some(self.spawn_feedback_timer());
            }
        } else if let Some(running) = timer.take() {
            debug!(timer = running.id, "Cancelling feedback timer");
            running.task.abort();
        }

        self.inner.state.send_replace(new_state);
    }

    fn spawn_feedback_timer(&self) -> FeedbackTimer {
        let id = self.inner.timer_ids.fetch_add(1, Ordering::Relaxed);
        let seconds = self.inner.settings.borrow().feedback_duration_seconds;
        let store = Arc::downgrade(&self.inner);

        debug!(timer = id, seconds, "Starting feedback timer");

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;

            let Some(inner) = store.upgrade() else {
                return;
            };
            let store = GameStore { inner };

            // Clear our own slot first so the snapshot below can arm a new timer.
            store.release_feedback_timer(id);
            debug!(timer = id, "Feedback timer expired");
            store.next_level().await;
        });

        FeedbackTimer { id, task }
    }

    fn release_feedback_timer(&self, id: u64) {
        let mut timer = self.lock_timer();
        if timer.as_ref().is_some_and(|running| running.id == id) {
            *timer = None;
        }
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<FeedbackTimer>> {
        self.inner
            .feedback_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn reconcile(&self, operation: &str, result: Result<FrontendState>) {
        match result {
            Ok(state) => self.process_state(state),
            Err(err) => error!("{} failed, keeping last state: {}", operation, err),
        }
    }

    pub async fn sync_state(&self) {
        let result = self.inner.backend.get_game_state().await;
        self.reconcile("get_game_state", result);
    }

    /// Replaces the cached settings with the engine's.
    pub async fn load_settings(&self) {
        match self.inner.backend.get_settings().await {
            Ok(settings) => {
                self.inner.settings.send_replace(settings);
            }
            Err(err) => error!("get_settings failed, keeping cached settings: {}", err),
        }
    }

    /// Caches the normalized `settings` immediately, asks the engine to adopt
    /// them, then replaces the cache with what the engine actually kept.
    pub async fn save_settings(&self, settings: GameSettings) {
        self.inner
            .settings
            .send_replace(settings.clone().normalized());

        let result = self.inner.backend.update_settings(settings).await;
        let accepted = result.is_ok();
        self.reconcile("update_settings", result);

        if accepted {
            self.load_settings().await;
        }
    }

    pub async fn go_to_settings(&self) {
        let result = self.inner.backend.go_to_settings().await;
        self.reconcile("go_to_settings", result);
    }

    pub async fn start_game(&self, variant: GameVariant) {
        let result = self.inner.backend.start_new_game(variant).await;
        self.reconcile("start_new_game", result);
    }

    pub async fn submit_answer(&self, answer: &str) {
        let result = self.inner.backend.submit_answer(answer).await;
        self.reconcile("submit_answer", result);
    }

    pub async fn move_selection(&self, delta: i32) {
        let result = self.inner.backend.move_selection(delta).await;
        self.reconcile("move_selection", result);
    }

    pub async fn submit_selection(&self) {
        let result = self.inner.backend.submit_current_selection().await;
        self.reconcile("submit_current_selection", result);
    }

    pub async fn next_level(&self) {
        let result = self.inner.backend.next_level().await;
        self.reconcile("next_level", result);
    }

    pub async fn reset(&self) {
        let result = self.inner.backend.reset_game().await;
        self.reconcile("reset_game", result);
    }

    pub async fn tick(&self, delta_seconds: f64) {
        let result = self.inner.backend.tick(delta_seconds).await;
        self.reconcile("tick", result);
    }

    /// One poll of the engine's sound slot. Failures are ignored.
    pub async fn check_sound(&self) {
        if let Ok(Some(sound)) = self.inner.backend.consume_sound().await {
            debug!(?sound, "Sound event");
            self.inner.last_sound.send_replace(Some(sound));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use game_core::{GameStatus, SessionState};

    fn store_with(settings: GameSettings) -> (GameStore, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::with_settings(settings, 3));
        (GameStore::new(backend.clone()), backend)
    }

    fn store() -> (GameStore, Arc<MockBackend>) {
        store_with(GameSettings::default())
    }

    fn feedback_state() -> FrontendState {
        FrontendState::new(
            GameStatus::Feedback {
                success: true,
                message: "Great Job!".to_string(),
            },
            Some(SessionState::new(GameVariant::Letters, 1)),
        )
    }

    fn wrong_answer(session: &SessionState) -> String {
        session
            .variant
            .item_pool()
            .into_iter()
            .find(|item| *item != session.target)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn feedback_arms_timer_once_and_advances_once() {
        let (store, backend) = store();

        store.process_state(feedback_state());
        assert!(store.feedback_timer_active());

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert_eq!(backend.calls("next_level"), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(backend.calls("next_level"), 1);
        assert!(!store.feedback_timer_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.calls("next_level"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_feedback_does_not_restart_timer() {
        let (store, backend) = store();

        store.process_state(feedback_state());
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        store.process_state(feedback_state());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(backend.calls("next_level"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_feedback_cancels_timer() {
        let (store, backend) = store();

        store.process_state(feedback_state());
        store.process_state(FrontendState::default());
        assert!(!store.feedback_timer_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.calls("next_level"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_uses_configured_duration() {
        let (store, backend) = store_with(GameSettings {
            feedback_duration_seconds: 4,
            ..GameSettings::default()
        });
        store.load_settings().await;

        store.process_state(feedback_state());
        tokio::time::sleep(Duration::from_millis(3_900)).await;
        assert_eq!(backend.calls("next_level"), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(backend.calls("next_level"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn correct_answer_auto_advances_to_next_question() {
        let (store, backend) = store();

        store.start_game(GameVariant::Letters).await;
        let session = store.state().session.unwrap();
        assert_eq!(store.state().status, GameStatus::Playing);
        assert_eq!(session.current_question_index, 0);
        assert!(!session.options.is_empty());
        assert!(session.options.contains(&session.target));

        store.submit_answer(&session.target).await;
        let state = store.state();
        assert!(matches!(
            state.status,
            GameStatus::Feedback { success: true, .. }
        ));
        assert_eq!(state.session.unwrap().score, 1);
        assert!(store.feedback_timer_active());

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(backend.calls("next_level"), 1);

        let state = store.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.session.unwrap().current_question_index, 1);
        assert!(!store.feedback_timer_active());
    }

    #[tokio::test]
    async fn wrong_answer_keeps_score() {
        let (store, _backend) = store();

        store.start_game(GameVariant::Numbers).await;
        let session = store.state().session.unwrap();

        store.submit_answer(&wrong_answer(&session)).await;
        let state = store.state();
        assert!(matches!(
            state.status,
            GameStatus::Feedback { success: false, .. }
        ));
        assert_eq!(state.session.unwrap().score, 0);
    }

    #[tokio::test]
    async fn selection_moves_cursor_and_answers() {
        let (store, backend) = store();
        store.start_game(GameVariant::Letters).await;

        store.move_selection(1).await;
        let session = store.state().session.unwrap();
        assert_eq!(session.selected_index, 1);

        store.submit_selection().await;
        let state = store.state();
        assert!(state.status.is_feedback());
        assert!(store.feedback_timer_active());

        let chosen = &session.options[1];
        let expected_score = u32::from(*chosen == session.target);
        assert_eq!(state.session.unwrap().score, expected_score);
        assert_eq!(backend.calls("move_selection"), 1);
        assert_eq!(backend.calls("submit_current_selection"), 1);
    }

    #[tokio::test]
    async fn reset_returns_to_menu_and_cancels_timer() {
        let (store, _backend) = store();

        store.start_game(GameVariant::Letters).await;
        let session = store.state().session.unwrap();
        store.submit_answer(&session.target).await;
        assert!(store.feedback_timer_active());

        store.reset().await;
        assert_eq!(store.state(), FrontendState::default());
        assert!(!store.feedback_timer_active());
    }

    #[tokio::test]
    async fn transport_failure_keeps_last_state() {
        let (store, backend) = store();
        store.start_game(GameVariant::Letters).await;
        let before = store.state();

        backend.set_failing(true);
        store.next_level().await;
        store.reset().await;
        store.sync_state().await;

        assert_eq!(store.state(), before);
        assert_eq!(backend.calls("reset_game"), 1);
    }

    #[tokio::test]
    async fn sound_is_delivered_once() {
        let (store, backend) = store();
        let mut sounds = store.subscribe_sound();

        store.start_game(GameVariant::Letters).await;
        store.check_sound().await;
        assert!(sounds.has_changed().unwrap());
        let first = sounds.borrow_and_update().clone();
        assert!(matches!(first, Some(SoundEvent::SayPrompt(_))));

        store.check_sound().await;
        assert!(!sounds.has_changed().unwrap());
        assert_eq!(store.last_sound(), first);
        assert_eq!(backend.calls("consume_sound"), 2);
    }

    #[tokio::test]
    async fn sound_failures_are_silent() {
        let (store, backend) = store();
        backend.set_failing(true);

        store.check_sound().await;
        assert_eq!(store.last_sound(), None);
    }

    #[tokio::test]
    async fn save_settings_caches_before_the_engine_answers() {
        let (store, backend) = store();
        backend.set_failing(true);

        let settings = GameSettings {
            show_target_visual: true,
            ..GameSettings::default()
        };
        store.save_settings(settings.clone()).await;
        assert_eq!(store.settings(), settings);

        backend.set_failing(false);
        store.go_to_settings().await;
        store.save_settings(settings).await;
        assert_eq!(store.state().status, GameStatus::Menu);
    }

    #[tokio::test(start_paused = true)]
    async fn saved_settings_follow_the_engine() {
        let (store, backend) = store();
        store.go_to_settings().await;

        store
            .save_settings(GameSettings {
                feedback_duration_seconds: 0,
                start_level: 9,
                ..GameSettings::default()
            })
            .await;

        let engine = backend.get_settings().await.unwrap();
        assert_eq!(engine.feedback_duration_seconds, 1);
        assert_eq!(engine.start_level, 4);
        assert_eq!(store.settings(), engine);
        assert_eq!(backend.calls("get_settings"), 2);

        // A zero-second cache would skip the feedback screen entirely.
        store.start_game(GameVariant::Letters).await;
        let session = store.state().session.unwrap();
        assert_eq!(session.current_level, 4);
        store.submit_answer(&session.target).await;
        assert!(store.state().status.is_feedback());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.calls("next_level"), 0);
        assert!(store.state().status.is_feedback());

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(backend.calls("next_level"), 1);
    }

    #[tokio::test]
    async fn rejected_save_keeps_normalized_cache() {
        let (store, backend) = store();
        backend.set_failing(true);

        store
            .save_settings(GameSettings {
                feedback_duration_seconds: 0,
                ..GameSettings::default()
            })
            .await;

        assert_eq!(store.settings().feedback_duration_seconds, 1);
        assert_eq!(backend.calls("get_settings"), 0);
    }

    #[tokio::test]
    async fn state_observers_are_notified() {
        let (store, _backend) = store();
        let mut states = store.subscribe_state();

        store.go_to_settings().await;
        assert!(states.has_changed().unwrap());
        assert_eq!(
            states.borrow_and_update().status,
            GameStatus::Settings { message: None }
        );
    }
}
