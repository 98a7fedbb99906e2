//! Background pollers that feed the store.
//!
//! The sound poller drains the engine's one-shot sound slot. The tick driver
//! advances the engine clock, but only while a question is being played so
//! an idle menu costs no transport calls.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::DriverConfig;
use crate::store::GameStore;

/// Running driver tasks. Dropping this stops them.
pub struct Drivers {
    sound: JoinHandle<()>,
    tick: JoinHandle<()>,
}

impl Drivers {
    pub fn spawn(store: GameStore, config: &DriverConfig) -> Self {
        debug!(
            sound = ?config.sound_poll_interval,
            tick = ?config.tick_interval,
            "Starting drivers"
        );

        let sound = tokio::spawn(run_sound_poller(
            store.clone(),
            config.sound_poll_interval,
        ));
        let tick = tokio::spawn(run_tick_driver(store, config.tick_interval));

        Self { sound, tick }
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Drivers {
    fn drop(&mut self) {
        self.sound.abort();
        self.tick.abort();
    }
}

async fn run_sound_poller(store: GameStore, period: Duration) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        store.check_sound().await;
    }
}

async fn run_tick_driver(store: GameStore, period: Duration) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last: Option<Instant> = None;

    loop {
        interval.tick().await;

        let now = Instant::now();
        let Some(previous) = last.replace(now) else {
            continue;
        };

        if !store.state().status.is_playing() {
            continue;
        }

        store.tick(now.duration_since(previous).as_secs_f64()).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::mock::MockBackend;
    use game_core::{GameSettings, GameStatus, GameVariant};

    fn config() -> DriverConfig {
        DriverConfig {
            sound_poll_interval: Duration::from_millis(100),
            tick_interval: Duration::from_millis(100),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tick_driver_is_silent_outside_play() {
        let backend = Arc::new(MockBackend::new());
        let store = GameStore::new(backend.clone());
        let drivers = Drivers::spawn(store.clone(), &config());

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.calls("tick"), 0);
        let polls = backend.calls("consume_sound");
        assert!(polls > 0);
        assert_eq!(backend.total_calls(), polls);

        drivers.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn tick_driver_advances_clock_while_playing() {
        let settings = GameSettings {
            start_level: 4,
            ..GameSettings::default()
        };
        let backend = Arc::new(MockBackend::with_settings(settings, 5));
        let store = GameStore::new(backend.clone());
        store.start_game(GameVariant::Numbers).await;

        let drivers = Drivers::spawn(store.clone(), &config());

        time::sleep(Duration::from_millis(2_050)).await;
        let ticks = backend.calls("tick");
        assert!(ticks >= 19, "expected about 20 ticks, got {ticks}");
        let elapsed = store.state().session.unwrap().level_elapsed_time;
        assert!((elapsed - 2.0).abs() < 0.15, "elapsed {elapsed}");

        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(
            store.state().status,
            GameStatus::Feedback {
                success: false,
                message: "Time's Up!".to_string()
            }
        );
        let ticks = backend.calls("tick");

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(backend.calls("tick"), ticks);

        drivers.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let backend = Arc::new(MockBackend::new());
        let store = GameStore::new(backend.clone());
        let drivers = Drivers::spawn(store, &config());

        time::sleep(Duration::from_millis(350)).await;
        drivers.shutdown();
        let polls = backend.calls("consume_sound");

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(backend.calls("consume_sound"), polls);
    }
}
