//! Adapter that reaches an engine host by message passing.
use async_trait::async_trait;
use game_core::{FrontendState, GameSettings, GameVariant, SoundEvent};
use runtime::{RuntimeHandle, commands};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::trace;

use super::{Backend, BackendKind};
use crate::error::{BackendError, Result};

/// Sends every call to the host as a named command with a JSON argument object.
#[derive(Clone, Debug)]
pub struct IpcBackend {
    handle: RuntimeHandle,
}

impl IpcBackend {
    pub fn new(handle: RuntimeHandle) -> Self {
        Self { handle }
    }

    async fn call<T: DeserializeOwned>(&self, command: &'static str, args: Value) -> Result<T> {
        trace!("invoke {}", command);

        let value = self
            .handle
            .invoke(command, args)
            .await
            .map_err(|err| BackendError::from_runtime(command, err))?;

        serde_json::from_value(value).map_err(|source| BackendError::Decode { command, source })
    }
}

#[async_trait]
impl Backend for IpcBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Ipc
    }

    async fn get_game_state(&self) -> Result<FrontendState> {
        self.call(commands::GET_GAME_STATE, json!({})).await
    }

    async fn get_settings(&self) -> Result<GameSettings> {
        self.call(commands::GET_SETTINGS, json!({})).await
    }

    async fn update_settings(&self, settings: GameSettings) -> Result<FrontendState> {
        self.call(
            commands::UPDATE_SETTINGS,
            json!({ (commands::ARG_SETTINGS): settings }),
        )
        .await
    }

    async fn go_to_settings(&self) -> Result<FrontendState> {
        self.call(commands::GO_TO_SETTINGS, json!({})).await
    }

    async fn start_new_game(&self, variant: GameVariant) -> Result<FrontendState> {
        self.call(
            commands::START_NEW_GAME,
            json!({ (commands::ARG_VARIANT): variant.to_string() }),
        )
        .await
    }

    async fn submit_answer(&self, answer: &str) -> Result<FrontendState> {
        let first: String = answer.chars().take(1).collect();
        self.call(commands::SUBMIT_ANSWER, json!({ (commands::ARG_ANSWER): first }))
            .await
    }

    async fn move_selection(&self, delta: i32) -> Result<FrontendState> {
        self.call(commands::MOVE_SELECTION, json!({ (commands::ARG_DELTA): delta }))
            .await
    }

    async fn submit_current_selection(&self) -> Result<FrontendState> {
        self.call(commands::SUBMIT_CURRENT_SELECTION, json!({})).await
    }

    async fn next_level(&self) -> Result<FrontendState> {
        self.call(commands::NEXT_LEVEL, json!({})).await
    }

    async fn reset_game(&self) -> Result<FrontendState> {
        self.call(commands::RESET_GAME, json!({})).await
    }

    async fn consume_sound(&self) -> Result<Option<SoundEvent>> {
        self.call(commands::CONSUME_SOUND, json!({})).await
    }

    async fn tick(&self, delta_seconds: f64) -> Result<FrontendState> {
        self.call(commands::TICK, json!({ (commands::ARG_DT_SECONDS): delta_seconds }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::GameStatus;
    use runtime::Runtime;

    #[tokio::test]
    async fn round_trips_through_a_running_host() {
        let runtime = Runtime::builder().build().await.unwrap();
        let backend = IpcBackend::new(runtime.handle());

        let state = backend.start_new_game(GameVariant::Letters).await.unwrap();
        let session = state.session.unwrap();
        assert_eq!(session.variant, GameVariant::Letters);
        assert!(session.options.contains(&session.target));

        let state = backend.submit_answer(&session.target).await.unwrap();
        assert!(matches!(
            state.status,
            GameStatus::Feedback { success: true, .. }
        ));

        assert_eq!(
            backend.consume_sound().await.unwrap(),
            Some(SoundEvent::PlaySuccess)
        );
        assert_eq!(backend.consume_sound().await.unwrap(), None);

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn selection_commands_reach_the_host() {
        let runtime = Runtime::builder().build().await.unwrap();
        let backend = IpcBackend::new(runtime.handle());

        let state = backend.start_new_game(GameVariant::Numbers).await.unwrap();
        let session = state.session.unwrap();
        let target_index = session
            .options
            .iter()
            .position(|option| *option == session.target)
            .unwrap();

        // Step backwards so the cursor has to wrap past the first option.
        let steps = target_index as i32 - session.options.len() as i32;
        let state = backend.move_selection(steps).await.unwrap();
        assert_eq!(state.session.unwrap().selected_index, target_index);

        let state = backend.submit_current_selection().await.unwrap();
        assert!(matches!(
            state.status,
            GameStatus::Feedback { success: true, .. }
        ));

        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn stopped_host_reports_host_closed() {
        let runtime = Runtime::builder().build().await.unwrap();
        let backend = IpcBackend::new(runtime.handle());
        runtime.shutdown().await.unwrap();

        let err = backend.get_game_state().await.unwrap_err();
        assert!(matches!(err, BackendError::HostClosed));
    }
}
