//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;

use crate::store::GameStore;

/// Frontend abstraction for UI layers.
///
/// Frontends render from the store's snapshots and forward user intents to
/// its operations. They never talk to a backend directly.
///
/// # Example Implementation
///
/// ```no_run
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use client_core::{Frontend, GameStore};
///
/// struct MyFrontend;
///
/// #[async_trait]
/// impl Frontend for MyFrontend {
///     async fn run(&mut self, store: GameStore) -> Result<()> {
///         let mut states = store.subscribe_state();
///         while states.changed().await.is_ok() {
///             // Render the latest snapshot.
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend until the user quits.
    async fn run(&mut self, store: GameStore) -> Result<()>;
}
