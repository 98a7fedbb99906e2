//! Composition point for the client-side pieces.
use std::sync::Arc;

use tracing::info;

use crate::backend::{self, Backend};
use crate::config::{ClientConfig, DriverConfig};
use crate::drivers::Drivers;
use crate::store::GameStore;

/// The store together with the drivers feeding it.
///
/// This is the only place a [`GameStore`] is created for the application;
/// everything else receives a clone of [`AppContext::store`].
pub struct AppContext {
    store: GameStore,
    drivers: Drivers,
}

impl AppContext {
    /// Selects the process-wide backend, then builds and primes the store.
    pub async fn initialize(config: &ClientConfig) -> Self {
        let backend = backend::backend(&config.settings).await;
        Self::with_backend(backend, &config.drivers).await
    }

    /// Same as [`AppContext::initialize`] with an explicit backend.
    pub async fn with_backend(backend: Arc<dyn Backend>, drivers: &DriverConfig) -> Self {
        info!("Initializing client context ({} backend)", backend.kind());

        let store = GameStore::new(backend);
        store.sync_state().await;
        store.load_settings().await;

        let drivers = Drivers::spawn(store.clone(), drivers);

        Self { store, drivers }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Stops the drivers. The store stays usable through existing clones.
    pub fn shutdown(self) {
        self.drivers.shutdown();
        info!("Client context shut down");
    }
}
