//! Environment detection and the process-wide adapter.
use std::sync::Arc;

use runtime::RuntimeHandle;
use tokio::sync::OnceCell;
use tracing::info;

use super::{Backend, IpcBackend, LocalBackend};
use crate::config::SettingsLocation;

static BACKEND: OnceCell<Arc<dyn Backend>> = OnceCell::const_new();

/// Where the engine lives, as seen from this process.
#[derive(Clone, Debug)]
pub enum Environment {
    /// An engine host was installed; talk to it by message passing.
    Host(RuntimeHandle),
    /// No host; run the engine in this process.
    InProcess,
}

/// Inspects the installed-host marker.
pub fn detect_environment() -> Environment {
    match runtime::installed_host() {
        Some(handle) if !handle.is_closed() => Environment::Host(handle),
        _ => Environment::InProcess,
    }
}

/// Builds a fresh adapter for the current environment.
///
/// Not memoized. Application code goes through [`backend`].
pub fn create_backend(settings: &SettingsLocation) -> Arc<dyn Backend> {
    match detect_environment() {
        Environment::Host(handle) => {
            info!("Engine host detected, using IPC backend");
            Arc::new(IpcBackend::new(handle))
        }
        Environment::InProcess => {
            info!("No engine host, using local backend");
            Arc::new(LocalBackend::new(settings.clone()))
        }
    }
}

/// The process-wide adapter, selected on first call and never re-selected.
///
/// Concurrent first callers share one construction. `settings` only matters
/// to the first call that ends up running the selection.
pub async fn backend(settings: &SettingsLocation) -> Arc<dyn Backend> {
    BACKEND
        .get_or_init(|| async move { create_backend(settings) })
        .await
        .clone()
}
