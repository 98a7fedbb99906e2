//! Top-level client assembling the engine host, store and frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ Runtime (optional engine host, reached over its command channel)
//!   ├─→ AppContext (store + drivers over the selected backend)
//!   └─→ Frontend (UI layer, talks to the store only)
//! ```

mod builder;
pub mod line;
pub mod logging;

pub use builder::ClientBuilder;
pub use client_core::Frontend;
pub use line::LineFrontend;

use anyhow::{Context, Result};
use client_core::{AppContext, SettingsLocation};
use runtime::Runtime;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` receives independently built layers
/// 2. `Client::run()` transfers control to the frontend until the user quits
/// 3. Drivers are stopped, then the engine host (if any)
pub struct Client {
    context: AppContext,
    frontend: Box<dyn Frontend>,
    host: Option<Runtime>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub async fn run(self) -> Result<()> {
        let store = self.context.store().clone();

        let mut frontend = self.frontend;
        let frontend_result = frontend.run(store).await;

        self.context.shutdown();

        if let Some(host) = self.host {
            host.shutdown()
                .await
                .context("Failed to stop the engine host")?;
        }

        frontend_result
    }
}

/// Starts an engine host in this process and installs it as the
/// process-wide host, so backend selection picks the IPC transport.
pub async fn start_host(settings: &SettingsLocation) -> Result<Runtime> {
    let repository = settings
        .open()
        .context("Failed to open the settings repository")?;

    let host = Runtime::builder()
        .repository(repository)
        .build()
        .await
        .context("Failed to start the engine host")?;

    if !runtime::install_host(host.handle()) {
        tracing::warn!("An engine host was already installed; the new one stays private");
    }

    Ok(host)
}
