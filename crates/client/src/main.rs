//! LetterLanders client binary.
//!
//! Composition root: loads configuration, sets up logging, optionally starts
//! an engine host in-process (the way a desktop shell would expose one),
//! builds the application context over whichever backend that leaves
//! available, and hands control to the terminal frontend.
//!
//! # Examples
//!
//! ```bash
//! # Engine in-process, settings in the platform config dir
//! cargo run -p letterlanders-client
//!
//! # Engine behind a host, settings kept in memory
//! LETTERLANDERS_HOST=true LETTERLANDERS_SETTINGS_PATH=memory cargo run -p letterlanders-client
//! ```

use anyhow::Result;
use client_core::{AppContext, ClientConfig};
use letterlanders_client::{Client, LineFrontend, logging, start_host};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging
    logging::setup_logging(&config.session_id)?;

    tracing::info!("Starting LetterLanders client");
    tracing::info!("Settings: {:?}", config.settings);
    tracing::info!("Engine host: {}", config.host);

    // 3. Optional engine host, installed before backend selection
    let host = if config.host {
        Some(start_host(&config.settings).await?)
    } else {
        None
    };

    // 4. Store and drivers over the selected backend
    let context = AppContext::initialize(&config).await;

    // 5. Frontend
    let frontend = LineFrontend::new(tokio::io::stdin(), tokio::io::stdout());

    let client = Client::builder()
        .context(context)
        .frontend(frontend)
        .host(host)
        .build()?;

    tracing::info!("Client assembled, starting...");
    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
