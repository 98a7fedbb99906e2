//! Client builder with dependency injection pattern.

use anyhow::{Context, Result};
use client_core::AppContext;
use runtime::Runtime;

use crate::{Client, Frontend};

/// Builder for constructing a Client with proper validation.
///
/// Context and frontend are required. An engine host is optional and only
/// present when this process serves the engine itself.
#[derive(Default)]
pub struct ClientBuilder {
    context: Option<AppContext>,
    frontend: Option<Box<dyn Frontend>>,
    host: Option<Runtime>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application context (required).
    pub fn context(mut self, context: AppContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Hand over an engine host to stop when the frontend exits.
    pub fn host(mut self, host: Option<Runtime>) -> Self {
        self.host = host;
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the context or the frontend is not set.
    pub fn build(self) -> Result<Client> {
        let context = self
            .context
            .context("AppContext is required. Use .context() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client {
            context,
            frontend,
            host: self.host,
        })
    }
}
