//! Application state: resolved config and the memoized dispatcher.

use std::sync::OnceLock;

use reverseai_core::llm::API_KEY_ENV;
use reverseai_core::{Dispatcher, GeminiClient};

use crate::config::ServeConfig;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    pub(crate) config: ServeConfig,
    /// Built on first dispatch and reused for the rest of the process.
    dispatcher: OnceLock<Dispatcher>,
}

impl AppState {
    pub(crate) fn new(config: ServeConfig) -> Self {
        Self {
            config,
            dispatcher: OnceLock::new(),
        }
    }

    /// State with a pre-built dispatcher (tests inject mock clients here).
    #[cfg(test)]
    pub(crate) fn with_dispatcher(config: ServeConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: OnceLock::from(dispatcher),
        }
    }

    /// The process-wide dispatcher, creating the Gemini client on first use.
    ///
    /// The credential is read once here; later calls never reconfigure it.
    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        self.dispatcher.get_or_init(|| {
            let client = GeminiClient::with_timeout(
                std::env::var(API_KEY_ENV).ok(),
                self.config.model.clone(),
                self.config.request_timeout,
            )
            .with_base_url(self.config.api_base.clone());

            if client.has_credential() {
                tracing::info!(model = %client.model(), "Gemini client initialized");
            } else {
                tracing::warn!(
                    "{} is not set; decode requests will return an error",
                    API_KEY_ENV
                );
            }
            Dispatcher::new(Box::new(client))
        })
    }

    pub(crate) fn dispatcher_initialized(&self) -> bool {
        self.dispatcher.get().is_some()
    }
}
