//! Application state.

use std::sync::Arc;
use std::time::Duration;

use growth_points_store::RocksStore;

use crate::config::ServiceConfig;
use crate::generation::{Generate, HttpGenerator};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger store.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Generation backend client (optional).
    pub generator: Option<Arc<dyn Generate>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let generator: Option<Arc<dyn Generate>> = config.genai_api_url.as_ref().map(|url| {
            tracing::info!(genai_url = %url, "Generation backend enabled");
            Arc::new(HttpGenerator::new(
                url,
                config.genai_api_key.clone(),
                Duration::from_secs(config.genai_timeout_seconds),
            )) as Arc<dyn Generate>
        });

        if generator.is_none() {
            tracing::warn!("Generation backend not configured - generate endpoint will fail");
        }

        Self {
            store,
            config,
            generator,
        }
    }

    /// Replace the generation backend (test seam).
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generate>) -> Self {
        self.generator = Some(generator);
        self
    }
}
