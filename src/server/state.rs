use crate::catalog::{PollCatalog, PollSource};
use crate::engine::AggregationEngine;
use crate::error::ConfigError;
use crate::selection::ActiveSelectionStore;
use log::error;
use std::sync::Arc;

/// Process-wide state shared by every request.
pub struct AppState {
    pub source: Arc<dyn PollSource>,
    pub selections: ActiveSelectionStore,
    pub engine: AggregationEngine,
}

impl AppState {
    pub fn new(source: Arc<dyn PollSource>) -> Arc<Self> {
        Arc::new(Self {
            source,
            selections: ActiveSelectionStore::new(),
            engine: AggregationEngine::new(),
        })
    }

    /// Fresh catalog for this request. Failures are logged here and not retried.
    pub async fn catalog(&self) -> Result<PollCatalog, ConfigError> {
        self.source.load().await.inspect_err(|e| {
            error!("Failed to load poll catalog: {}", e);
        })
    }
}
