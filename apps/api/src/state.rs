use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analysis::ids::IdAllocator;
use crate::collection::CollectionController;
use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Production: `LlmClient`. Tests swap in a canned backend.
    pub llm: Arc<dyn CompletionBackend>,
    pub ids: Arc<dyn IdAllocator>,
    /// The single session's candidates. Never locked across a remote call.
    pub collection: Arc<RwLock<CollectionController>>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn CompletionBackend>,
        ids: Arc<dyn IdAllocator>,
        config: Config,
    ) -> Self {
        Self {
            llm,
            ids,
            collection: Arc::new(RwLock::new(CollectionController::new())),
            config,
        }
    }
}
