use std::sync::Arc;

use crate::config::ServerConfig;
use crate::pipeline::ProjectOrchestrator;
use crate::storage::{SharedStore, SiteWorkspace};

/// Shared state handed to every handler via `State<AppState>`.
///
/// Cheap to clone; everything inside is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Accepts generation requests and owns the in-flight registry
    pub orchestrator: ProjectOrchestrator,
    pub store: SharedStore,
    pub workspace: SiteWorkspace,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(orchestrator: ProjectOrchestrator, config: ServerConfig) -> Self {
        Self {
            store: orchestrator.store().clone(),
            workspace: orchestrator.workspace().clone(),
            orchestrator,
            config: Arc::new(config),
        }
    }
}
