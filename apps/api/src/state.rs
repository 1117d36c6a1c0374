use std::sync::Arc;

use crate::analysis::orchestrator::AnalysisOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless between calls; shared by every in-flight request.
    pub analyzer: Arc<AnalysisOrchestrator>,
}
