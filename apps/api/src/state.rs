use std::sync::Arc;

use crate::enrichment::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless between runs; every request drives its own state machine.
    pub orchestrator: Arc<Orchestrator>,
}
