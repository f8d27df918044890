use std::sync::Arc;

use crate::proposal::pipeline::ProposalPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Transcript → record → document pipeline. Holds the model client,
    /// the default tables and the issuer details.
    pub pipeline: Arc<ProposalPipeline>,
}
