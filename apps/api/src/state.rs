use std::sync::Arc;

use crate::assessment::gateway::AiGateway;
use crate::config::Config;
use crate::store::{AssessmentStore, ProfileStore};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Stores and the generation client sit behind trait objects so tests
/// can substitute in-memory fakes without touching handler code.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub assessments: Arc<dyn AssessmentStore>,
    pub gateway: AiGateway,
    #[allow(dead_code)]
    pub config: Config,
}
