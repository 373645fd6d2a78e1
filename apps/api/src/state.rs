use std::sync::Arc;

use crate::llm_client::ChatModel;
use crate::providers::JobSource;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data: résumés and results live only for one request.
#[derive(Clone)]
pub struct AppState {
    /// Upstream job boards. Tests inject a scripted source.
    pub jobs: Arc<dyn JobSource>,
    /// Chat model used for filter generation and rating. Tests inject a fake.
    pub llm: Arc<dyn ChatModel>,
}
