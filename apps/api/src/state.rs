use std::sync::Arc;

use crate::ranking::ranker::RankingService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Ranking engine with its lexical and semantic backends, built once at startup.
    pub ranker: Arc<RankingService>,
}
