use std::sync::Arc;

use crate::config::Config;
use crate::matching::pipeline::RankingPipeline;
use crate::sources::JobSource;
use crate::stats::StatsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<RankingPipeline>,
    /// Pluggable job source. Synthetic by default; remote with fallback when
    /// `MATCH_API_URL` is set.
    pub source: Arc<dyn JobSource>,
    /// In-memory by default; Redis-backed when `REDIS_URL` is set.
    pub stats: Arc<dyn StatsStore>,
}
