mod config;
mod errors;
mod matching;
mod models;
mod routes;
mod sources;
mod state;
mod stats;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::pipeline::RankingPipeline;
use crate::matching::recommender::ClusterRecommender;
use crate::matching::relevance::RelevanceScorer;
use crate::matching::taxonomy::{MatchingTables, TermMatching};
use crate::routes::build_router;
use crate::sources::remote::RemoteJobSource;
use crate::sources::synthetic::SyntheticJobSource;
use crate::sources::{FallbackJobSource, JobSource};
use crate::state::AppState;
use crate::stats::{MemoryStatsStore, RedisStatsStore, StatsStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Matching API v{}", env!("CARGO_PKG_VERSION"));

    // Matching tables: built-in unless TAXONOMY_PATH overrides them
    let tables = match &config.taxonomy_path {
        Some(path) => {
            info!("Loading matching tables from {}", path.display());
            MatchingTables::from_json_file(path)?
        }
        None => MatchingTables::default(),
    };
    let term_matching = if config.strict_term_matching {
        TermMatching::WholeWord
    } else {
        TermMatching::Substring
    };
    info!(
        "Matching tables: {} clusters, {} semantic pairs ({:?} matching)",
        tables.clusters.clusters.len(),
        tables.semantic_pairs.pairs.len(),
        term_matching
    );

    let pipeline = RankingPipeline::new(
        RelevanceScorer,
        ClusterRecommender::new(Arc::new(tables), term_matching),
        config.ranking.clone(),
    );

    let source = build_job_source(&config)?;
    info!("Job source: {:?}", source.kind());

    let stats = build_stats_store(&config)?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
        source,
        stats,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Synthetic listings only, or the upstream API with synthetic fallback.
fn build_job_source(config: &Config) -> Result<Arc<dyn JobSource>> {
    let synthetic: Arc<dyn JobSource> = Arc::new(SyntheticJobSource);
    match &config.match_api_url {
        Some(url) => {
            let remote = RemoteJobSource::new(
                url,
                Duration::from_secs(config.match_api_timeout_secs),
            )?;
            info!("Upstream job API: {url}");
            Ok(Arc::new(FallbackJobSource::new(Arc::new(remote), synthetic)))
        }
        None => Ok(synthetic),
    }
}

fn build_stats_store(config: &Config) -> Result<Arc<dyn StatsStore>> {
    match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis stats store initialized");
            Ok(Arc::new(RedisStatsStore::new(
                client,
                config.active_jobs_baseline,
            )))
        }
        None => {
            info!("In-memory stats store initialized");
            Ok(Arc::new(MemoryStatsStore::new(config.active_jobs_baseline)))
        }
    }
}
