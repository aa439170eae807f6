//! Search statistics: cosmetic counters shown on the landing page.
//!
//! Nothing here is authoritative. `MemoryStatsStore` is the default;
//! `RedisStatsStore` keeps the counters across restarts when `REDIS_URL`
//! is configured.

pub mod handlers;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// Shown as match accuracy before any search has been recorded.
pub const DEFAULT_MATCH_ACCURACY: f64 = 95.0;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// What one search contributes to the counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// Jobs shown across both buckets.
    pub jobs_shown: u64,
    /// Jobs the source looked at.
    pub jobs_analyzed: u64,
    /// Mean match percentage of the matched bucket.
    pub match_accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub active_jobs: u64,
    pub hires_made: u64,
    pub match_accuracy: f64,
    pub total_searches: u64,
    pub average_match_accuracy: f64,
}

/// Raw persisted counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Counters {
    total_searches: u64,
    successful_matches: u64,
    jobs_analyzed: u64,
    accuracy_sum: f64,
    last_accuracy: Option<f64>,
}

impl Counters {
    fn apply(&mut self, outcome: &SearchOutcome) {
        self.total_searches += 1;
        self.successful_matches += outcome.jobs_shown;
        self.jobs_analyzed += outcome.jobs_analyzed;
        self.accuracy_sum += outcome.match_accuracy;
        self.last_accuracy = Some(outcome.match_accuracy);
    }

    fn snapshot(&self, active_jobs_baseline: u64) -> StatsSnapshot {
        let average = if self.total_searches > 0 {
            self.accuracy_sum / self.total_searches as f64
        } else {
            0.0
        };
        StatsSnapshot {
            active_jobs: active_jobs_baseline + self.jobs_analyzed,
            hires_made: self.successful_matches,
            // A last accuracy of 0 reads as "no data"
            match_accuracy: self
                .last_accuracy
                .filter(|a| *a > 0.0)
                .unwrap_or(DEFAULT_MATCH_ACCURACY),
            total_searches: self.total_searches,
            average_match_accuracy: average,
        }
    }
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Records a search. Searches that showed no jobs are ignored.
    async fn record_search(&self, outcome: SearchOutcome) -> Result<(), StatsError>;

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

pub struct MemoryStatsStore {
    counters: RwLock<Counters>,
    active_jobs_baseline: u64,
}

impl MemoryStatsStore {
    pub fn new(active_jobs_baseline: u64) -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
            active_jobs_baseline,
        }
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn record_search(&self, outcome: SearchOutcome) -> Result<(), StatsError> {
        if outcome.jobs_shown == 0 {
            return Ok(());
        }
        self.counters.write().await.apply(&outcome);
        Ok(())
    }

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError> {
        Ok(self.counters.read().await.snapshot(self.active_jobs_baseline))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis store
// ────────────────────────────────────────────────────────────────────────────

const KEY_SEARCHES: &str = "jobmatch:stats:total_searches";
const KEY_MATCHES: &str = "jobmatch:stats:successful_matches";
const KEY_ANALYZED: &str = "jobmatch:stats:jobs_analyzed";
const KEY_ACCURACY_SUM: &str = "jobmatch:stats:accuracy_sum";
const KEY_LAST_ACCURACY: &str = "jobmatch:stats:last_accuracy";

/// Values of the five stats keys, in `MGET` order.
type StatsRow = (Option<u64>, Option<u64>, Option<u64>, Option<f64>, Option<f64>);

const STATS_KEYS: [&str; 5] = [
    KEY_SEARCHES,
    KEY_MATCHES,
    KEY_ANALYZED,
    KEY_ACCURACY_SUM,
    KEY_LAST_ACCURACY,
];

/// One MULTI/EXEC transaction applying `outcome` to the counters.
fn record_pipeline(outcome: &SearchOutcome) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .incr(KEY_SEARCHES, 1_u64)
        .ignore()
        .incr(KEY_MATCHES, outcome.jobs_shown)
        .ignore()
        .incr(KEY_ANALYZED, outcome.jobs_analyzed)
        .ignore()
        .incr(KEY_ACCURACY_SUM, outcome.match_accuracy)
        .ignore()
        .set(KEY_LAST_ACCURACY, outcome.match_accuracy)
        .ignore();
    pipe
}

fn counters_from_row(row: StatsRow) -> Counters {
    let (searches, matches, analyzed, accuracy_sum, last) = row;
    Counters {
        total_searches: searches.unwrap_or_default(),
        successful_matches: matches.unwrap_or_default(),
        jobs_analyzed: analyzed.unwrap_or_default(),
        accuracy_sum: accuracy_sum.unwrap_or_default(),
        last_accuracy: last,
    }
}

pub struct RedisStatsStore {
    client: redis::Client,
    active_jobs_baseline: u64,
}

impl RedisStatsStore {
    pub fn new(client: redis::Client, active_jobs_baseline: u64) -> Self {
        Self {
            client,
            active_jobs_baseline,
        }
    }
}

#[async_trait]
impl StatsStore for RedisStatsStore {
    async fn record_search(&self, outcome: SearchOutcome) -> Result<(), StatsError> {
        if outcome.jobs_shown == 0 {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        record_pipeline(&outcome)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let row: StatsRow = conn.mget(STATS_KEYS.to_vec()).await?;
        Ok(counters_from_row(row).snapshot(self.active_jobs_baseline))
    }
}
