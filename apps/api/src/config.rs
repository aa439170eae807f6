use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::pipeline::RankingConfig;

/// Application configuration loaded from environment variables.
/// Nothing is required: without `MATCH_API_URL` the service ranks
/// synthetic listings, and without `REDIS_URL` stats stay in memory.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the upstream job matching API, e.g. `http://localhost:9000/api`.
    pub match_api_url: Option<String>,
    pub match_api_timeout_secs: u64,
    pub default_location: String,
    pub redis_url: Option<String>,
    pub ranking: RankingConfig,
    /// JSON file replacing the built-in cluster/semantic tables.
    pub taxonomy_path: Option<PathBuf>,
    pub strict_term_matching: bool,
    pub active_jobs_baseline: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            rust_log: "info".to_string(),
            match_api_url: None,
            match_api_timeout_secs: 120,
            default_location: "India".to_string(),
            redis_url: None,
            ranking: RankingConfig::default(),
            taxonomy_path: None,
            strict_term_matching: false,
            active_jobs_baseline: 50_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();
        let ranking = RankingConfig {
            match_threshold: parse_or(&get, "MATCH_THRESHOLD", defaults.ranking.match_threshold)?,
            recommend_threshold: parse_or(
                &get,
                "RECOMMEND_THRESHOLD",
                defaults.ranking.recommend_threshold,
            )?,
            bucket_cap: parse_or(&get, "RESULTS_PER_BUCKET", defaults.ranking.bucket_cap)?,
            max_results: parse_or(&get, "MAX_RESULTS", defaults.ranking.max_results)?,
            honor_remote_flag: parse_or(
                &get,
                "HONOR_REMOTE_FLAG",
                defaults.ranking.honor_remote_flag,
            )?,
        };

        Ok(Config {
            port: parse_or(&get, "PORT", defaults.port)?,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
            match_api_url: get("MATCH_API_URL"),
            match_api_timeout_secs: parse_or(
                &get,
                "MATCH_API_TIMEOUT_SECS",
                defaults.match_api_timeout_secs,
            )?,
            default_location: get("DEFAULT_LOCATION").unwrap_or(defaults.default_location),
            redis_url: get("REDIS_URL"),
            ranking,
            taxonomy_path: get("TAXONOMY_PATH").map(PathBuf::from),
            strict_term_matching: parse_or(
                &get,
                "STRICT_TERM_MATCHING",
                defaults.strict_term_matching,
            )?,
            active_jobs_baseline: parse_or(
                &get,
                "ACTIVE_JOBS_BASELINE",
                defaults.active_jobs_baseline,
            )?,
        })
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
