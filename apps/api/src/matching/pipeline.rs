//! Ranking Pipeline: filter, score, partition, sort and cap one batch of
//! candidate listings.
//!
//! A candidate lands in at most one bucket: `matched` when its relevance
//! score clears `match_threshold`, otherwise `recommended` when its cluster
//! score clears `recommend_threshold`, otherwise it is dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::recommender::ClusterRecommender;
use crate::matching::relevance::RelevanceScorer;
use crate::models::job::{JobListing, RankedJobs, ScoredJob};

/// Thresholds and caps for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Relevance score a job must exceed to be a direct match.
    pub match_threshold: f64,
    /// Cluster score a non-matched job must exceed to be recommended.
    pub recommend_threshold: f64,
    /// Per-bucket cap applied to locally generated listings.
    pub bucket_cap: usize,
    /// Default `max_results` requested from an upstream source.
    pub max_results: usize,
    /// Copied into every request's [`JobFilters::honor_remote_flag`].
    pub honor_remote_flag: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.3,
            recommend_threshold: 0.2,
            bucket_cap: 4,
            max_results: 30,
            honor_remote_flag: false,
        }
    }
}

/// Which predicate set a [`JobFilters`] applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRules {
    /// Used when ranking a search.
    #[default]
    Search,
    /// Used by the plain listing endpoint. Also treats "work from home" as
    /// remote and "fresher", "entry" or "0-1" as entry level.
    Listing,
}

/// Listing predicates applied before any scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilters {
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub freshers_only: bool,
    /// Experience band such as "2-4"; only the lower bound is compared.
    #[serde(default)]
    pub experience: Option<String>,
    /// Let a listing's `remote: true` flag satisfy `remote_only` even when
    /// its location says nothing about remote work.
    #[serde(default)]
    pub honor_remote_flag: bool,
    #[serde(default)]
    pub rules: FilterRules,
}

impl JobFilters {
    pub fn is_empty(&self) -> bool {
        !self.remote_only && !self.freshers_only && self.experience_floor().is_none()
    }

    pub fn accepts(&self, job: &JobListing) -> bool {
        if self.remote_only && !self.is_remote(job) {
            return false;
        }

        if self.freshers_only && !self.is_entry_level(job) {
            return false;
        }

        // The listing rules also accept the band with its dash spaced out
        // ("3 5"), which always contains the lower bound as well.
        if let Some(floor) = self.experience_floor() {
            if !job.experience.to_lowercase().contains(&floor) {
                return false;
            }
        }

        true
    }

    fn is_remote(&self, job: &JobListing) -> bool {
        if self.honor_remote_flag && job.remote == Some(true) {
            return true;
        }
        let location = job.location.to_lowercase();
        match self.rules {
            FilterRules::Search => location.contains("remote"),
            FilterRules::Listing => {
                location.contains("remote") || location.contains("work from home")
            }
        }
    }

    fn is_entry_level(&self, job: &JobListing) -> bool {
        match self.rules {
            FilterRules::Search => job.experience.contains("0-") || job.experience.contains("1-"),
            FilterRules::Listing => {
                let experience = job.experience.to_lowercase();
                experience.contains("0-1")
                    || experience.contains("fresher")
                    || experience.contains("entry")
            }
        }
    }

    /// Part of the band before the first '-', lower-cased. `None` for blank bands.
    fn experience_floor(&self) -> Option<String> {
        let band = self.experience.as_deref()?.trim();
        if band.is_empty() {
            return None;
        }
        let floor = band.split('-').next().unwrap_or(band).trim();
        if floor.is_empty() {
            None
        } else {
            Some(floor.to_lowercase())
        }
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    pub filters: JobFilters,
    /// Per-bucket cap. `None` keeps every qualifying job.
    pub cap: Option<usize>,
    /// Attach relevance counters to every scored job.
    pub explain: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RankingPipeline {
    relevance: RelevanceScorer,
    recommender: ClusterRecommender,
    config: RankingConfig,
}

impl RankingPipeline {
    pub fn new(
        relevance: RelevanceScorer,
        recommender: ClusterRecommender,
        config: RankingConfig,
    ) -> Self {
        Self {
            relevance,
            recommender,
            config,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Ranks `candidates` against the user's skill text. Single pass, no I/O.
    pub fn rank(
        &self,
        candidates: &[JobListing],
        user_text: &str,
        options: &RankOptions,
    ) -> RankedJobs {
        let mut matched = Vec::new();
        let mut recommended = Vec::new();

        if !options.filters.is_empty() {
            debug!("Applying filters {:?}", options.filters);
        }

        for job in candidates.iter().filter(|j| options.filters.accepts(j)) {
            let breakdown = self.relevance.explain(user_text, &job.skills);

            let mut scored = ScoredJob::new(job.clone(), breakdown.score);
            if options.explain {
                scored.explain = Some(breakdown);
            }

            if breakdown.score > self.config.match_threshold {
                matched.push(scored);
                continue;
            }

            let recommendation = self.recommender.score(user_text, &job.skills);
            if recommendation > self.config.recommend_threshold {
                scored.recommendation_score = Some(recommendation);
                recommended.push(scored);
            }
        }

        // sort_by is stable: ties keep input order
        matched.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        recommended.sort_by(|a, b| {
            let a = a.recommendation_score.unwrap_or_default();
            let b = b.recommendation_score.unwrap_or_default();
            b.total_cmp(&a)
        });

        if let Some(cap) = options.cap {
            matched.truncate(cap);
            recommended.truncate(cap);
        }

        debug!(
            "Ranked {} candidates: {} matched, {} recommended",
            candidates.len(),
            matched.len(),
            recommended.len()
        );

        RankedJobs {
            matched,
            recommended,
            total_considered: candidates.len(),
        }
    }
}
