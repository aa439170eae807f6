use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::pipeline::{FilterRules, JobFilters, RankOptions};
use crate::matching::tokenizer::display_skills;
use crate::models::job::{JobListing, ScoredJob};
use crate::sources::{JobQuery, SourceKind};
use crate::state::AppState;
use crate::stats::SearchOutcome;

const MAX_RESULTS_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub skills: String,
    pub location: Option<String>,
    pub max_results: Option<usize>,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub freshers_only: bool,
    pub experience: Option<String>,
    #[serde(default)]
    pub explain: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub search_id: Uuid,
    pub matched_jobs: Vec<ScoredJob>,
    pub recommended_jobs: Vec<ScoredJob>,
    pub total_jobs_analyzed: usize,
    pub skills: Vec<String>,
    pub source: Option<SourceKind>,
    pub generated_at: DateTime<Utc>,
}

impl MatchResponse {
    fn empty() -> Self {
        Self {
            search_id: Uuid::new_v4(),
            matched_jobs: vec![],
            recommended_jobs: vec![],
            total_jobs_analyzed: 0,
            skills: vec![],
            source: None,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    #[serde(default)]
    pub skills: String,
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub entry_level: bool,
    pub experience: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobListing>,
    pub total: usize,
}

fn build_job_query(
    state: &AppState,
    skills: &str,
    location: Option<String>,
    max_results: usize,
) -> JobQuery {
    JobQuery {
        skills: skills.to_string(),
        location: location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| state.config.default_location.clone()),
        max_results,
    }
}

/// GET /api/match
pub async fn handle_match(
    State(state): State<AppState>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let skills = params.skills.trim();
    if skills.is_empty() {
        return Ok(Json(MatchResponse::empty()));
    }

    let max_results = params
        .max_results
        .unwrap_or(state.pipeline.config().max_results);
    if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
        return Err(AppError::Validation(format!(
            "max_results must be between 1 and {MAX_RESULTS_LIMIT}"
        )));
    }

    let query = build_job_query(&state, skills, params.location, max_results);
    let batch = state.source.fetch(&query).await?;

    let cap = match batch.kind {
        SourceKind::Synthetic => Some(state.pipeline.config().bucket_cap),
        SourceKind::Remote => None,
    };
    let options = RankOptions {
        filters: JobFilters {
            remote_only: params.remote_only,
            freshers_only: params.freshers_only,
            experience: params.experience,
            honor_remote_flag: state.pipeline.config().honor_remote_flag,
            rules: FilterRules::Search,
        },
        cap,
        explain: params.explain,
    };

    let ranked = state.pipeline.rank(&batch.jobs, skills, &options);
    let total_jobs_analyzed = batch.total_analyzed();
    if ranked.is_empty() {
        info!("No jobs found for '{skills}'");
    }

    info!(
        "Search '{}' via {:?}: {} matched, {} recommended of {} analyzed",
        skills,
        batch.kind,
        ranked.matched.len(),
        ranked.recommended.len(),
        total_jobs_analyzed
    );

    let outcome = SearchOutcome {
        jobs_shown: (ranked.matched.len() + ranked.recommended.len()) as u64,
        jobs_analyzed: total_jobs_analyzed as u64,
        match_accuracy: ranked.average_match_percentage(),
    };
    if let Err(e) = state.stats.record_search(outcome).await {
        warn!("Failed to record search stats: {e}");
    }

    Ok(Json(MatchResponse {
        search_id: Uuid::new_v4(),
        matched_jobs: ranked.matched,
        recommended_jobs: ranked.recommended,
        total_jobs_analyzed,
        skills: display_skills(skills),
        source: Some(batch.kind),
        generated_at: Utc::now(),
    }))
}

/// GET /api/jobs
/// Filtered listings without any scoring.
pub async fn handle_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let skills = params.skills.trim();
    if skills.is_empty() {
        return Ok(Json(JobsResponse {
            jobs: vec![],
            total: 0,
        }));
    }

    let query = build_job_query(
        &state,
        skills,
        params.location,
        state.pipeline.config().max_results,
    );
    let batch = state.source.fetch(&query).await?;

    let filters = JobFilters {
        remote_only: params.remote,
        freshers_only: params.entry_level,
        experience: params.experience,
        honor_remote_flag: state.pipeline.config().honor_remote_flag,
        rules: FilterRules::Listing,
    };
    let jobs: Vec<JobListing> = batch
        .jobs
        .into_iter()
        .filter(|job| filters.accepts(job))
        .collect();

    info!("Returning {} jobs for '{}' after filtering", jobs.len(), skills);
    Ok(Json(JobsResponse {
        total: jobs.len(),
        jobs,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::matching::pipeline::RankingPipeline;
    use crate::routes::build_router;
    use crate::sources::synthetic::SyntheticJobSource;
    use crate::stats::{MemoryStatsStore, StatsStore};

    fn test_state() -> (AppState, Arc<MemoryStatsStore>) {
        let stats = Arc::new(MemoryStatsStore::new(50_000));
        let state = AppState {
            config: Config::default(),
            pipeline: Arc::new(RankingPipeline::default()),
            source: Arc::new(SyntheticJobSource),
            stats: stats.clone(),
        };
        (state, stats)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        state: AppState,
        uri: &str,
    ) -> (StatusCode, T) {
        let response = build_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_match_ranks_synthetic_listings() {
        let (state, stats) = test_state();
        let (status, body): (_, MatchResponse) =
            get_json(state, "/api/match?skills=React%2C%20JavaScript%2C%20HTML").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.source, Some(SourceKind::Synthetic));
        assert_eq!(body.skills, vec!["React", "JavaScript", "HTML"]);
        assert_eq!(body.total_jobs_analyzed, 8);
        assert!(!body.matched_jobs.is_empty());
        assert!(body.matched_jobs.len() <= 4);
        assert!(body.recommended_jobs.len() <= 4);
        assert_eq!(body.matched_jobs[0].match_score, 1.0);

        let snap = stats.snapshot().await.unwrap();
        assert_eq!(snap.total_searches, 1);
        assert_eq!(
            snap.hires_made,
            (body.matched_jobs.len() + body.recommended_jobs.len()) as u64
        );
    }

    #[tokio::test]
    async fn test_match_with_blank_skills_is_empty_result() {
        let (state, stats) = test_state();
        let (status, body): (_, MatchResponse) = get_json(state, "/api/match?skills=%20%20").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.matched_jobs.is_empty());
        assert!(body.recommended_jobs.is_empty());
        assert_eq!(body.total_jobs_analyzed, 0);
        assert!(body.source.is_none());
        assert_eq!(stats.snapshot().await.unwrap().total_searches, 0);
    }

    #[tokio::test]
    async fn test_match_rejects_out_of_range_max_results() {
        let (state, _) = test_state();
        let (status, body): (_, serde_json::Value) =
            get_json(state, "/api/match?skills=python&max_results=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_remote_filter_drops_synthetic_listings() {
        // Synthetic listings are all on-site
        let (state, _) = test_state();
        let (status, body): (_, MatchResponse) =
            get_json(state, "/api/match?skills=python&remote_only=true").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.matched_jobs.is_empty());
        assert!(body.recommended_jobs.is_empty());
        assert_eq!(body.total_jobs_analyzed, 8);
    }

    #[tokio::test]
    async fn test_match_explain_includes_counters() {
        let (state, _) = test_state();
        let (_, body): (_, serde_json::Value) =
            get_json(state, "/api/match?skills=python&explain=true").await;
        let first = &body["matched_jobs"][0];
        assert!(first["explain"]["exact_matches"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn test_jobs_filters_by_experience() {
        let (state, _) = test_state();
        let (status, body): (_, JobsResponse) =
            get_json(state, "/api/jobs?skills=python&experience=3-5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.total, body.jobs.len());
        assert!(!body.jobs.is_empty());
        assert!(body.jobs.iter().all(|j| j.experience.contains('3')));
    }

    struct FixedSource(Vec<JobListing>);

    #[async_trait::async_trait]
    impl crate::sources::JobSource for FixedSource {
        async fn fetch(
            &self,
            _query: &JobQuery,
        ) -> Result<crate::sources::SourceBatch, crate::sources::SourceError> {
            Ok(crate::sources::SourceBatch {
                jobs: self.0.clone(),
                kind: SourceKind::Remote,
                total_found: None,
            })
        }

        fn kind(&self) -> SourceKind {
            SourceKind::Remote
        }
    }

    fn listing(title: &str, location: &str, experience: &str) -> JobListing {
        JobListing {
            title: title.to_string(),
            location: location.to_string(),
            experience: experience.to_string(),
            skills: vec!["Linux".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_jobs_entry_level_remote_keeps_fresher_work_from_home() {
        let (mut state, _) = test_state();
        state.source = Arc::new(FixedSource(vec![
            listing("Support Engineer", "Work From Home", "Fresher"),
            listing("Graduate Developer", "Remote", "Entry level"),
            listing("Site Engineer", "Pune, India", "Fresher"),
            listing("Senior Engineer", "Remote", "5-8 years"),
        ]));

        let (status, body): (_, JobsResponse) =
            get_json(state, "/api/jobs?skills=linux&remote=true&entry_level=true").await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Support Engineer", "Graduate Developer"]);
        assert_eq!(body.total, 2);
    }

    #[tokio::test]
    async fn test_match_filters_keep_search_rules() {
        let (mut state, _) = test_state();
        state.source = Arc::new(FixedSource(vec![listing(
            "Support Engineer",
            "Work From Home",
            "Fresher",
        )]));

        let (_, body): (_, MatchResponse) =
            get_json(state, "/api/match?skills=linux&remote_only=true").await;
        assert!(body.matched_jobs.is_empty());
    }

    #[tokio::test]
    async fn test_jobs_without_skills_is_empty() {
        let (state, _) = test_state();
        let (status, body): (_, JobsResponse) = get_json(state, "/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.total, 0);
    }
}
