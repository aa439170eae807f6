//! Remote job source: pulls candidate listings from an upstream job
//! matching API. The upstream already applies `max_results`, so buckets
//! built from this source are left uncapped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::job::JobListing;
use crate::sources::{JobQuery, JobSource, SourceBatch, SourceError, SourceKind};

/// Upstream response body. Every list is optional; all of them are
/// candidates as far as ranking is concerned.
#[derive(Debug, Default, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    matched_jobs: Vec<JobListing>,
    #[serde(default)]
    recommended_jobs: Vec<JobListing>,
    #[serde(default)]
    jobs: Vec<JobListing>,
    #[serde(default)]
    total_jobs_found: Option<usize>,
    #[serde(default)]
    total_jobs_analyzed: Option<usize>,
}

impl UpstreamResponse {
    fn into_batch(self) -> SourceBatch {
        let total_found = self.total_jobs_found.or(self.total_jobs_analyzed);
        let mut jobs = self.matched_jobs;
        jobs.extend(self.recommended_jobs);
        jobs.extend(self.jobs);
        SourceBatch {
            jobs,
            kind: SourceKind::Remote,
            total_found,
        }
    }
}

#[derive(Clone)]
pub struct RemoteJobSource {
    client: Client,
    base_url: String,
}

impl RemoteJobSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn match_url(&self) -> String {
        format!("{}/match", self.base_url)
    }
}

#[async_trait]
impl JobSource for RemoteJobSource {
    async fn fetch(&self, query: &JobQuery) -> Result<SourceBatch, SourceError> {
        let max_results = query.max_results.to_string();
        info!(
            "Fetching upstream jobs for '{}' in '{}'",
            query.skills, query.location
        );

        let response = self
            .client
            .get(self.match_url())
            .query(&[
                ("skills", query.skills.as_str()),
                ("location", query.location.as_str()),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: UpstreamResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;
        let batch = parsed.into_batch();

        debug!("Upstream returned {} listings", batch.jobs.len());
        Ok(batch)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn query() -> JobQuery {
        JobQuery {
            skills: "React, Node".to_string(),
            location: "India".to_string(),
            max_results: 30,
        }
    }

    #[test]
    fn test_upstream_lists_are_concatenated() {
        let parsed: UpstreamResponse = serde_json::from_value(json!({
            "matched_jobs": [{"title": "A", "skills": ["React"]}],
            "recommended_jobs": [{"title": "B"}],
            "total_jobs_analyzed": 42
        }))
        .unwrap();
        let batch = parsed.into_batch();
        let titles: Vec<&str> = batch.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(batch.total_found, Some(42));
        assert!(batch.jobs[1].skills.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_parses_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/match")
                    .query_param("skills", "React, Node")
                    .query_param("location", "India")
                    .query_param("max_results", "30");
                then.status(200).json_body(json!({
                    "jobs": [
                        {
                            "title": "Full Stack Developer",
                            "company": "Acme",
                            "skills": ["React", "Node.js"],
                            "remote": true
                        }
                    ],
                    "total_jobs_found": 57
                }));
            })
            .await;

        let source = RemoteJobSource::new(&server.url("/api/"), Duration::from_secs(5)).unwrap();
        let batch = source.fetch(&query()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(batch.kind, SourceKind::Remote);
        assert_eq!(batch.jobs.len(), 1);
        assert_eq!(batch.jobs[0].remote, Some(true));
        assert_eq!(batch.total_analyzed(), 57);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/match");
                then.status(502).body("bad gateway");
            })
            .await;

        let source = RemoteJobSource::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        match source.fetch(&query()).await {
            Err(SourceError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/match");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let source = RemoteJobSource::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = source.fetch(&query()).await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
