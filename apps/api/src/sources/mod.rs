//! Job sources: where candidate listings come from.
//!
//! Default: `SyntheticJobSource` (local templates, deterministic).
//! With `MATCH_API_URL` set: `FallbackJobSource` wrapping `RemoteJobSource`,
//! which falls back to the synthetic listings when the upstream fails.
//!
//! `AppState` holds an `Arc<dyn JobSource>`, chosen at startup via config.

pub mod remote;
pub mod synthetic;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::job::JobListing;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Where a batch of listings came from. Drives the pipeline's bucket cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Remote,
    Synthetic,
}

#[derive(Debug, Clone)]
pub struct JobQuery {
    pub skills: String,
    pub location: String,
    pub max_results: usize,
}

#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub jobs: Vec<JobListing>,
    pub kind: SourceKind,
    /// Upstream's own count of jobs it looked at, when it reports one.
    pub total_found: Option<usize>,
}

impl SourceBatch {
    /// Count shown to the user as "jobs analyzed".
    pub fn total_analyzed(&self) -> usize {
        self.total_found.unwrap_or(self.jobs.len())
    }
}

#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self, query: &JobQuery) -> Result<SourceBatch, SourceError>;

    fn kind(&self) -> SourceKind;
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackJobSource
// ────────────────────────────────────────────────────────────────────────────

/// Serves `primary`, or `fallback` whenever `primary` errors.
pub struct FallbackJobSource {
    primary: Arc<dyn JobSource>,
    fallback: Arc<dyn JobSource>,
}

impl FallbackJobSource {
    pub fn new(primary: Arc<dyn JobSource>, fallback: Arc<dyn JobSource>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl JobSource for FallbackJobSource {
    async fn fetch(&self, query: &JobQuery) -> Result<SourceBatch, SourceError> {
        match self.primary.fetch(query).await {
            Ok(batch) => Ok(batch),
            Err(e) => {
                warn!("Primary job source failed, using fallback listings: {e}");
                self.fallback.fetch(query).await
            }
        }
    }

    fn kind(&self) -> SourceKind {
        self.primary.kind()
    }
}
