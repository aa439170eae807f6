use serde::{Deserialize, Deserializer, Serialize};

/// A job posting as delivered by a job source. Skills are free text and are
/// only normalized by the scorers when read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    /// Experience band, e.g. "2-4 years".
    #[serde(default)]
    pub experience: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
}

/// Counters gathered while computing the relevance score. Debug output only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceBreakdown {
    pub score: f64,
    pub exact_matches: u32,
    pub partial_matches: f64,
}

/// A listing annotated with the scores the ranking pipeline computed for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: JobListing,
    pub match_score: f64,
    pub match_percentage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<RelevanceBreakdown>,
}

impl ScoredJob {
    pub fn new(job: JobListing, match_score: f64) -> Self {
        Self {
            job,
            match_score,
            match_percentage: (match_score * 100.0).round() as u32,
            recommendation_score: None,
            explain: None,
        }
    }
}

/// Output of one ranking pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedJobs {
    pub matched: Vec<ScoredJob>,
    pub recommended: Vec<ScoredJob>,
    /// Candidates handed to the pipeline, counted before filtering.
    pub total_considered: usize,
}

impl RankedJobs {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.recommended.is_empty()
    }

    /// Mean of the unrounded `match_score * 100` over the matched bucket,
    /// 0 when nothing matched.
    pub fn average_match_percentage(&self) -> f64 {
        if self.matched.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.matched.iter().map(|j| j.match_score * 100.0).sum();
        sum / self.matched.len() as f64
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
