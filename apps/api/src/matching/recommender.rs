//! Cluster Recommender: topical fit, independent of lexical overlap.
//!
//! Two signals, blended 70/30:
//! - cluster density: for every cluster that both the user text and the job
//!   touch, `user_hits * job_hits / cluster_size`
//! - semantic pairs: +0.2 per related skill found in the job when the user
//!   mentions the base skill
//!
//! The user text is not tokenized; terms are searched in the whole string.

use std::sync::Arc;

use crate::matching::taxonomy::{MatchingTables, TermMatching};

const CLUSTER_WEIGHT: f64 = 0.7;
const SEMANTIC_WEIGHT: f64 = 0.3;
const SEMANTIC_STEP: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct ClusterRecommender {
    tables: Arc<MatchingTables>,
    matching: TermMatching,
}

impl Default for ClusterRecommender {
    fn default() -> Self {
        Self::new(Arc::new(MatchingTables::default()), TermMatching::default())
    }
}

impl ClusterRecommender {
    pub fn new(tables: Arc<MatchingTables>, matching: TermMatching) -> Self {
        Self { tables, matching }
    }

    /// Score in [0, 1].
    pub fn score(&self, user_text: &str, job_skills: &[String]) -> f64 {
        let user_text = user_text.to_lowercase();
        let job_skills: Vec<String> = job_skills.iter().map(|s| s.to_lowercase()).collect();

        let total = self.cluster_score(&user_text, &job_skills) * CLUSTER_WEIGHT
            + self.semantic_score(&user_text, &job_skills) * SEMANTIC_WEIGHT;
        total.min(1.0)
    }

    fn cluster_score(&self, user_text: &str, job_skills: &[String]) -> f64 {
        let mut score = 0.0;
        for cluster in &self.tables.clusters.clusters {
            let user_hits = cluster
                .terms
                .iter()
                .filter(|term| self.matching.contains(user_text, term))
                .count();
            let job_hits = job_skills
                .iter()
                .filter(|skill| {
                    cluster
                        .terms
                        .iter()
                        .any(|term| self.matching.contains(skill, term))
                })
                .count();

            if user_hits > 0 && job_hits > 0 {
                score += (user_hits * job_hits) as f64 / cluster.terms.len() as f64;
            }
        }
        score
    }

    fn semantic_score(&self, user_text: &str, job_skills: &[String]) -> f64 {
        let mut score = 0.0;
        for pair in &self.tables.semantic_pairs.pairs {
            if !self.matching.contains(user_text, &pair.base) {
                continue;
            }
            for related in &pair.related {
                if job_skills
                    .iter()
                    .any(|skill| self.matching.contains(skill, related))
                {
                    score += SEMANTIC_STEP;
                }
            }
        }
        score
    }
}
