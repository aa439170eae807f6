//! Relevance Scorer: direct lexical fit between the user's skills and a
//! job's skill list.
//!
//! Token overlap stands in for term-frequency weighting:
//! - exact token/skill equality → 1.0
//! - one contains the other → 0.3
//!
//! The sum is normalized by the number of user tokens and capped at 1.0.

use crate::matching::tokenizer::skill_tokens;
use crate::models::job::RelevanceBreakdown;

const EXACT_WEIGHT: f64 = 1.0;
const PARTIAL_WEIGHT: f64 = 0.3;
/// Partial hits count as half a match in the diagnostic counter.
const PARTIAL_COUNTER_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer;

impl RelevanceScorer {
    /// Score in [0, 1]. Zero when the user text yields no tokens or the job
    /// lists no skills.
    pub fn score(&self, user_text: &str, job_skills: &[String]) -> f64 {
        self.explain(user_text, job_skills).score
    }

    /// Same as [`score`](Self::score) but also returns the exact/partial
    /// counters. The counters never feed back into the score.
    pub fn explain(&self, user_text: &str, job_skills: &[String]) -> RelevanceBreakdown {
        let user_tokens = skill_tokens(user_text);
        if user_tokens.is_empty() || job_skills.is_empty() {
            return RelevanceBreakdown::default();
        }

        let job_skills: Vec<String> = job_skills.iter().map(|s| s.to_lowercase()).collect();

        let mut breakdown = RelevanceBreakdown::default();
        let mut accumulated = 0.0_f64;

        for token in &user_tokens {
            for skill in &job_skills {
                if skill == token {
                    accumulated += EXACT_WEIGHT;
                    breakdown.exact_matches += 1;
                } else if skill.contains(token.as_str()) || token.contains(skill.as_str()) {
                    accumulated += PARTIAL_WEIGHT;
                    breakdown.partial_matches += PARTIAL_COUNTER_STEP;
                }
            }
        }

        breakdown.score = (accumulated / user_tokens.len() as f64).min(1.0);
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_exact_match_is_full_score() {
        let score = RelevanceScorer.score("Python", &skills(&["python"]));
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_normalized_by_user_token_count() {
        let score = RelevanceScorer.score("Python, Java", &skills(&["python"]));
        assert!((score - 0.5).abs() < f64::EPSILON, "Score was {score}");
    }

    #[test]
    fn test_empty_job_skills_scores_zero() {
        assert_eq!(RelevanceScorer.score("Python, Rust", &[]), 0.0);
    }

    #[test]
    fn test_empty_user_text_scores_zero() {
        assert_eq!(RelevanceScorer.score("", &skills(&["python"])), 0.0);
        assert_eq!(RelevanceScorer.score("  , ", &skills(&["python"])), 0.0);
        // Only short tokens → empty skill set
        assert_eq!(RelevanceScorer.score("go, c", &skills(&["go"])), 0.0);
    }

    #[test]
    fn test_substring_is_partial_match() {
        // "java" ⊂ "javascript"
        let score = RelevanceScorer.score("Java", &skills(&["JavaScript"]));
        assert!((score - 0.3).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_partial_match_works_in_both_directions() {
        // job skill "sql" ⊂ user token "postgresql"
        let score = RelevanceScorer.score("PostgreSQL", &skills(&["SQL"]));
        assert!((score - 0.3).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_score_capped_at_one() {
        // One token hitting several skills accumulates past 1.0
        let score = RelevanceScorer.score(
            "react",
            &skills(&["React", "React Native", "react-router"]),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_frontend_scenario_three_exact_matches() {
        let breakdown = RelevanceScorer.explain(
            "React, JavaScript, HTML",
            &skills(&["React", "JavaScript", "HTML", "CSS", "TypeScript"]),
        );
        assert_eq!(breakdown.exact_matches, 3);
        assert_eq!(breakdown.partial_matches, 0.0);
        assert!((breakdown.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explain_counters_do_not_change_score() {
        let job = skills(&["JavaScript", "Java"]);
        let breakdown = RelevanceScorer.explain("java", &job);
        assert_eq!(breakdown.exact_matches, 1);
        assert_eq!(breakdown.partial_matches, 0.5);
        // 1.0 + 0.3, capped
        assert_eq!(breakdown.score, 1.0);
        assert_eq!(breakdown.score, RelevanceScorer.score("java", &job));
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        assert_eq!(
            RelevanceScorer.score("Python", &skills(&["Django", "Flask"])),
            0.0
        );
    }

    #[test]
    fn test_score_always_in_unit_range() {
        let inputs = [
            ("", vec![]),
            ("rust", vec!["Rust", "rust", "Rustacean"]),
            ("a b c", vec!["abc"]),
            ("kubernetes docker aws", vec!["AWS"]),
            ("sql sql sql", vec!["MySQL", "PostgreSQL", "SQL"]),
        ];
        for (user, job) in inputs {
            let score = RelevanceScorer.score(user, &skills(&job));
            assert!((0.0..=1.0).contains(&score), "{user:?} → {score}");
        }
    }
}
