//! Lookup tables for the cluster recommender.
//!
//! The built-in tables are returned by `MatchingTables::default()`. A
//! deployment can replace them with a JSON file of the same shape.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A named group of lower-cased technology terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCluster {
    pub name: String,
    pub terms: Vec<String>,
}

/// Ordered set of technology clusters used for topical similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterTaxonomy {
    pub clusters: Vec<SkillCluster>,
}

/// A base skill and the skills considered related to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticPair {
    pub base: String,
    pub related: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticPairTable {
    pub pairs: Vec<SemanticPair>,
}

/// Both tables, shared read-only by every recommender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingTables {
    pub clusters: ClusterTaxonomy,
    pub semantic_pairs: SemanticPairTable,
}

/// How a table term is located inside a skill or the user's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermMatching {
    /// Plain substring containment. Loose: "java" is found in "javascript".
    #[default]
    Substring,
    /// The term must be bounded by non-alphanumeric chars or the string ends.
    WholeWord,
}

impl TermMatching {
    /// Whether `term` occurs in `haystack`. Both are expected lower-cased.
    pub fn contains(self, haystack: &str, term: &str) -> bool {
        match self {
            TermMatching::Substring => haystack.contains(term),
            TermMatching::WholeWord => {
                if term.is_empty() {
                    return false;
                }
                haystack.match_indices(term).any(|(start, _)| {
                    let end = start + term.len();
                    let before_ok = haystack[..start]
                        .chars()
                        .next_back()
                        .map_or(true, |c| !c.is_alphanumeric());
                    let after_ok = haystack[end..]
                        .chars()
                        .next()
                        .map_or(true, |c| !c.is_alphanumeric());
                    before_ok && after_ok
                })
            }
        }
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl Default for ClusterTaxonomy {
    fn default() -> Self {
        let cluster = |name: &str, terms: &[&str]| SkillCluster {
            name: name.to_string(),
            terms: owned(terms),
        };
        Self {
            clusters: vec![
                cluster(
                    "web_frontend",
                    &["javascript", "react", "html", "css", "typescript", "vue", "angular"],
                ),
                cluster(
                    "web_backend",
                    &["node", "express", "django", "flask", "spring", "api", "rest"],
                ),
                cluster(
                    "data_science",
                    &[
                        "python",
                        "machine learning",
                        "pandas",
                        "tensorflow",
                        "pytorch",
                        "scikit-learn",
                    ],
                ),
                cluster(
                    "cloud_devops",
                    &["aws", "docker", "kubernetes", "devops", "terraform", "jenkins", "azure"],
                ),
                cluster(
                    "database",
                    &["mysql", "postgresql", "mongodb", "redis", "sql", "nosql"],
                ),
                cluster(
                    "mobile",
                    &["react native", "flutter", "ios", "android", "swift", "kotlin"],
                ),
            ],
        }
    }
}

impl Default for SemanticPairTable {
    fn default() -> Self {
        let pair = |base: &str, related: &[&str]| SemanticPair {
            base: base.to_string(),
            related: owned(related),
        };
        Self {
            pairs: vec![
                pair("python", &["django", "flask", "machine learning", "data science"]),
                pair("javascript", &["react", "node", "typescript", "vue"]),
                pair("aws", &["cloud", "devops", "kubernetes", "docker"]),
                pair("machine learning", &["tensorflow", "pytorch", "data science", "python"]),
            ],
        }
    }
}

impl MatchingTables {
    /// Loads replacement tables from a JSON file. Terms are lower-cased on
    /// load since matching assumes lower-case tables.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file {}", path.display()))?;
        let mut tables: MatchingTables = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid taxonomy file {}", path.display()))?;
        tables.normalize();
        Ok(tables)
    }

    fn normalize(&mut self) {
        for cluster in &mut self.clusters.clusters {
            for term in &mut cluster.terms {
                *term = term.trim().to_lowercase();
            }
        }
        for pair in &mut self.semantic_pairs.pairs {
            pair.base = pair.base.trim().to_lowercase();
            for term in &mut pair.related {
                *term = term.trim().to_lowercase();
            }
        }
    }
}
