//! Synthetic job source: a fixed set of templates whose skill lists are
//! nudged toward the user's input. Used when no upstream API is configured
//! and as the fallback when the upstream fails.

use async_trait::async_trait;
use reqwest::Url;

use crate::matching::tokenizer::skill_tokens;
use crate::models::job::JobListing;
use crate::sources::{JobQuery, JobSource, SourceBatch, SourceError, SourceKind};

const LINKEDIN_JOB_SEARCH: &str = "https://www.linkedin.com/jobs/search/";
const MAX_SKILLS_PER_JOB: usize = 6;
const DEFAULT_SKILLS: &[&str] = &["JavaScript", "Python", "SQL"];

struct JobTemplate {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    salary: &'static str,
    experience: &'static str,
}

const TEMPLATES: &[JobTemplate] = &[
    JobTemplate {
        title: "Software Developer",
        company: "Tech Solutions Inc",
        location: "Bangalore, India",
        salary: "₹8-12 LPA",
        experience: "2-4 years",
    },
    JobTemplate {
        title: "Full Stack Developer",
        company: "Digital Innovations",
        location: "Mumbai, India",
        salary: "₹10-15 LPA",
        experience: "3-5 years",
    },
    JobTemplate {
        title: "Frontend Developer",
        company: "WebTech Corp",
        location: "Pune, India",
        salary: "₹6-10 LPA",
        experience: "1-3 years",
    },
    JobTemplate {
        title: "Backend Developer",
        company: "DataFlow Systems",
        location: "Hyderabad, India",
        salary: "₹9-14 LPA",
        experience: "2-5 years",
    },
    JobTemplate {
        title: "Python Developer",
        company: "AI Innovations",
        location: "Chennai, India",
        salary: "₹7-11 LPA",
        experience: "1-4 years",
    },
    JobTemplate {
        title: "React Developer",
        company: "Modern Web Solutions",
        location: "Gurgaon, India",
        salary: "₹8-13 LPA",
        experience: "2-4 years",
    },
    JobTemplate {
        title: "DevOps Engineer",
        company: "Cloud Systems Ltd",
        location: "Bangalore, India",
        salary: "₹12-18 LPA",
        experience: "3-6 years",
    },
    JobTemplate {
        title: "Data Scientist",
        company: "Analytics Pro",
        location: "Mumbai, India",
        salary: "₹15-25 LPA",
        experience: "2-5 years",
    },
];

fn template_skills(title: &str) -> &'static [&'static str] {
    match title {
        "Software Developer" => &["Java", "Python", "JavaScript", "SQL", "Git"],
        "Full Stack Developer" => &["React", "Node.js", "JavaScript", "MongoDB", "Express"],
        "Frontend Developer" => &["React", "JavaScript", "HTML", "CSS", "TypeScript"],
        "Backend Developer" => &["Python", "Django", "PostgreSQL", "REST API", "Docker"],
        "Python Developer" => &["Python", "Django", "Flask", "PostgreSQL", "Redis"],
        "React Developer" => &["React", "JavaScript", "Redux", "HTML", "CSS"],
        "DevOps Engineer" => &["AWS", "Docker", "Kubernetes", "Jenkins", "Linux"],
        "Data Scientist" => &["Python", "Machine Learning", "TensorFlow", "pandas", "scikit-learn"],
        _ => DEFAULT_SKILLS,
    }
}

/// Template skills for `title`, with the user's overlapping tokens written
/// over the leading slots so the listing echoes the user's wording.
pub fn skills_for_job(title: &str, user_tokens: &[String]) -> Vec<String> {
    let mut skills: Vec<String> = template_skills(title)
        .iter()
        .map(|s| s.to_string())
        .collect();

    let overlapping: Vec<&String> = user_tokens
        .iter()
        .filter(|token| {
            skills.iter().any(|skill| {
                let skill = skill.to_lowercase();
                skill.contains(token.as_str()) || token.contains(skill.as_str())
            })
        })
        .collect();

    for (slot, token) in skills.iter_mut().zip(overlapping) {
        *slot = capitalize(token);
    }

    skills.truncate(MAX_SKILLS_PER_JOB);
    skills
}

/// LinkedIn job search link for a title, scoped to the city part of `location`.
pub fn linkedin_search_url(title: &str, location: &str) -> Option<String> {
    let city = location.split(',').next().unwrap_or(location).trim();
    Url::parse_with_params(LINKEDIN_JOB_SEARCH, &[("keywords", title), ("location", city)])
        .ok()
        .map(String::from)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the synthetic listings for one search.
pub fn generate_listings(user_text: &str) -> Vec<JobListing> {
    let tokens = skill_tokens(user_text);
    TEMPLATES
        .iter()
        .map(|t| {
            let link = linkedin_search_url(t.title, t.location);
            JobListing {
                title: t.title.to_string(),
                company: t.company.to_string(),
                location: t.location.to_string(),
                salary: t.salary.to_string(),
                experience: t.experience.to_string(),
                skills: skills_for_job(t.title, &tokens),
                source: "LinkedIn".to_string(),
                apply_link: link.clone(),
                url: link,
                remote: None,
            }
        })
        .collect()
}

pub struct SyntheticJobSource;

#[async_trait]
impl JobSource for SyntheticJobSource {
    async fn fetch(&self, query: &JobQuery) -> Result<SourceBatch, SourceError> {
        Ok(SourceBatch {
            jobs: generate_listings(&query.skills),
            kind: SourceKind::Synthetic,
            total_found: None,
        })
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }
}
