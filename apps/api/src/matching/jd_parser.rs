//! JD Parser: extracts a title, skill requirements and required years from a
//! raw job description. Rule-based and deterministic.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::contains_keyword;
use crate::analysis::patterns::first_stated_years;
use crate::analysis::text::{contains_phrase, normalize};

pub const UNKNOWN_TITLE: &str = "Unknown Position";

/// A first line longer than this reads as prose, not a title.
const MAX_TITLE_WORDS: usize = 8;

const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "node.js",
    "rust",
    "c++",
    "sql",
    "postgresql",
    "aws",
    "docker",
    "kubernetes",
    "terraform",
    "git",
    "ci/cd",
    "api",
    "microservices",
    "database",
    "machine learning",
    "ai",
    "cloud",
];

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "analytical",
    "collaboration",
    "management",
    "mentoring",
    "presentation",
    "strategic",
];

const REQUIRED_MARKERS: &[&str] = &["required", "must have", "essential"];
const NICE_TO_HAVE_MARKERS: &[&str] = &["nice to have", "bonus", "a plus"];
const PREFERRED_MARKERS: &[&str] = &["preferred"];

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?im)^\s*job\s*title\s*[:\-–]\s*(.+?)\s*$",
        r"(?im)^\s*position\s*[:\-–]\s*(.+?)\s*$",
        r"(?im)^\s*role\s*[:\-–]\s*(.+?)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid title regex"))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    TechnicalSkills,
    SoftSkills,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Required,
    Preferred,
    NiceToHave,
}

/// A single requirement extracted from the JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub category: RequirementCategory,
    pub requirement: String,
    pub importance: Importance,
}

/// Structured output of JD parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_title: String,
    pub requirements: Vec<Requirement>,
    pub required_experience_years: Option<u32>,
}

impl JobDescription {
    pub fn requirements_of(
        &self,
        category: RequirementCategory,
    ) -> impl Iterator<Item = &Requirement> {
        self.requirements
            .iter()
            .filter(move |r| r.category == category)
    }
}

/// Parses a job description.
///
/// Technical skills take their importance from the line that first mentions
/// them ("Nice to have: Kubernetes"); without a marker on that line, any
/// "required" / "must have" / "essential" in the JD makes them required.
/// Soft skills are always preferred.
pub fn parse_job_description(jd_text: &str) -> JobDescription {
    let whole = normalize(jd_text);
    let lines: Vec<String> = jd_text.lines().map(normalize).collect();
    let globally_required = has_marker(&whole, REQUIRED_MARKERS);

    let mut requirements = Vec::new();

    for skill in TECHNICAL_SKILLS {
        if !contains_keyword(&whole, skill) {
            continue;
        }
        let line = lines
            .iter()
            .find(|l| contains_keyword(l, skill))
            .map(String::as_str)
            .unwrap_or("");
        requirements.push(Requirement {
            category: RequirementCategory::TechnicalSkills,
            requirement: (*skill).to_string(),
            importance: technical_importance(line, globally_required),
        });
    }

    for skill in SOFT_SKILLS {
        if contains_keyword(&whole, skill) {
            requirements.push(Requirement {
                category: RequirementCategory::SoftSkills,
                requirement: (*skill).to_string(),
                importance: Importance::Preferred,
            });
        }
    }

    JobDescription {
        job_title: extract_title(jd_text),
        requirements,
        required_experience_years: first_stated_years(jd_text),
    }
}

fn has_marker(normalized_line: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| contains_phrase(normalized_line, m))
}

fn technical_importance(normalized_line: &str, globally_required: bool) -> Importance {
    if has_marker(normalized_line, REQUIRED_MARKERS) {
        Importance::Required
    } else if has_marker(normalized_line, NICE_TO_HAVE_MARKERS) {
        Importance::NiceToHave
    } else if has_marker(normalized_line, PREFERRED_MARKERS) {
        Importance::Preferred
    } else if globally_required {
        Importance::Required
    } else {
        Importance::Preferred
    }
}

/// Labelled title lines first, then a short first line, else [`UNKNOWN_TITLE`].
fn extract_title(jd_text: &str) -> String {
    for pattern in TITLE_PATTERNS.iter() {
        if let Some(title) = pattern.captures(jd_text).and_then(|c| c.get(1)) {
            return title.as_str().to_string();
        }
    }

    jd_text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .filter(|l| {
            l.split_whitespace().count() <= MAX_TITLE_WORDS
                && !l.ends_with('.')
                && !l.contains(':')
        })
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTUP_JD: &str = r#"
        Senior Rust Engineer - Core Infrastructure
        We move fast and own everything end-to-end. You will build distributed systems on AWS.
        Requirements: 5+ years Rust required, SQL and Docker experience essential.
        Nice to have: Kubernetes, Terraform experience a plus.
        Strong communication and mentoring skills.
    "#;

    const LABELLED_JD: &str = "Acme Corp is hiring!\nJob Title: Backend Engineer\n\
        Preferred: Python, PostgreSQL.\nWe value collaboration.";

    fn find<'a>(jd: &'a JobDescription, name: &str) -> Option<&'a Requirement> {
        jd.requirements.iter().find(|r| r.requirement == name)
    }

    #[test]
    fn test_title_from_label() {
        let jd = parse_job_description(LABELLED_JD);
        assert_eq!(jd.job_title, "Backend Engineer");
    }

    #[test]
    fn test_title_from_short_first_line() {
        let jd = parse_job_description(STARTUP_JD);
        assert_eq!(jd.job_title, "Senior Rust Engineer - Core Infrastructure");
    }

    #[test]
    fn test_title_unknown_for_prose() {
        let jd = parse_job_description("We are looking for someone who loves building things.");
        assert_eq!(jd.job_title, UNKNOWN_TITLE);
    }

    #[test]
    fn test_importance_follows_line_markers() {
        let jd = parse_job_description(STARTUP_JD);
        assert_eq!(find(&jd, "rust").unwrap().importance, Importance::Required);
        assert_eq!(find(&jd, "docker").unwrap().importance, Importance::Required);
        assert_eq!(find(&jd, "kubernetes").unwrap().importance, Importance::NiceToHave);
        // No marker on its own line, but the JD says "required" elsewhere.
        assert_eq!(find(&jd, "aws").unwrap().importance, Importance::Required);
    }

    #[test]
    fn test_importance_preferred_without_required_markers() {
        let jd = parse_job_description(LABELLED_JD);
        assert_eq!(find(&jd, "python").unwrap().importance, Importance::Preferred);
        assert_eq!(find(&jd, "postgresql").unwrap().importance, Importance::Preferred);
    }

    #[test]
    fn test_soft_skills_are_preferred() {
        let jd = parse_job_description(STARTUP_JD);
        let soft: Vec<&str> = jd
            .requirements_of(RequirementCategory::SoftSkills)
            .map(|r| r.requirement.as_str())
            .collect();
        assert_eq!(soft, vec!["communication", "mentoring"]);
        assert!(jd
            .requirements_of(RequirementCategory::SoftSkills)
            .all(|r| r.importance == Importance::Preferred));
    }

    #[test]
    fn test_java_not_found_inside_javascript() {
        let jd = parse_job_description("Frontend role. JavaScript and React required.");
        assert!(find(&jd, "javascript").is_some());
        assert!(find(&jd, "java").is_none());
    }

    #[test]
    fn test_required_years() {
        assert_eq!(parse_job_description(STARTUP_JD).required_experience_years, Some(5));
        assert_eq!(parse_job_description(LABELLED_JD).required_experience_years, None);
    }

    #[test]
    fn test_requirement_serializes_snake_case() {
        let json = serde_json::to_value(Requirement {
            category: RequirementCategory::TechnicalSkills,
            requirement: "rust".to_string(),
            importance: Importance::NiceToHave,
        })
        .unwrap();
        assert_eq!(json["category"], "technical_skills");
        assert_eq!(json["importance"], "nice_to_have");
    }
}
