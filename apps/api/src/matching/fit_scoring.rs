//! CV ↔ JD matching: technical skills, experience years and education,
//! combined into a 0–100 overall score with gaps and priorities.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::contains_keyword;
use crate::analysis::patterns::{stated_years, year_range_span};
use crate::improvement::models::{Improvement, ImprovementKind, Priority};
use crate::matching::jd_parser::{JobDescription, RequirementCategory};
use crate::models::document::Document;

const TECH_WEIGHT: f64 = 0.5;
const EXPERIENCE_WEIGHT: f64 = 0.3;
const EDUCATION_WEIGHT: f64 = 0.2;

/// Experience credit when the CV falls short of the required years.
const EXPERIENCE_SHORTFALL_CREDIT: f64 = 0.5;
/// Education credit when no degree vocabulary is found.
const NO_EDUCATION_CREDIT: f64 = 0.7;

/// Technical match below this percentage becomes a high priority.
const TECH_PRIORITY_THRESHOLD: f64 = 70.0;
/// Overall score below which the CV needs a keyword pass.
const KEYWORD_PASS_THRESHOLD: f64 = 70.0;

const EDUCATION_TERMS: &[&str] = &[
    "degree",
    "bachelor",
    "master",
    "phd",
    "doctorate",
    "diploma",
    "bsc",
    "msc",
    "mba",
    "certification",
    "certifications",
];

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsMatch {
    /// 0 – 100; 100 when the JD lists no technical skills.
    pub match_percentage: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub total_required: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceMatch {
    pub cv_years: u32,
    pub required_years: u32,
    pub meets_requirement: bool,
    pub gap_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationMatch {
    pub has_relevant_education: bool,
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementPriority {
    pub area: String,
    pub priority: Priority,
    pub reason: String,
}

/// Full match report returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub job_title: String,
    /// 0 – 100
    pub overall_score: f64,
    pub technical_skills: SkillsMatch,
    pub experience: ExperienceMatch,
    pub education: EducationMatch,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub gaps: Vec<String>,
    pub priorities: Vec<ImprovementPriority>,
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// Matches a CV against a parsed job description. Open date ranges
/// ("2021 - Present") are measured up to the current year.
pub fn match_cv(document: &Document, jd: &JobDescription) -> MatchReport {
    match_cv_at(document, jd, Utc::now().year())
}

pub fn match_cv_at(document: &Document, jd: &JobDescription, current_year: i32) -> MatchReport {
    let text = document.normalized_text();
    let raw_text = document.full_text();

    let technical_skills = match_technical_skills(&text, jd);
    let experience = match_experience(&raw_text, jd, current_year);
    let education = match_education(&text);

    let (matching_keywords, missing_keywords): (Vec<_>, Vec<_>) = jd
        .requirements
        .iter()
        .map(|r| r.requirement.clone())
        .partition(|k| contains_keyword(&text, k));

    let overall_score = overall(&technical_skills, &experience, &education);

    let mut gaps = Vec::new();
    if !technical_skills.missing.is_empty() {
        gaps.push(format!(
            "Missing technical skills: {}",
            top(&technical_skills.missing, 3)
        ));
    }
    if experience.gap_years > 0 {
        gaps.push(format!("Experience gap: {} years short", experience.gap_years));
    }

    let mut priorities = Vec::new();
    if technical_skills.match_percentage < TECH_PRIORITY_THRESHOLD {
        priorities.push(ImprovementPriority {
            area: "technical_skills".to_string(),
            priority: Priority::High,
            reason: format!(
                "Only {:.0}% technical skills match",
                technical_skills.match_percentage
            ),
        });
    }

    let recommendation = build_recommendation(overall_score, &missing_keywords);

    MatchReport {
        job_title: jd.job_title.clone(),
        overall_score,
        technical_skills,
        experience,
        education,
        matching_keywords,
        missing_keywords,
        gaps,
        priorities,
        recommendation,
    }
}

fn match_technical_skills(normalized_cv: &str, jd: &JobDescription) -> SkillsMatch {
    let (matched, missing): (Vec<String>, Vec<String>) = jd
        .requirements_of(RequirementCategory::TechnicalSkills)
        .map(|r| r.requirement.clone())
        .partition(|skill| contains_keyword(normalized_cv, skill));

    let total_required = matched.len() + missing.len();
    let match_percentage = if total_required == 0 {
        100.0
    } else {
        matched.len() as f64 / total_required as f64 * 100.0
    };

    SkillsMatch {
        match_percentage,
        matched,
        missing,
        total_required,
    }
}

fn match_experience(cv_text: &str, jd: &JobDescription, current_year: i32) -> ExperienceMatch {
    let cv_years = stated_years(cv_text)
        .max(year_range_span(cv_text, current_year))
        .unwrap_or(0);
    let required_years = jd.required_experience_years.unwrap_or(0);

    ExperienceMatch {
        cv_years,
        required_years,
        meets_requirement: cv_years >= required_years,
        gap_years: required_years.saturating_sub(cv_years),
    }
}

fn match_education(normalized_cv: &str) -> EducationMatch {
    let evidence = EDUCATION_TERMS
        .iter()
        .find(|term| contains_keyword(normalized_cv, term))
        .map(|term| (*term).to_string());

    EducationMatch {
        has_relevant_education: evidence.is_some(),
        evidence,
    }
}

fn overall(tech: &SkillsMatch, experience: &ExperienceMatch, education: &EducationMatch) -> f64 {
    let experience_credit = if experience.meets_requirement {
        1.0
    } else {
        EXPERIENCE_SHORTFALL_CREDIT
    };
    let education_credit = if education.has_relevant_education {
        1.0
    } else {
        NO_EDUCATION_CREDIT
    };

    let score = TECH_WEIGHT * (tech.match_percentage / 100.0)
        + EXPERIENCE_WEIGHT * experience_credit
        + EDUCATION_WEIGHT * education_credit;
    (score * 100.0).clamp(0.0, 100.0)
}

fn top(items: &[String], n: usize) -> String {
    items
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a human-readable recommendation string from score and missing keywords.
fn build_recommendation(score: f64, missing: &[String]) -> String {
    let gaps = top(missing, 3);

    if score >= 80.0 {
        "Strong fit. Your CV directly covers the key requirements.".to_string()
    } else if score >= 60.0 {
        format!("Moderate fit ({score:.0}/100). Consider highlighting: {gaps}.")
    } else {
        format!("Low fit ({score:.0}/100). Significant gaps: {gaps}. Tailor your CV before applying.")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Suggestions
// ────────────────────────────────────────────────────────────────────────────

/// Improvements implied by a match report: missing skills, an experience gap
/// and a low overall score.
pub fn suggestions_for(report: &MatchReport) -> Vec<Improvement> {
    let mut suggestions = Vec::new();

    let missing = &report.technical_skills.missing;
    if !missing.is_empty() {
        let skills = top(missing, 3);
        suggestions.push(Improvement {
            section: "skills".to_string(),
            kind: ImprovementKind::Keyword,
            original_text: String::new(),
            improved_text: format!(
                "Add a skills section or update the existing one to include: {skills}"
            ),
            reasoning: format!("Job requires {skills} which are not highlighted in your CV"),
            priority: Priority::High,
            confidence: 0.8,
        });
    }

    if report.experience.gap_years > 0 {
        suggestions.push(Improvement {
            section: "experience".to_string(),
            kind: ImprovementKind::Content,
            original_text: String::new(),
            improved_text:
                "Emphasize transferable skills and relevant project experience to bridge the gap"
                    .to_string(),
            reasoning: format!(
                "Position requires {} years experience",
                report.experience.required_years
            ),
            priority: Priority::Medium,
            confidence: 0.7,
        });
    }

    if report.overall_score < KEYWORD_PASS_THRESHOLD {
        suggestions.push(Improvement {
            section: "skills".to_string(),
            kind: ImprovementKind::Keyword,
            original_text: String::new(),
            improved_text: "Incorporate more keywords from the job description throughout your CV"
                .to_string(),
            reasoning: format!("Current match score is {:.0}%", report.overall_score),
            priority: Priority::High,
            confidence: 0.75,
        });
    }

    suggestions
}
