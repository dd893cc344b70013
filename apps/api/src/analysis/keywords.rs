//! Role and industry keyword tables, and case-insensitive keyword matching.

use serde::{Deserialize, Serialize};

use crate::analysis::text::{contains_phrase, normalize};
use crate::models::document::Document;

const ROLE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "software engineer",
        &[
            "programming",
            "coding",
            "development",
            "software",
            "algorithms",
            "data structures",
            "debugging",
            "testing",
            "version control",
            "api",
        ],
    ),
    (
        "data scientist",
        &[
            "machine learning",
            "statistics",
            "python",
            "r",
            "sql",
            "data analysis",
            "visualization",
            "modeling",
            "pandas",
            "numpy",
            "scikit learn",
        ],
    ),
    (
        "product manager",
        &[
            "product strategy",
            "roadmap",
            "stakeholder management",
            "agile",
            "user experience",
            "market research",
            "analytics",
            "prioritization",
        ],
    ),
    (
        "marketing manager",
        &[
            "campaign management",
            "digital marketing",
            "seo",
            "sem",
            "analytics",
            "brand management",
            "content strategy",
            "lead generation",
        ],
    ),
];

const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "technology",
        &[
            "python",
            "java",
            "javascript",
            "react",
            "node js",
            "aws",
            "docker",
            "kubernetes",
            "sql",
            "mongodb",
            "api",
            "microservices",
            "agile",
            "scrum",
            "git",
            "ci cd",
            "devops",
            "machine learning",
            "ai",
        ],
    ),
    (
        "marketing",
        &[
            "seo",
            "sem",
            "google analytics",
            "social media",
            "content marketing",
            "campaign management",
            "lead generation",
            "conversion optimization",
            "brand management",
            "market research",
            "digital marketing",
        ],
    ),
    (
        "finance",
        &[
            "financial analysis",
            "budgeting",
            "forecasting",
            "excel",
            "financial modeling",
            "risk management",
            "compliance",
            "audit",
            "tax",
            "investment analysis",
        ],
    ),
];

/// Used whenever neither the role nor the industry is recognised.
const GENERIC_KEYWORDS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "collaboration",
    "project management",
    "analytical",
    "stakeholder",
    "mentoring",
    "strategic",
];

/// Which table a keyword list came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum KeywordSource {
    Role(String),
    Industry(String),
    Generic,
}

#[derive(Debug, Clone)]
pub struct KeywordList {
    pub source: KeywordSource,
    pub keywords: &'static [&'static str],
}

/// A keyword and whether the document mentions it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub present: bool,
}

/// Picks the keyword list for a target: role first, then industry, then the
/// generic list. Unknown targets are never an error.
pub fn select_keywords(target_role: Option<&str>, target_industry: Option<&str>) -> KeywordList {
    if let Some((name, keywords)) = target_role.and_then(|r| lookup(ROLE_KEYWORDS, r)) {
        return KeywordList {
            source: KeywordSource::Role(name.to_string()),
            keywords,
        };
    }
    if let Some((name, keywords)) = target_industry.and_then(|i| lookup(INDUSTRY_KEYWORDS, i)) {
        return KeywordList {
            source: KeywordSource::Industry(name.to_string()),
            keywords,
        };
    }
    KeywordList {
        source: KeywordSource::Generic,
        keywords: GENERIC_KEYWORDS,
    }
}

/// Exact name first, then a table name contained in the query, so
/// "Senior Software Engineer" resolves to "software engineer".
fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    query: &str,
) -> Option<(&'static str, &'static [&'static str])> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(name, _)| *name == query)
        .or_else(|| table.iter().find(|(name, _)| contains_phrase(&query, name)))
        .copied()
}

/// Whether `keyword` occurs in text that was already passed through [`normalize`].
pub fn contains_keyword(normalized_text: &str, keyword: &str) -> bool {
    contains_phrase(normalized_text, &normalize(keyword))
}

/// Matches every keyword against the whole document, preserving keyword order.
pub fn match_keywords<S: AsRef<str>>(document: &Document, keywords: &[S]) -> Vec<KeywordMatch> {
    let text = document.normalized_text();
    keywords
        .iter()
        .map(|k| KeywordMatch {
            keyword: k.as_ref().to_string(),
            present: contains_keyword(&text, k.as_ref()),
        })
        .collect()
}

/// Share of matched keywords scaled to 0–100; `None` for an empty list.
pub fn keyword_density(matches: &[KeywordMatch]) -> Option<f64> {
    if matches.is_empty() {
        return None;
    }
    let found = matches.iter().filter(|m| m.present).count();
    Some(found as f64 / matches.len() as f64 * 100.0)
}
