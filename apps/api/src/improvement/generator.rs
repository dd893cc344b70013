//! Suggestion generation: pluggable, trait-based producer of [`Improvement`]s.
//!
//! Default: `RuleBasedSuggestionGenerator` (deterministic, no network).
//! Optional: `LlmSuggestionGenerator`, which falls back to the rule-based
//! generator whenever the LLM call fails.
//!
//! `AppState` holds an `Arc<dyn SuggestionGenerator>`, chosen at startup via config.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analysis::keywords::KeywordMatch;
use crate::analysis::patterns::{count_metrics, is_bullet, split_bullet};
use crate::analysis::rules::{Observation, EXPERIENCE_NO_DURATION, EXPERIENCE_NO_METRICS};
use crate::analysis::sections::SectionKind;
use crate::errors::AppError;
use crate::improvement::models::{Improvement, ImprovementKind, Priority};
use crate::improvement::prompts::SUGGESTION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::document::Document;

/// Weak openers and the action verb that replaces each. Longer phrases first.
const WEAK_OPENERS: &[(&str, &str)] = &[
    ("was responsible for", "Led"),
    ("responsible for", "Led"),
    ("participated in", "Contributed to"),
    ("was involved in", "Drove"),
    ("involved in", "Drove"),
    ("assisted with", "Supported"),
    ("assisted in", "Supported"),
    ("helped with", "Contributed to"),
    ("worked on", "Delivered"),
];

const MAX_REWRITES: usize = 3;
const MAX_KEYWORDS_SUGGESTED: usize = 5;

/// Everything a generator may look at. Borrowed from the workflow run.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionContext<'a> {
    pub document: &'a Document,
    pub observations: &'a [Observation],
    pub keyword_matches: &'a [KeywordMatch],
    pub target_role: Option<&'a str>,
}

impl SuggestionContext<'_> {
    fn fired(&self, rule: &str) -> bool {
        self.observations.iter().any(|o| o.rule == rule)
    }

    fn missing_keywords(&self) -> Vec<&str> {
        self.keyword_matches
            .iter()
            .filter(|m| !m.present)
            .map(|m| m.keyword.as_str())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap suggestion backends without touching the workflow.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Short backend name for logs and responses ("rule_based", "llm").
    fn backend(&self) -> &'static str;

    async fn generate(
        &self,
        context: &SuggestionContext<'_>,
    ) -> Result<Vec<Improvement>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedSuggestionGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic suggestions derived from the analysis.
///
/// 1. weak openers in experience-like lines → rewrite (high, 0.85)
/// 2. no quantified achievements → add a metric (medium, 0.75)
/// 3. no durations → add dates (medium, 0.70)
/// 4. missing keywords → keyword pass (medium, 0.80)
/// 5. no bullets anywhere → bullet points (medium, 0.90)
/// 6. missing standard sections → headers (high, 0.95)
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedSuggestionGenerator;

#[async_trait]
impl SuggestionGenerator for RuleBasedSuggestionGenerator {
    fn backend(&self) -> &'static str {
        "rule_based"
    }

    async fn generate(
        &self,
        context: &SuggestionContext<'_>,
    ) -> Result<Vec<Improvement>, AppError> {
        Ok(rule_based_suggestions(context))
    }
}

pub fn rule_based_suggestions(context: &SuggestionContext<'_>) -> Vec<Improvement> {
    let document = context.document;
    let mut suggestions = weak_opener_rewrites(document);

    if context.fired(EXPERIENCE_NO_METRICS) {
        if let Some(line) = first_experience_line(document, |l| count_metrics(l) == 0) {
            suggestions.push(Improvement {
                section: SectionKind::Experience.as_str().to_string(),
                kind: ImprovementKind::Content,
                original_text: line.to_string(),
                improved_text: format!(
                    "{line} (state the measurable result: %, revenue, users or time saved)"
                ),
                reasoning: "Quantified achievements show the scale of your impact".to_string(),
                priority: Priority::Medium,
                confidence: 0.75,
            });
        }
    }

    if context.fired(EXPERIENCE_NO_DURATION) {
        suggestions.push(Improvement {
            section: SectionKind::Experience.as_str().to_string(),
            kind: ImprovementKind::Content,
            original_text: String::new(),
            improved_text: "Add start and end dates to each role, e.g. 2021 - Present".to_string(),
            reasoning: "Recruiters and ATS filters use dates to compute experience".to_string(),
            priority: Priority::Medium,
            confidence: 0.7,
        });
    }

    let missing = context.missing_keywords();
    if !missing.is_empty() {
        let keywords = missing
            .iter()
            .take(MAX_KEYWORDS_SUGGESTED)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        let reasoning = match context.target_role {
            Some(role) => format!("These keywords are expected for {role} roles"),
            None => "These keywords are commonly searched for by recruiters".to_string(),
        };
        suggestions.push(Improvement {
            section: SectionKind::Skills.as_str().to_string(),
            kind: ImprovementKind::Keyword,
            original_text: String::new(),
            improved_text: format!(
                "Add relevant keywords where they reflect real experience: {keywords}"
            ),
            reasoning,
            priority: Priority::Medium,
            confidence: 0.8,
        });
    }

    let has_bullets = document
        .sections()
        .iter()
        .flat_map(|s| s.content_lines())
        .any(is_bullet);
    if !has_bullets {
        suggestions.push(Improvement {
            section: SectionKind::Experience.as_str().to_string(),
            kind: ImprovementKind::Format,
            original_text: String::new(),
            improved_text: "Use bullet points for better readability".to_string(),
            reasoning: "Bullet points are easier to scan than paragraphs".to_string(),
            priority: Priority::Medium,
            confidence: 0.9,
        });
    }

    let missing_headers: Vec<&str> = SectionKind::STANDARD
        .iter()
        .filter(|kind| !document.has_section(**kind))
        .map(|kind| kind.as_str())
        .collect();
    if !missing_headers.is_empty() {
        suggestions.push(Improvement {
            section: "structure".to_string(),
            kind: ImprovementKind::Structure,
            original_text: String::new(),
            improved_text: format!(
                "Add clear section headers: {}",
                missing_headers.join(", ")
            ),
            reasoning: "ATS parsers look for standard section headers".to_string(),
            priority: Priority::High,
            confidence: 0.95,
        });
    }

    debug!("Rule-based generator produced {} suggestions", suggestions.len());
    suggestions
}

fn weak_opener_rewrites(document: &Document) -> Vec<Improvement> {
    document
        .sections()
        .iter()
        .filter(|s| s.kind().is_experience_like())
        .flat_map(|s| s.content_lines().map(move |line| (s, line)))
        .filter_map(|(section, line)| {
            let (opener, rewritten) = rewrite_weak_opener(line)?;
            Some(Improvement {
                section: section.name.clone(),
                kind: ImprovementKind::Content,
                original_text: line.to_string(),
                improved_text: rewritten,
                reasoning: format!("Replace the weak opener \"{opener}\" with a strong action verb"),
                priority: Priority::High,
                confidence: 0.85,
            })
        })
        .take(MAX_REWRITES)
        .collect()
}

/// Rewrites a line that opens with a weak phrase, keeping any bullet marker.
fn rewrite_weak_opener(line: &str) -> Option<(&'static str, String)> {
    let (marker, body) = split_bullet(line);
    WEAK_OPENERS.iter().find_map(|(opener, verb)| {
        let head = body.get(..opener.len())?;
        let rest = &body[opener.len()..];
        let at_word_end = rest.is_empty() || rest.starts_with(char::is_whitespace);
        (head.eq_ignore_ascii_case(opener) && at_word_end)
            .then(|| (*opener, format!("{marker}{verb}{rest}")))
    })
}

fn first_experience_line(document: &Document, predicate: impl Fn(&str) -> bool) -> Option<&str> {
    document
        .sections_of(SectionKind::Experience)
        .flat_map(|s| s.content_lines())
        .find(|l| predicate(l))
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSuggestionGenerator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LlmSuggestions {
    improvements: Vec<Improvement>,
}

/// Suggestions from one JSON prompt. Any LLM failure degrades to the
/// rule-based suggestions with a warning.
pub struct LlmSuggestionGenerator {
    llm: LlmClient,
    fallback: RuleBasedSuggestionGenerator,
}

impl LlmSuggestionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            fallback: RuleBasedSuggestionGenerator,
        }
    }
}

#[async_trait]
impl SuggestionGenerator for LlmSuggestionGenerator {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn generate(
        &self,
        context: &SuggestionContext<'_>,
    ) -> Result<Vec<Improvement>, AppError> {
        let prompt = build_prompt(context);

        match self
            .llm
            .call_json::<LlmSuggestions>(&prompt, JSON_ONLY_SYSTEM)
            .await
        {
            Ok(response) => Ok(response
                .improvements
                .into_iter()
                .map(Improvement::normalized)
                .filter(|i| !i.improved_text.trim().is_empty())
                .collect()),
            Err(e) => {
                warn!("LLM suggestion generation failed, using rule-based suggestions: {e}");
                self.fallback.generate(context).await
            }
        }
    }
}

fn build_prompt(context: &SuggestionContext<'_>) -> String {
    let observations = if context.observations.is_empty() {
        "- none".to_string()
    } else {
        context
            .observations
            .iter()
            .map(|o| format!("- {}", o.message))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let missing = context.missing_keywords();
    let missing_keywords = if missing.is_empty() {
        "none".to_string()
    } else {
        missing.join(", ")
    };

    let cv_text = context.document.full_text();

    fill(
        SUGGESTION_PROMPT_TEMPLATE,
        &[
            ("target_role", context.target_role.unwrap_or("general")),
            ("observations", observations.as_str()),
            ("missing_keywords", missing_keywords.as_str()),
            ("cv_text", cv_text.as_str()),
        ],
    )
}
