//! Observation checklist: a fixed list of independent document predicates.
//!
//! Each rule yields at most one [`Observation`]. Output order is the
//! checklist order below, never the order of sections in the input.

use serde::{Deserialize, Serialize};

use crate::analysis::patterns::{
    count_metrics, has_duration, has_email, has_phone, has_year_range, is_bullet,
};
use crate::analysis::sections::SectionKind;
use crate::models::document::Document;

/// Word count under which an essential section is considered thin.
pub const MIN_SECTION_WORDS: usize = 10;
/// Comma or line separated items a skills section should list.
pub const MIN_SKILL_ITEMS: usize = 5;
/// Characters after which a single line reads as a run-on paragraph.
pub const RUN_ON_CHARS: usize = 200;

pub const EXPERIENCE_NO_DURATION: &str = "experience-no-duration";
pub const EXPERIENCE_NO_BULLETS: &str = "experience-no-bullets";
pub const EXPERIENCE_NO_METRICS: &str = "experience-no-metrics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A detected weakness, tagged with the rule that found it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub rule: String,
    pub section: Option<String>,
    pub message: String,
    pub severity: Severity,
}

/// What a rule reports before it is stamped with the rule id.
#[derive(Debug)]
pub struct Finding {
    pub severity: Severity,
    pub section: Option<SectionKind>,
    pub message: String,
}

impl Finding {
    fn new(severity: Severity, section: Option<SectionKind>, message: impl Into<String>) -> Self {
        Self {
            severity,
            section,
            message: message.into(),
        }
    }
}

pub struct Rule {
    pub id: &'static str,
    check: fn(&Document) -> Option<Finding>,
}

impl Rule {
    pub fn evaluate(&self, document: &Document) -> Option<Observation> {
        (self.check)(document).map(|f| Observation {
            rule: self.id.to_string(),
            section: f.section.map(|k| k.as_str().to_string()),
            message: f.message,
            severity: f.severity,
        })
    }
}

pub const CHECKLIST: &[Rule] = &[
    Rule { id: "missing-experience", check: missing_experience },
    Rule { id: "missing-skills", check: missing_skills },
    Rule { id: "missing-education", check: missing_education },
    Rule { id: "thin-experience", check: thin_experience },
    Rule { id: "thin-skills", check: thin_skills },
    Rule { id: "thin-education", check: thin_education },
    Rule { id: "missing-summary", check: missing_summary },
    Rule { id: "missing-contact", check: missing_contact },
    Rule { id: EXPERIENCE_NO_DURATION, check: experience_without_duration },
    Rule { id: EXPERIENCE_NO_BULLETS, check: experience_without_bullets },
    Rule { id: EXPERIENCE_NO_METRICS, check: experience_without_metrics },
    Rule { id: "limited-skills", check: limited_skills },
    Rule { id: "run-on-line", check: run_on_line },
];

/// Runs every rule in checklist order.
pub fn run_checklist(document: &Document) -> Vec<Observation> {
    CHECKLIST
        .iter()
        .filter_map(|rule| rule.evaluate(document))
        .collect()
}

fn missing_essential(document: &Document, kind: SectionKind) -> Option<Finding> {
    (!document.has_section(kind)).then(|| {
        Finding::new(
            Severity::High,
            Some(kind),
            format!("Missing essential section: {kind}"),
        )
    })
}

fn thin_section(document: &Document, kind: SectionKind) -> Option<Finding> {
    let words: usize = document.sections_of(kind).map(|s| s.word_count()).sum();
    (document.has_section(kind) && words < MIN_SECTION_WORDS).then(|| {
        Finding::new(
            Severity::Medium,
            Some(kind),
            format!("Insufficient content in {kind} section"),
        )
    })
}

fn missing_experience(document: &Document) -> Option<Finding> {
    missing_essential(document, SectionKind::Experience)
}

fn missing_skills(document: &Document) -> Option<Finding> {
    missing_essential(document, SectionKind::Skills)
}

fn missing_education(document: &Document) -> Option<Finding> {
    missing_essential(document, SectionKind::Education)
}

fn thin_experience(document: &Document) -> Option<Finding> {
    thin_section(document, SectionKind::Experience)
}

fn thin_skills(document: &Document) -> Option<Finding> {
    thin_section(document, SectionKind::Skills)
}

fn thin_education(document: &Document) -> Option<Finding> {
    thin_section(document, SectionKind::Education)
}

fn missing_summary(document: &Document) -> Option<Finding> {
    (!document.has_section(SectionKind::Summary)).then(|| {
        Finding::new(
            Severity::Low,
            Some(SectionKind::Summary),
            "Consider adding summary section",
        )
    })
}

/// Contact details often sit above the first header, so an email or phone
/// anywhere satisfies this rule.
fn missing_contact(document: &Document) -> Option<Finding> {
    if document.has_section(SectionKind::Contact) {
        return None;
    }
    let text = document.full_text();
    (!has_email(&text) && !has_phone(&text)).then(|| {
        Finding::new(
            Severity::Low,
            Some(SectionKind::Contact),
            "Consider adding contact section",
        )
    })
}

fn experience_without_duration(document: &Document) -> Option<Finding> {
    let text = document.text_of(SectionKind::Experience)?;
    (!has_year_range(&text) && !has_duration(&text)).then(|| {
        Finding::new(
            Severity::Medium,
            Some(SectionKind::Experience),
            "Experience section lacks duration information",
        )
    })
}

fn experience_without_bullets(document: &Document) -> Option<Finding> {
    let lines = document.lines_of(SectionKind::Experience);
    (!lines.is_empty() && !lines.iter().any(|l| is_bullet(l))).then(|| {
        Finding::new(
            Severity::Low,
            Some(SectionKind::Experience),
            "Experience section would benefit from bullet points",
        )
    })
}

fn experience_without_metrics(document: &Document) -> Option<Finding> {
    let text = document.text_of(SectionKind::Experience)?;
    (count_metrics(&text) == 0).then(|| {
        Finding::new(
            Severity::Medium,
            Some(SectionKind::Experience),
            "Experience section lacks quantified achievements",
        )
    })
}

fn limited_skills(document: &Document) -> Option<Finding> {
    let lines = document.lines_of(SectionKind::Skills);
    if lines.is_empty() {
        return None;
    }
    (count_skill_items(&lines) < MIN_SKILL_ITEMS).then(|| {
        Finding::new(
            Severity::Medium,
            Some(SectionKind::Skills),
            "Skills section appears limited - consider adding more relevant skills",
        )
    })
}

/// Items separated by commas, semicolons, pipes, bullets or line breaks.
pub fn count_skill_items(lines: &[&str]) -> usize {
    lines
        .iter()
        .flat_map(|l| l.split(|c| matches!(c, ',' | ';' | '|' | '•' | '·')))
        .map(|item| item.trim().trim_start_matches(['-', '*']).trim())
        .filter(|item| !item.is_empty())
        .count()
}

fn run_on_line(document: &Document) -> Option<Finding> {
    let section = document
        .sections()
        .iter()
        .find(|s| s.content_lines().any(|l| l.chars().count() > RUN_ON_CHARS))?;
    Some(Finding::new(
        Severity::Low,
        Some(section.kind()).filter(|k| *k != SectionKind::Other),
        format!(
            "The {} section contains a line over {RUN_ON_CHARS} characters; split it into bullet points",
            section.name
        ),
    ))
}
