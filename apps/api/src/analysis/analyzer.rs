//! Résumé Scoring & Gap Analyzer.
//!
//! Pure and synchronous: scores a [`Document`] on four independent
//! dimensions, runs the observation checklist and reports keyword coverage
//! for the target role. No LLM involvement.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::keywords::{
    keyword_density, match_keywords, select_keywords, KeywordMatch, KeywordSource,
};
use crate::analysis::patterns::{
    bullet_marker, count_metrics, has_email, has_non_text_glyphs, has_phone, is_table_like,
};
use crate::analysis::rules::{run_checklist, Observation, RUN_ON_CHARS};
use crate::analysis::score::ScoreBreakdown;
use crate::analysis::sections::SectionKind;
use crate::analysis::text::{contains_phrase, normalize};
use crate::models::document::{Document, Section};

const ACTION_VERBS: &[&str] = &[
    "achieved",
    "developed",
    "managed",
    "led",
    "created",
    "implemented",
    "improved",
    "increased",
    "reduced",
    "optimized",
    "delivered",
    "collaborated",
    "designed",
    "built",
    "analyzed",
    "executed",
    "launched",
    "architected",
    "automated",
    "mentored",
];

/// Experience-like sections shorter than this many lines are penalised.
const MIN_EXPERIENCE_LINES: usize = 2;
const SHORT_SECTION_PENALTY: f64 = 5.0;
const MAX_SHORT_SECTION_PENALTY: f64 = 20.0;

/// Word counts at which a section earns full length credit.
const SUMMARY_IDEAL_WORDS: f64 = 50.0;
const EXPERIENCE_IDEAL_WORDS: f64 = 200.0;
const SECTION_IDEAL_WORDS: f64 = 30.0;

const TABLE_LINE_PENALTY: f64 = 10.0;
const MAX_TABLE_PENALTY: f64 = 30.0;
const GLYPH_LINE_PENALTY: f64 = 5.0;
const MAX_GLYPH_PENALTY: f64 = 20.0;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("document is empty: at least one section must contain text")]
    EmptyDocument,
}

/// Everything one scoring call produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub breakdown: ScoreBreakdown,
    pub observations: Vec<Observation>,
    pub keyword_matches: Vec<KeywordMatch>,
    pub keyword_source: KeywordSource,
    /// Content quality of each section with text, keyed by section name.
    pub section_scores: BTreeMap<String, f64>,
}

impl AnalysisReport {
    pub fn missing_keywords(&self) -> impl Iterator<Item = &str> {
        self.keyword_matches
            .iter()
            .filter(|m| !m.present)
            .map(|m| m.keyword.as_str())
    }
}

/// Scores a résumé. Fails only when no section carries text; an unknown
/// role or industry silently selects the generic keyword list.
pub fn score(
    document: &Document,
    target_role: Option<&str>,
    target_industry: Option<&str>,
) -> Result<AnalysisReport, AnalysisError> {
    if !document.has_content() {
        return Err(AnalysisError::EmptyDocument);
    }

    let keyword_list = select_keywords(target_role, target_industry);
    let keyword_matches = match_keywords(document, keyword_list.keywords);

    let breakdown = ScoreBreakdown::from_parts(
        content_quality(document),
        ats_compatibility(document),
        keyword_density(&keyword_matches),
        formatting(document),
    );
    let observations = run_checklist(document);

    debug!(
        "Scored document: overall={:.1} content={:.1} ats={:.1} keywords={:.1} formatting={:.1} observations={}",
        breakdown.overall,
        breakdown.content_quality,
        breakdown.ats_compatibility,
        breakdown.keyword_density,
        breakdown.formatting,
        observations.len()
    );

    Ok(AnalysisReport {
        breakdown,
        observations,
        keyword_matches,
        keyword_source: keyword_list.source,
        section_scores: section_scores(document),
    })
}

/// Metrics in experience-like sections (40), depth of the standard sections
/// (30) and action verbs (30), less a penalty for one-line experience blocks.
pub fn content_quality(document: &Document) -> Option<f64> {
    if document.word_count() == 0 {
        return None;
    }

    let metrics: usize = document
        .sections()
        .iter()
        .filter(|s| s.kind().is_experience_like())
        .map(|s| count_metrics(&s.text()))
        .sum();
    let metrics_points = (metrics as f64 / 3.0).min(1.0) * 40.0;

    // Fixed denominator: adding a section can only raise this part.
    let deep_sections = SectionKind::STANDARD
        .iter()
        .filter(|kind| {
            let words: usize = document.sections_of(**kind).map(|s| s.word_count()).sum();
            words >= kind.min_words()
        })
        .count();
    let depth_points = deep_sections as f64 / SectionKind::STANDARD.len() as f64 * 30.0;

    let text = document.normalized_text();
    let verbs = ACTION_VERBS
        .iter()
        .filter(|v| contains_phrase(&text, v))
        .count();
    let verb_points = (verbs as f64 / 5.0).min(1.0) * 30.0;

    let short_sections = document
        .sections()
        .iter()
        .filter(|s| s.kind().is_experience_like() && s.has_content())
        .filter(|s| s.content_lines().count() < MIN_EXPERIENCE_LINES)
        .count();
    let penalty = (short_sections as f64 * SHORT_SECTION_PENALTY).min(MAX_SHORT_SECTION_PENALTY);

    Some(metrics_points + depth_points + verb_points - penalty)
}

/// Per-section content quality in [0, 100]: length against an ideal for the
/// section kind (30), action verbs (30) and quantified achievements (40).
/// Blank sections are skipped; a repeated name keeps its first score.
pub fn section_scores(document: &Document) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    for section in document.sections().iter().filter(|s| s.has_content()) {
        scores
            .entry(section.name.clone())
            .or_insert_with(|| section_quality(section));
    }
    scores
}

fn section_quality(section: &Section) -> f64 {
    let ideal_words = match section.kind() {
        SectionKind::Summary => SUMMARY_IDEAL_WORDS,
        kind if kind.is_experience_like() => EXPERIENCE_IDEAL_WORDS,
        _ => SECTION_IDEAL_WORDS,
    };
    let length_points = (section.word_count() as f64 / ideal_words).min(1.0) * 30.0;

    let text = section.text();
    let normalized = normalize(&text);
    let verbs = ACTION_VERBS
        .iter()
        .filter(|v| contains_phrase(&normalized, v))
        .count();
    let verb_points = (verbs as f64 / 5.0).min(1.0) * 30.0;

    let metric_points = (count_metrics(&text) as f64 / 3.0).min(1.0) * 40.0;

    (length_points + verb_points + metric_points).clamp(0.0, 100.0)
}

/// Expected sections (85), contact details (15), less penalties for table
/// layouts and non-text glyphs that ATS parsers mangle.
pub fn ats_compatibility(document: &Document) -> Option<f64> {
    let present = SectionKind::STANDARD
        .iter()
        .filter(|kind| document.has_section(**kind))
        .count();
    let mut score = present as f64 / SectionKind::STANDARD.len() as f64 * 85.0;

    let text = document.full_text();
    if has_email(&text) {
        score += 7.5;
    }
    if has_phone(&text) {
        score += 7.5;
    }

    let lines: Vec<&str> = document
        .sections()
        .iter()
        .flat_map(|s| s.content_lines())
        .collect();
    let tables = lines.iter().filter(|l| is_table_like(l)).count();
    let glyphs = lines.iter().filter(|l| has_non_text_glyphs(l)).count();
    score -= (tables as f64 * TABLE_LINE_PENALTY).min(MAX_TABLE_PENALTY);
    score -= (glyphs as f64 * GLYPH_LINE_PENALTY).min(MAX_GLYPH_PENALTY);

    Some(score)
}

/// Bullet consistency (35), bullet usage in experience (20), absence of
/// run-on single-line sections (30) and overall length (15).
pub fn formatting(document: &Document) -> Option<f64> {
    let sections: Vec<_> = document
        .sections()
        .iter()
        .filter(|s| s.has_content())
        .collect();
    if sections.is_empty() {
        return None;
    }

    let multi_line: Vec<_> = sections
        .iter()
        .filter(|s| s.content_lines().count() >= 2)
        .collect();
    let consistency = if multi_line.is_empty() {
        1.0
    } else {
        let consistent = multi_line
            .iter()
            .filter(|s| {
                let styles: HashSet<String> = s.content_lines().filter_map(bullet_marker).collect();
                styles.len() <= 1
            })
            .count();
        consistent as f64 / multi_line.len() as f64
    };

    let uses_bullets = sections
        .iter()
        .filter(|s| s.kind().is_experience_like())
        .any(|s| s.content_lines().any(|l| bullet_marker(l).is_some()));

    let run_on = sections
        .iter()
        .filter(|s| {
            let mut lines = s.content_lines();
            matches!((lines.next(), lines.next()), (Some(only), None) if only.chars().count() > RUN_ON_CHARS)
        })
        .count();
    let run_on_free = 1.0 - run_on as f64 / sections.len() as f64;

    let words = document.word_count();
    let length_points = match words {
        300..=800 => 15.0,
        0..=299 => 5.0,
        _ => 0.0,
    };

    Some(
        consistency * 35.0
            + if uses_bullets { 20.0 } else { 0.0 }
            + run_on_free * 30.0
            + length_points,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::ScoringWeights;
    use crate::models::document::Section;

    fn software_engineer_cv() -> Document {
        Document::new(vec![
            Section::new(
                "summary",
                ["Software engineer with a track record of building reliable web platforms for fast-growing product teams."],
            ),
            Section::new(
                "experience",
                [
                    "Senior Software Engineer, Tech Company (2021 - Present)",
                    "- Developed scalable web applications using Python and React",
                    "- Led a team of 3 developers on a microservices migration",
                    "- Improved system performance by 40% through query optimization",
                ],
            ),
            Section::new(
                "education",
                ["Bachelor of Science in Computer Science, State University, 2019"],
            ),
            Section::new("skills", ["Python, JavaScript, Java, Go"]),
        ])
    }

    fn all_scores(b: &ScoreBreakdown) -> [f64; 5] {
        [
            b.content_quality,
            b.ats_compatibility,
            b.keyword_density,
            b.formatting,
            b.overall,
        ]
    }

    #[test]
    fn test_end_to_end_software_engineer() {
        let cv = software_engineer_cv();
        let report = score(&cv, Some("Software Engineer"), None).unwrap();

        assert_eq!(
            report.keyword_source,
            KeywordSource::Role("software engineer".to_string())
        );

        // The 40% metric lifts content quality above the same CV without it.
        let mut without_metric = cv.clone();
        without_metric.sections[1].lines[3] =
            "- Improved system performance through query optimization".to_string();
        let baseline = score(&without_metric, Some("Software Engineer"), None).unwrap();
        assert!(report.breakdown.content_quality > baseline.breakdown.content_quality);

        // All four standard sections present.
        assert!(
            report.breakdown.ats_compatibility >= 80.0,
            "ats was {}",
            report.breakdown.ats_compatibility
        );

        let missing: Vec<&str> = report.missing_keywords().collect();
        assert!(missing.contains(&"algorithms"));
        assert!(missing.contains(&"api"));

        assert!(report.breakdown.overall > 0.0 && report.breakdown.overall < 100.0);
    }

    #[test]
    fn test_empty_document_is_invalid_input() {
        assert_eq!(
            score(&Document::default(), None, None).unwrap_err(),
            AnalysisError::EmptyDocument
        );
        let blank = Document::new(vec![Section::new("experience", ["", "   "])]);
        assert_eq!(score(&blank, None, None).unwrap_err(), AnalysisError::EmptyDocument);
    }

    #[test]
    fn test_scores_bounded_for_varied_documents() {
        let long_line = "word ".repeat(300);
        let docs = vec![
            software_engineer_cv(),
            Document::new(vec![Section::new("content", ["hello"])]),
            Document::new(vec![Section::new("experience", [long_line.as_str()])]),
            Document::new(vec![Section::new(
                "skills",
                ["Python | Go | Rust", "☎ 555 123 4567", "┌────┐", "Java\tKotlin"],
            )]),
        ];
        for doc in docs {
            let report = score(&doc, Some("data scientist"), Some("technology")).unwrap();
            for value in all_scores(&report.breakdown) {
                assert!((0.0..=100.0).contains(&value), "score out of range: {value}");
            }
        }
    }

    #[test]
    fn test_overall_equals_weighted_sum_of_report() {
        let report = score(&software_engineer_cv(), None, Some("technology")).unwrap();
        let b = &report.breakdown;
        let expected = b.weighted_sum(&ScoringWeights::default());
        assert!((b.overall - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_experience_never_beats_experience_with_metrics() {
        let with_experience = software_engineer_cv();
        let mut without_experience = with_experience.clone();
        without_experience.sections.remove(1);

        let with = content_quality(&with_experience).unwrap();
        let without = content_quality(&without_experience).unwrap();
        assert!(without <= with, "without={without} with={with}");
    }

    #[test]
    fn test_one_line_experience_with_metric_still_beats_no_experience() {
        let base = Document::new(vec![Section::new("summary", ["Analyst."])]);
        let mut with = base.clone();
        with.sections
            .push(Section::new("experience", ["Grew revenue 25% in one year"]));
        assert!(content_quality(&base).unwrap() <= content_quality(&with).unwrap());
    }

    #[test]
    fn test_keyword_matching_case_insensitive_through_score() {
        let doc = Document::new(vec![Section::new("skills", ["Python"])]);
        let report = score(&doc, None, Some("technology")).unwrap();
        let python = report
            .keyword_matches
            .iter()
            .find(|m| m.keyword == "python")
            .unwrap();
        assert!(python.present);
    }

    #[test]
    fn test_unknown_target_uses_generic_list() {
        let report = score(&software_engineer_cv(), Some("Zookeeper"), Some("Circus")).unwrap();
        assert_eq!(report.keyword_source, KeywordSource::Generic);
        assert!(!report.keyword_matches.is_empty());
    }

    #[test]
    fn test_ats_rewards_contact_and_penalises_tables() {
        let mut cv = software_engineer_cv();
        let base = ats_compatibility(&cv).unwrap();

        cv.sections
            .insert(0, Section::new("contact", ["jane@example.com", "(555) 123-4567"]));
        let with_contact = ats_compatibility(&cv).unwrap();
        assert!((with_contact - base - 15.0).abs() < 1e-9);

        cv.sections.push(Section::new(
            "projects",
            ["Name | Stack | Year", "Ledger | Rust | 2023"],
        ));
        let with_tables = ats_compatibility(&cv).unwrap();
        assert!((with_contact - with_tables - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_formatting_penalises_run_on_and_mixed_bullets() {
        let tidy = Document::new(vec![Section::new(
            "experience",
            ["- Built the ledger", "- Ran the on-call rotation"],
        )]);
        let mixed = Document::new(vec![Section::new(
            "experience",
            ["- Built the ledger", "• Ran the on-call rotation"],
        )]);
        let run_on = Document::new(vec![Section::new("experience", ["word ".repeat(50)])]);

        let tidy_score = formatting(&tidy).unwrap();
        assert!(tidy_score > formatting(&mixed).unwrap());
        assert!(tidy_score > formatting(&run_on).unwrap());
    }

    #[test]
    fn test_section_scores_cover_each_section_with_text() {
        let mut doc = software_engineer_cv();
        doc.sections.push(Section::new("projects", ["", "  "]));
        let report = score(&doc, Some("Software Engineer"), None).unwrap();

        let names: Vec<&str> = report.section_scores.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["education", "experience", "skills", "summary"]);
        assert!(report
            .section_scores
            .values()
            .all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn test_section_scores_reward_verbs_and_metrics() {
        let scores = section_scores(&software_engineer_cv());
        assert!(scores["experience"] > scores["skills"]);

        let plain = Document::new(vec![Section::new(
            "experience",
            ["- Maintained the billing service for the finance team"],
        )]);
        let quantified = Document::new(vec![Section::new(
            "experience",
            ["- Reduced billing errors by 35% and delivered 3 releases ahead of schedule"],
        )]);
        assert!(section_scores(&quantified)["experience"] > section_scores(&plain)["experience"]);
    }
}
