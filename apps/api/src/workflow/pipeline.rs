//! Improvement workflow: a fixed linear pipeline over one CV.
//!
//! Flow: parse → analyze_quality → match_requirements → generate_improvements →
//!       (apply_improvements when a suggestion qualifies) → quality_check.
//!
//! Parse and analysis failures abort the run. A failing suggestion generator
//! does not: the error is recorded in `processing_errors` and the run goes on.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::{score, AnalysisReport};
use crate::analysis::keywords::KeywordSource;
use crate::analysis::rules::{Observation, Severity};
use crate::analysis::sections::SectionKind;
use crate::errors::AppError;
use crate::improvement::apply::{apply_improvements, NO_IMPROVEMENTS_APPLIED};
use crate::improvement::generator::{SuggestionContext, SuggestionGenerator};
use crate::improvement::models::Improvement;
use crate::improvement::questions::follow_up_questions;
use crate::matching::fit_scoring::{match_cv, suggestions_for};
use crate::matching::jd_parser::parse_job_description;
use crate::parsing::formats::parse_text;
use crate::workflow::state::{CvSource, StepTiming, WorkflowInput, WorkflowOutcome, WorkflowStep};

pub const ROLE_KEYWORD_RULE: &str = "missing-role-keywords";
const MAX_ROLE_KEYWORDS: usize = 5;

const QUALITY_WITH_IMPROVEMENTS: f64 = 85.0;
const QUALITY_WITHOUT_IMPROVEMENTS: f64 = 70.0;

const SUMMARY_OBSERVATIONS: usize = 3;

#[derive(Default)]
struct StepClock {
    timings: Vec<StepTiming>,
    completed: Vec<WorkflowStep>,
}

impl StepClock {
    fn record(&mut self, step: WorkflowStep, started: Instant) {
        self.timings.push(StepTiming {
            step,
            duration_ms: started.elapsed().as_millis() as u64,
        });
        self.completed.push(step);
    }
}

/// Runs the whole pipeline for one CV.
pub async fn run(
    input: WorkflowInput,
    generator: &dyn SuggestionGenerator,
) -> Result<WorkflowOutcome, AppError> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let run_started = Instant::now();
    let mut clock = StepClock::default();
    let mut processing_errors = Vec::new();

    info!("Workflow {run_id} started (generator: {})", generator.backend());

    // parse
    let step = Instant::now();
    let parsed = match input.source {
        CvSource::Text(text) => parse_text(&text)?,
        CvSource::Parsed(parsed) => parsed,
    };
    let document = parsed.document;
    clock.record(WorkflowStep::Parse, step);

    // analyze_quality
    let step = Instant::now();
    let target_role = input.target_role.as_deref();
    let analysis = score(&document, target_role, input.target_industry.as_deref())?;
    clock.record(WorkflowStep::AnalyzeQuality, step);

    // match_requirements
    let step = Instant::now();
    let mut observations = analysis.observations.clone();
    observations.extend(role_keyword_observation(&analysis, target_role));
    let questions = follow_up_questions(&document, target_role, input.target_industry.as_deref());

    let jd_text = input
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|jd| !jd.is_empty());
    let (job_description, job_match, mut suggestions) = match jd_text {
        Some(jd_text) => {
            let jd = parse_job_description(jd_text);
            let report = match_cv(&document, &jd);
            let jd_suggestions = suggestions_for(&report);
            info!(
                "Workflow {run_id}: JD match {:.1}/100 for '{}'",
                report.overall_score, jd.job_title
            );
            (Some(jd), Some(report), jd_suggestions)
        }
        None => (None, None, Vec::new()),
    };
    clock.record(WorkflowStep::MatchRequirements, step);

    // generate_improvements
    let step = Instant::now();
    let context = SuggestionContext {
        document: &document,
        observations: &observations,
        keyword_matches: &analysis.keyword_matches,
        target_role,
    };
    match generator.generate(&context).await {
        Ok(generated) => suggestions.extend(generated),
        Err(e) => {
            warn!("Workflow {run_id}: suggestion generation failed: {e}");
            processing_errors.push(format!("generate_improvements: {e}"));
        }
    }
    clock.record(WorkflowStep::GenerateImprovements, step);

    // apply_improvements (conditional)
    let enhanced = match next_after_generation(&suggestions) {
        WorkflowStep::ApplyImprovements => {
            let step = Instant::now();
            let enhanced = apply_improvements(&document, &suggestions);
            clock.record(WorkflowStep::ApplyImprovements, step);
            Some(enhanced)
        }
        _ => None,
    };

    // quality_check
    let step = Instant::now();
    let (applied_improvements, enhanced_cv, enhancement_summary) = match enhanced {
        Some(enhanced) => (enhanced.applied, Some(enhanced.text), enhanced.summary),
        None => (Vec::new(), None, NO_IMPROVEMENTS_APPLIED.to_string()),
    };
    let final_quality_score = if applied_improvements.is_empty() {
        QUALITY_WITHOUT_IMPROVEMENTS
    } else {
        QUALITY_WITH_IMPROVEMENTS
    };
    clock.record(WorkflowStep::QualityCheck, step);

    let summary = build_summary(
        run_id,
        &analysis,
        &observations,
        applied_improvements.len(),
        &enhancement_summary,
        &processing_errors,
    );

    let total_duration_ms = run_started.elapsed().as_millis() as u64;
    info!(
        "Workflow {run_id} finished in {total_duration_ms}ms: score={:.1}, suggestions={}, applied={}",
        analysis.breakdown.overall,
        suggestions.len(),
        applied_improvements.len()
    );

    Ok(WorkflowOutcome {
        run_id,
        started_at,
        document,
        analysis,
        observations,
        job_description,
        job_match,
        follow_up_questions: questions,
        suggestion_backend: generator.backend().to_string(),
        suggested_improvements: suggestions,
        applied_improvements,
        enhanced_cv,
        enhancement_summary,
        final_quality_score,
        processing_errors,
        completed_steps: clock.completed,
        timings: clock.timings,
        total_duration_ms,
        summary,
    })
}

/// Routing after generation: apply only when some suggestion qualifies.
pub fn next_after_generation(suggestions: &[Improvement]) -> WorkflowStep {
    if suggestions.iter().any(Improvement::should_apply) {
        WorkflowStep::ApplyImprovements
    } else {
        WorkflowStep::QualityCheck
    }
}

/// "Consider adding keywords relevant to <role>: a, b, c" for up to five
/// missing keywords. Only emitted when the keywords came from the role table.
fn role_keyword_observation(analysis: &AnalysisReport, target_role: Option<&str>) -> Option<Observation> {
    if !matches!(analysis.keyword_source, KeywordSource::Role(_)) {
        return None;
    }
    let role = target_role.map(str::trim).filter(|r| !r.is_empty())?;
    let missing: Vec<&str> = analysis.missing_keywords().take(MAX_ROLE_KEYWORDS).collect();
    if missing.is_empty() {
        return None;
    }

    Some(Observation {
        rule: ROLE_KEYWORD_RULE.to_string(),
        section: Some(SectionKind::Skills.as_str().to_string()),
        message: format!(
            "Consider adding keywords relevant to {role}: {}",
            missing.join(", ")
        ),
        severity: Severity::Medium,
    })
}

fn build_summary(
    run_id: Uuid,
    analysis: &AnalysisReport,
    observations: &[Observation],
    applied: usize,
    enhancement_summary: &str,
    processing_errors: &[String],
) -> String {
    let mut lines = vec![
        format!("CV analysis complete (run {run_id})"),
        format!("Overall score: {:.1}/100", analysis.breakdown.overall),
    ];

    if !observations.is_empty() {
        lines.push("Top observations:".to_string());
        lines.extend(
            observations
                .iter()
                .take(SUMMARY_OBSERVATIONS)
                .map(|o| format!("- {}", o.message)),
        );
    }

    lines.push(format!("Improvements applied: {applied}"));
    lines.push(enhancement_summary.to_string());

    if !processing_errors.is_empty() {
        lines.push(format!("Processing issues: {}", processing_errors.len()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::improvement::generator::RuleBasedSuggestionGenerator;
    use crate::improvement::models::{ImprovementKind, Priority};
    use crate::improvement::questions::{QuestionTopic, MAX_QUESTIONS};
    use crate::models::document::Document;
    use crate::parsing::formats::{DocumentFormat, ParsedCv};

    const CV_TEXT: &str = "Jane Doe\njane@example.com\n\n\
        SUMMARY\nBackend engineer building payment systems for high-growth fintech teams.\n\n\
        EXPERIENCE\nSenior Engineer, Acme (2019 - Present)\n\
        - Responsible for the billing platform serving 2M users\n\
        - Improved p99 latency by 40%\n\n\
        EDUCATION\nBSc Computer Science, 2015\n\n\
        SKILLS\nRust, Go, Python, PostgreSQL, Kubernetes\n";

    fn clean_cv() -> String {
        CV_TEXT.replace("Responsible for", "Led")
    }

    struct FailingGenerator;

    #[async_trait]
    impl SuggestionGenerator for FailingGenerator {
        fn backend(&self) -> &'static str {
            "failing"
        }

        async fn generate(
            &self,
            _context: &SuggestionContext<'_>,
        ) -> Result<Vec<Improvement>, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("model offline")))
        }
    }

    fn input(text: &str, role: Option<&str>, jd: Option<&str>) -> WorkflowInput {
        WorkflowInput {
            source: CvSource::Text(text.to_string()),
            target_role: role.map(str::to_string),
            target_industry: None,
            job_description: jd.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_run_applies_high_confidence_rewrite() {
        let outcome = run(input(CV_TEXT, Some("Software Engineer"), None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();

        assert!(outcome.completed_steps.contains(&WorkflowStep::ApplyImprovements));
        assert_eq!(outcome.final_quality_score, 85.0);
        assert!(!outcome.applied_improvements.is_empty());
        assert!(outcome.applied_improvements.iter().all(Improvement::should_apply));

        let enhanced = outcome.enhanced_cv.unwrap();
        assert!(enhanced.contains("- Led the billing platform serving 2M users"));
        assert!(enhanced.starts_with("CONTENT\nJane Doe"));
        assert!(outcome.enhancement_summary.starts_with("Applied improvements:"));
    }

    #[tokio::test]
    async fn test_run_skips_apply_without_qualifying_suggestions() {
        let outcome = run(input(&clean_cv(), None, None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();

        assert!(!outcome.completed_steps.contains(&WorkflowStep::ApplyImprovements));
        assert_eq!(outcome.final_quality_score, 70.0);
        assert!(outcome.enhanced_cv.is_none());
        assert_eq!(outcome.enhancement_summary, NO_IMPROVEMENTS_APPLIED);
        assert_eq!(
            outcome.completed_steps,
            vec![
                WorkflowStep::Parse,
                WorkflowStep::AnalyzeQuality,
                WorkflowStep::MatchRequirements,
                WorkflowStep::GenerateImprovements,
                WorkflowStep::QualityCheck,
            ]
        );
        assert_eq!(outcome.timings.len(), 5);
    }

    #[tokio::test]
    async fn test_generator_failure_is_recorded_not_fatal() {
        let outcome = run(input(&clean_cv(), None, None), &FailingGenerator)
            .await
            .unwrap();

        assert_eq!(outcome.processing_errors.len(), 1);
        assert!(outcome.processing_errors[0].contains("model offline"));
        assert!(outcome.suggested_improvements.is_empty());
        assert!(outcome.summary.contains("Processing issues: 1"));
        assert_eq!(outcome.final_quality_score, 70.0);
    }

    #[tokio::test]
    async fn test_role_keyword_observation_added() {
        let outcome = run(input(&clean_cv(), Some("Software Engineer"), None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();

        let observation = outcome
            .observations
            .iter()
            .find(|o| o.rule == ROLE_KEYWORD_RULE)
            .unwrap();
        assert!(observation
            .message
            .starts_with("Consider adding keywords relevant to Software Engineer: "));
        let listed = observation.message.split(": ").nth(1).unwrap();
        assert!(listed.split(", ").count() <= MAX_ROLE_KEYWORDS);
        assert_eq!(outcome.observations.len(), outcome.analysis.observations.len() + 1);
    }

    #[tokio::test]
    async fn test_follow_up_questions_reflect_missing_targets() {
        let outcome = run(input(&clean_cv(), None, None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();

        let topics: Vec<QuestionTopic> = outcome.follow_up_questions.iter().map(|q| q.topic).collect();
        assert_eq!(topics[..2], [QuestionTopic::TargetRole, QuestionTopic::TargetIndustry]);
        assert!(outcome.follow_up_questions.len() <= MAX_QUESTIONS);
    }

    #[tokio::test]
    async fn test_unknown_role_gets_no_role_keyword_observation() {
        let outcome = run(input(&clean_cv(), Some("Astronaut"), None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();

        assert_eq!(outcome.analysis.keyword_source, KeywordSource::Generic);
        assert!(outcome.observations.iter().all(|o| o.rule != ROLE_KEYWORD_RULE));
        assert_eq!(outcome.observations.len(), outcome.analysis.observations.len());
    }

    #[tokio::test]
    async fn test_job_description_adds_match_and_suggestions() {
        let jd = "Job Title: Platform Engineer\nRequired: Rust, Kubernetes, AWS, Terraform.";
        let outcome = run(input(&clean_cv(), None, Some(jd)), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();

        let report = outcome.job_match.unwrap();
        assert_eq!(report.job_title, "Platform Engineer");
        assert_eq!(report.technical_skills.missing, vec!["aws", "terraform"]);
        assert!(outcome
            .suggested_improvements
            .iter()
            .any(|s| s.kind == ImprovementKind::Keyword && s.improved_text.contains("terraform")));
        assert_eq!(outcome.job_description.unwrap().job_title, "Platform Engineer");
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let err = run(input("   \n", None, None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_empty_parsed_document_is_invalid_input() {
        let parsed = ParsedCv {
            format: DocumentFormat::Pdf,
            raw_text: "x".to_string(),
            document: Document::default(),
        };
        let input = WorkflowInput {
            source: CvSource::Parsed(parsed),
            ..WorkflowInput::from_text("")
        };
        let err = run(input, &RuleBasedSuggestionGenerator).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_next_after_generation_routes_on_confidence() {
        let mut suggestion = Improvement {
            section: "experience".to_string(),
            kind: ImprovementKind::Content,
            original_text: String::new(),
            improved_text: "x".to_string(),
            reasoning: "y".to_string(),
            priority: Priority::High,
            confidence: 0.9,
        };
        assert_eq!(
            next_after_generation(std::slice::from_ref(&suggestion)),
            WorkflowStep::ApplyImprovements
        );
        suggestion.confidence = 0.5;
        assert_eq!(next_after_generation(&[suggestion]), WorkflowStep::QualityCheck);
        assert_eq!(next_after_generation(&[]), WorkflowStep::QualityCheck);
    }

    #[tokio::test]
    async fn test_summary_lists_score_and_top_observations() {
        let outcome = run(input(CV_TEXT, None, None), &RuleBasedSuggestionGenerator)
            .await
            .unwrap();
        assert!(outcome.summary.contains("Overall score: "));
        assert!(outcome.summary.contains(&outcome.run_id.to_string()));
        assert!(outcome.summary.contains("Improvements applied: "));
    }
}
