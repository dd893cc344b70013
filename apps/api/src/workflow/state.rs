use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::analyzer::AnalysisReport;
use crate::analysis::rules::Observation;
use crate::improvement::models::Improvement;
use crate::improvement::questions::Question;
use crate::matching::fit_scoring::MatchReport;
use crate::matching::jd_parser::JobDescription;
use crate::models::document::Document;
use crate::parsing::formats::ParsedCv;

/// Where the CV comes from: raw text to be sectioned, or an already parsed upload.
#[derive(Debug, Clone)]
pub enum CvSource {
    Text(String),
    Parsed(ParsedCv),
}

#[derive(Debug, Clone)]
pub struct WorkflowInput {
    pub source: CvSource,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
    pub job_description: Option<String>,
}

impl WorkflowInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: CvSource::Text(text.into()),
            target_role: None,
            target_industry: None,
            job_description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Parse,
    AnalyzeQuality,
    MatchRequirements,
    GenerateImprovements,
    ApplyImprovements,
    QualityCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTiming {
    pub step: WorkflowStep,
    pub duration_ms: u64,
}

/// Everything one run of the pipeline produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub document: Document,
    pub analysis: AnalysisReport,
    /// Analyzer observations plus the role keyword observation, if any.
    pub observations: Vec<Observation>,
    pub job_description: Option<JobDescription>,
    pub job_match: Option<MatchReport>,
    /// What to ask the candidate next, most useful first.
    pub follow_up_questions: Vec<Question>,
    pub suggestion_backend: String,
    pub suggested_improvements: Vec<Improvement>,
    pub applied_improvements: Vec<Improvement>,
    pub enhanced_cv: Option<String>,
    pub enhancement_summary: String,
    pub final_quality_score: f64,
    pub processing_errors: Vec<String>,
    pub completed_steps: Vec<WorkflowStep>,
    pub timings: Vec<StepTiming>,
    pub total_duration_ms: u64,
    pub summary: String,
}
