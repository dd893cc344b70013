use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::fit_scoring::{match_cv, MatchReport};
use crate::matching::jd_parser::{parse_job_description, JobDescription};
use crate::parsing::sections::extract_sections;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub cv_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_description: JobDescription,
    pub match_report: MatchReport,
}

/// POST /api/v1/jd/match
pub async fn handle_match(Json(req): Json<MatchRequest>) -> Result<Json<MatchResponse>, AppError> {
    if req.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text must not be empty".to_string()));
    }
    if req.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text must not be empty".to_string()));
    }

    let document = extract_sections(&req.cv_text);
    let job_description = parse_job_description(&req.jd_text);
    let match_report = match_cv(&document, &job_description);

    Ok(Json(MatchResponse {
        job_description,
        match_report,
    }))
}
