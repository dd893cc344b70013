use axum::Json;
use serde::Deserialize;

use crate::analysis::analyzer::{score, AnalysisReport};
use crate::errors::AppError;
use crate::models::document::{Document, Section};
use crate::parsing::sections::extract_sections;

/// Either raw text to be sectioned or sections the caller already split.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
    pub sections: Option<Vec<Section>>,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
}

impl AnalyzeRequest {
    fn into_document(self) -> Result<Document, AppError> {
        match (self.sections, self.text) {
            (Some(sections), _) => Ok(Document::new(sections)),
            (None, Some(text)) if !text.trim().is_empty() => Ok(extract_sections(&text)),
            _ => Err(AppError::Validation(
                "Either 'text' or 'sections' must be provided".to_string(),
            )),
        }
    }
}

/// POST /api/v1/cv/analyze
pub async fn handle_analyze(Json(req): Json<AnalyzeRequest>) -> Result<Json<AnalysisReport>, AppError> {
    let target_role = req.target_role.clone();
    let target_industry = req.target_industry.clone();
    let document = req.into_document()?;

    let report = score(&document, target_role.as_deref(), target_industry.as_deref())?;
    Ok(Json(report))
}
