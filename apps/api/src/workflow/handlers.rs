use anyhow::Context;
use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::parsing::formats::{parse_bytes, DocumentFormat};
use crate::state::AppState;
use crate::workflow::pipeline;
use crate::workflow::state::{CvSource, WorkflowInput, WorkflowOutcome};

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub text: String,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
    pub job_description: Option<String>,
}

/// POST /api/v1/cv/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<WorkflowOutcome>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("CV text must not be empty".to_string()));
    }

    let input = WorkflowInput {
        target_role: non_blank(req.target_role),
        target_industry: non_blank(req.target_industry),
        job_description: non_blank(req.job_description),
        ..WorkflowInput::from_text(req.text)
    };

    let outcome = pipeline::run(input, state.suggestion_generator.as_ref()).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/cv/upload
/// Multipart fields: `file` (required), `target_role`, `target_industry`, `job_description`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<WorkflowOutcome>, AppError> {
    let mut upload = None;
    let mut target_role = None;
    let mut target_industry = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(invalid_multipart)?;
                upload = Some((file_name, bytes));
            }
            "target_role" => target_role = text_field(field).await?,
            "target_industry" => target_industry = text_field(field).await?,
            "job_description" => job_description = text_field(field).await?,
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let format = DocumentFormat::from_file_name(&file_name)?;
    info!("Upload '{file_name}' ({} bytes, {format:?})", bytes.len());

    // PDF extraction is CPU-bound
    let parsed = tokio::task::spawn_blocking(move || parse_bytes(format, &bytes))
        .await
        .context("Document parsing task failed")??;

    let input = WorkflowInput {
        source: CvSource::Parsed(parsed),
        target_role,
        target_industry,
        job_description,
    };

    let outcome = pipeline::run(input, state.suggestion_generator.as_ref()).await?;
    Ok(Json(outcome))
}

async fn text_field(field: Field<'_>) -> Result<Option<String>, AppError> {
    let value = field.text().await.map_err(invalid_multipart)?;
    Ok(non_blank(Some(value)))
}

fn invalid_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::improvement::generator::RuleBasedSuggestionGenerator;

    fn state() -> AppState {
        AppState {
            config: Config::from_lookup(|_| None).unwrap(),
            suggestion_generator: Arc::new(RuleBasedSuggestionGenerator),
        }
    }

    fn request(text: &str) -> ImproveRequest {
        ImproveRequest {
            text: text.to_string(),
            target_role: Some("  ".to_string()),
            target_industry: None,
            job_description: None,
        }
    }

    #[tokio::test]
    async fn test_improve_runs_workflow() {
        let text = "EXPERIENCE\n- Worked on the checkout service\n- Cut costs by 30%\n\nSKILLS\nRust\n";
        let Json(outcome) = handle_improve(State(state()), Json(request(text))).await.unwrap();

        assert_eq!(outcome.suggestion_backend, "rule_based");
        assert!(outcome.enhanced_cv.unwrap().contains("Delivered the checkout service"));
    }

    #[tokio::test]
    async fn test_improve_rejects_blank_text() {
        let err = handle_improve(State(state()), Json(request(" \n "))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Data Scientist ".to_string())).as_deref(), Some("Data Scientist"));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
