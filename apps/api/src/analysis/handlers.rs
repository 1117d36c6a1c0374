//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::analysis::models::{AnalysisRequest, AnalysisResult, DocumentType};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub document_type: DocumentType,
    pub content: String,
}

/// POST /api/v1/analyze
///
/// Validates the document, then runs the analysis pipeline. Once validation passes the
/// response is always 200: pipeline failures are absorbed by the fallback dataset.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let request = AnalysisRequest::new(body.document_type, body.content)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    info!(
        "Analyzing {} document ({} chars)",
        request.document_type().as_str(),
        request.content().chars().count()
    );

    Ok(Json(state.analyzer.analyze(&request).await))
}
