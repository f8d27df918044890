//! Axum route handlers for the Proposal API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::layout::Document;
use crate::proposal::pipeline::RecordSource;
use crate::proposal::record::ProposalRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub document: Document,
}

#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub record: ProposalRecord,
    pub document: Document,
    pub source: RecordSource,
}

const TRANSCRIPT_MISSING: &str = "議事録が入力されていません";
const DATA_MISSING: &str = "データがありません";

/// POST /api/analyze
///
/// Transcript → validated proposal record. Model or extraction failures
/// return the fallback record with 200.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ProposalRecord>, AppError> {
    let transcript = transcript_from(payload)?;
    let analysis = state.pipeline.analyze(&transcript).await?;
    Ok(Json(analysis.record))
}

/// POST /api/generate
///
/// Proposal record → nine-page editable document. Partial records are
/// completed before assembly.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let data = request
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| AppError::Validation(DATA_MISSING.to_string()))?;

    let record = state.pipeline.complete(&data);
    let document = state.pipeline.assemble(&record, Local::now().date_naive());

    Ok(Json(GenerateResponse { document }))
}

/// POST /api/proposal
///
/// Full pipeline: transcript → record → document, in one response.
pub async fn handle_proposal(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ProposalResponse>, AppError> {
    let transcript = transcript_from(payload)?;
    let analysis = state.pipeline.analyze(&transcript).await?;
    let document = state
        .pipeline
        .assemble(&analysis.record, Local::now().date_naive());

    Ok(Json(ProposalResponse {
        record: analysis.record,
        document,
        source: analysis.source,
    }))
}

fn transcript_from(payload: Result<Json<AnalyzeRequest>, JsonRejection>) -> Result<String, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    request
        .transcript
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation(TRANSCRIPT_MISSING.to_string()))
}
