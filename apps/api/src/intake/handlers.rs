//! Axum route handlers for candidate intake and the interviewer's views.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::extract::resume_text;
use crate::interview::models::{Candidate, Message, ResumeFile, SessionStatus};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub candidate_id: Uuid,
    pub status: SessionStatus,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// One roster row for the interviewer dashboard table.
#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub final_score: Option<u8>,
    pub status: &'static str,
}

/// Full drill-down for one candidate: transcript with per-answer feedback,
/// final assessment, and résumé metadata.
#[derive(Debug, Serialize)]
pub struct CandidateDetail {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub resume_text: String,
    pub resume_content_type: Option<String>,
    pub chat_history: Vec<Message>,
    pub scores: Vec<u8>,
    pub summary: Option<String>,
    pub final_score: Option<u8>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates
///
/// Multipart résumé upload. Extracts text from the file, asks the AI for
/// name/email/phone and skills, and creates the candidate. Extraction
/// failure aborts the whole operation with no state change; a candidate
/// with missing fields is created and routed through `details_missing`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
            file = Some((content_type, data));
        }
    }
    let (content_type, data) =
        file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;

    let text = resume_text(&content_type, &data)?;
    let model = state.store.selected_model().await;

    // Detail extraction failure aborts ingestion (surfaced to the caller).
    let details = state
        .ai
        .extract_details(&model, &text)
        .await
        .map_err(|e| AppError::Extraction(format!("could not extract candidate details: {e}")))?;

    // Skill extraction is best-effort; an empty list is acceptable.
    let skills = match state.ai.extract_skills(&model, &text).await {
        Ok(skills) => skills,
        Err(e) => {
            warn!("skill extraction failed, continuing without skills: {e}");
            Vec::new()
        }
    };

    let candidate = Candidate::new(
        details.name,
        details.email,
        details.phone,
        skills,
        text,
        Some(ResumeFile { content_type, data }),
    );
    let response = IngestResponse {
        candidate_id: candidate.id,
        status: SessionStatus::Initial, // overwritten below
        name: candidate.name.clone(),
        email: candidate.email.clone(),
        phone: candidate.phone.clone(),
        skills: candidate.skills.clone(),
    };
    let status = state.store.ingest_candidate(candidate).await?;
    info!(candidate_id = %response.candidate_id, ?status, "candidate ingested");

    Ok(Json(IngestResponse { status, ..response }))
}

/// POST /api/v1/candidates/:id/details
///
/// Supplies fields the extraction missed. Always advances the session to
/// `pending`.
pub async fn handle_complete_details(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(request): Json<CompleteDetailsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .store
        .complete_details(candidate_id, request.name, request.email, request.phone)
        .await?;
    Ok(Json(serde_json::json!({ "status": "pending" })))
}

/// GET /api/v1/candidates
///
/// Interviewer dashboard roster.
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let candidates = state.store.candidates().await;
    let rows = candidates
        .iter()
        .map(|c| CandidateSummary {
            id: c.id,
            name: c.name.clone(),
            email: c.email.clone(),
            final_score: c.final_score,
            status: if c.final_score.is_some() {
                "completed"
            } else if c.chat_history.is_empty() {
                "pending"
            } else {
                "in_progress"
            },
        })
        .collect();
    Ok(Json(rows))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<CandidateDetail>, AppError> {
    let c = state.store.candidate(candidate_id).await?;
    Ok(Json(CandidateDetail {
        id: c.id,
        name: c.name,
        email: c.email,
        phone: c.phone,
        skills: c.skills,
        resume_text: c.resume_text,
        resume_content_type: c.resume_file.map(|f| f.content_type),
        chat_history: c.chat_history,
        scores: c.scores,
        summary: c.summary,
        final_score: c.final_score,
        created_at: c.created_at,
    }))
}
