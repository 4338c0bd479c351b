//! Axum route handlers for the interview itself: start, answer, draft
//! staging, session snapshot, reset, and model selection.
//!
//! This is also where the countdown is wired to the orchestrator: every
//! applied step re-arms the shared `Countdown`, and its expiry auto-submits
//! the staged draft through the exact same entry point as a manual send.

use std::future::Future;
use std::pin::Pin;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{InterviewMode, NextStep, Session};
use crate::interview::orchestrator::{self, TurnOutcome};
use crate::interview::store::OPENING_QUESTION;
use crate::llm_client;
use crate::speech::speak_in_background;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub candidate_id: Uuid,
    pub role: String,
    pub mode: InterviewMode,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub candidate_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model: String,
}

/// Session snapshot returned to both interviewee UIs.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    /// Seconds left on the current question's countdown.
    pub time_left: u32,
    /// True while an answer is being processed.
    pub thinking: bool,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub step: NextStep,
    pub session: SessionView,
}

async fn session_view(state: &AppState) -> SessionView {
    SessionView {
        session: state.store.session().await,
        time_left: state.countdown.time_left(),
        thinking: state.store.is_thinking(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Countdown wiring
// ────────────────────────────────────────────────────────────────────────────

/// Applies a turn's aftermath: speaks the new AI message and re-arms (or
/// disarms) the countdown for the step's time budget.
async fn apply_outcome(state: &AppState, candidate_id: Uuid, outcome: &TurnOutcome) {
    speak_in_background(
        state.store.clone(),
        state.speaker.clone(),
        outcome.step.content.clone(),
    );
    if outcome.step.time > 0 {
        let st = state.clone();
        state
            .countdown
            .arm(outcome.step.time, move || auto_submit(st, candidate_id))
            .await;
    } else {
        state.countdown.disarm().await;
    }
}

/// Timer-expiry path: submit whatever the candidate has staged (possibly
/// empty) through the same orchestrator gate as a manual send. Boxed so the
/// expiry of one turn can arm the next.
fn auto_submit(state: AppState, candidate_id: Uuid) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        let answer = state.store.take_draft().await;
        match orchestrator::submit_answer(&state.store, state.ai.as_ref(), candidate_id, answer)
            .await
        {
            Ok(outcome) => {
                info!("countdown expired, answer auto-submitted");
                apply_outcome(&state, candidate_id, &outcome).await;
            }
            // A manual submission won the race; its turn owns the session.
            Err(AppError::Busy) => debug!("auto-submit skipped, a turn is already in flight"),
            Err(e) => warn!("auto-submit failed: {e}"),
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/start
///
/// `pending → active`. Seeds the fixed opening prompt (untimed) and speaks
/// it.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<Json<SessionView>, AppError> {
    if request.role.trim().is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    state
        .store
        .start_interview(request.candidate_id, request.role, request.mode)
        .await?;
    info!(candidate_id = %request.candidate_id, "interview started");

    speak_in_background(
        state.store.clone(),
        state.speaker.clone(),
        OPENING_QUESTION.to_string(),
    );

    Ok(Json(session_view(&state).await))
}

/// POST /api/v1/interview/answer
///
/// Manual submission. Cancels the countdown first so auto-submit cannot
/// double-fire for the same question, then runs the orchestrator and
/// re-arms for the next step.
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    state.countdown.disarm().await;

    let outcome = orchestrator::submit_answer(
        &state.store,
        state.ai.as_ref(),
        request.candidate_id,
        request.answer,
    )
    .await?;

    state.store.stage_draft(String::new()).await;
    apply_outcome(&state, request.candidate_id, &outcome).await;

    Ok(Json(AnswerResponse {
        step: outcome.step,
        session: session_view(&state).await,
    }))
}

/// PUT /api/v1/interview/draft
///
/// Stages the in-progress answer so timer expiry submits what the candidate
/// had typed so far.
pub async fn handle_stage_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.stage_draft(request.answer).await;
    Ok(Json(serde_json::json!({ "staged": true })))
}

/// GET /api/v1/interview
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(session_view(&state).await)
}

/// POST /api/v1/interview/reset
///
/// Back to `initial`; the roster is retained for the dashboard.
pub async fn handle_reset(State(state): State<AppState>) -> Json<SessionView> {
    state.countdown.disarm().await;
    state.store.reset().await;
    info!("session reset");
    Json(session_view(&state).await)
}

/// POST /api/v1/interview/model
///
/// Selects the model variant used for all subsequent AI calls.
pub async fn handle_select_model(
    State(state): State<AppState>,
    Json(request): Json<SelectModelRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !llm_client::is_supported_model(&request.model) {
        return Err(AppError::Validation(format!(
            "unsupported model '{}'; expected one of {:?}",
            request.model,
            llm_client::SUPPORTED_MODELS
        )));
    }
    state.store.set_model(request.model.clone()).await;
    Ok(Json(serde_json::json!({ "model": request.model })))
}
