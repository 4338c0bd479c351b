pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::intake::handlers as intake;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate intake + interviewer views
        .route(
            "/api/v1/candidates",
            post(intake::handle_upload_resume).get(intake::handle_list_candidates),
        )
        .route(
            "/api/v1/candidates/:id",
            get(intake::handle_get_candidate),
        )
        .route(
            "/api/v1/candidates/:id/details",
            post(intake::handle_complete_details),
        )
        // Interview engine
        .route("/api/v1/interview", get(interview::handle_get_session))
        .route("/api/v1/interview/start", post(interview::handle_start))
        .route("/api/v1/interview/answer", post(interview::handle_answer))
        .route(
            "/api/v1/interview/draft",
            put(interview::handle_stage_draft),
        )
        .route("/api/v1/interview/reset", post(interview::handle_reset))
        .route(
            "/api/v1/interview/model",
            post(interview::handle_select_model),
        )
        .with_state(state)
}
