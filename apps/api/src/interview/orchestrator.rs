//! Answer Orchestrator — the control loop invoked once per submitted answer.
//!
//! The six side effects are strictly ordered; each step's output is required
//! input to the next, so nothing here may be reordered or parallelized:
//!
//! 1. append the user's answer to the transcript
//! 2. evaluate it (only if the question was timed)
//! 3. re-read state and ask the provider for the next step
//! 4. append the AI message
//! 5. apply the step to the session (question + timer)
//! 6. on conclusion, summarize and complete the session
//!
//! Failure policy: the provider, evaluator, and summarizer are single-attempt
//! from here. A failed step generation becomes a fixed conclusion step, a
//! failed evaluation becomes a zero score with neutral feedback, and a failed
//! summary becomes a placeholder — the session always ends up in a
//! well-defined state with `current_question` and `timer` set.

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{
    Author, Evaluation, FinalAssessment, NextStep, SessionStatus, StepType,
};
use crate::interview::provider::{InterviewAi, StepContext};
use crate::interview::store::InterviewStore;

/// Result of one turn: the applied step, exposed to the caller so the UI can
/// re-arm its countdown and speak the new message.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub step: NextStep,
    pub concluded: bool,
}

/// Processes one submitted answer. At most one invocation may be in flight
/// per session; a concurrent call is rejected with `AppError::Busy` (the
/// countdown's auto-submit and a manual submit race through this same gate).
pub async fn submit_answer(
    store: &InterviewStore,
    ai: &dyn InterviewAi,
    candidate_id: Uuid,
    answer: String,
) -> Result<TurnOutcome, AppError> {
    if !store.try_begin_turn() {
        return Err(AppError::Busy);
    }
    let result = process_answer(store, ai, candidate_id, answer).await;
    store.end_turn();
    result
}

async fn process_answer(
    store: &InterviewStore,
    ai: &dyn InterviewAi,
    candidate_id: Uuid,
    answer: String,
) -> Result<TurnOutcome, AppError> {
    let session = store.session().await;
    if session.status != SessionStatus::Active {
        return Err(AppError::InvalidState(format!(
            "answers are only accepted while active, session is {:?}",
            session.status
        )));
    }
    if session.candidate_id != Some(candidate_id) {
        return Err(AppError::Validation(
            "candidate_id does not match the current session".to_string(),
        ));
    }
    let question = session.current_question.clone().unwrap_or_default();
    let was_timed = session.timer > 0;
    let role = session.selected_role.clone().unwrap_or_default();
    let model = store.selected_model().await;

    // 1. Append the user's answer.
    let answer_seq = store
        .append_message(candidate_id, Author::User, answer.clone())
        .await?;

    // 2. Evaluate timed answers only. Intro turns are untimed and unscored.
    if was_timed {
        let evaluation = match ai.evaluate(&model, &question, &answer).await {
            Ok(e) => e,
            Err(e) => {
                warn!("evaluation failed, substituting zero score: {e}");
                Evaluation::fallback()
            }
        };
        store
            .attach_evaluation(candidate_id, answer_seq, evaluation)
            .await?;
    }

    // 3. Re-read the updated candidate and ask the provider for the next step.
    let candidate = store.candidate(candidate_id).await?;
    let asked_questions = candidate.asked_questions();
    let ctx = StepContext {
        role: &role,
        resume_text: &candidate.resume_text,
        chat_history: &candidate.chat_history,
        asked_questions: &asked_questions,
    };
    let step = match ai.next_step(&model, &ctx).await {
        Ok(step) => step,
        Err(e) => {
            warn!("step generation failed, ending the interview: {e}");
            NextStep::error_conclusion()
        }
    };

    // 4. Append the AI message.
    store
        .append_message(candidate_id, Author::Ai, step.content.clone())
        .await?;

    // 5. Apply the step to the session.
    store.apply_step(&step).await?;

    // 6. On conclusion, produce the final assessment and complete.
    let concluded = step.step_type == StepType::Conclusion;
    if concluded {
        let candidate = store.candidate(candidate_id).await?;
        let assessment = match ai.summarize(&model, &candidate.chat_history).await {
            Ok(a) => a,
            Err(e) => {
                warn!("summarization failed, substituting placeholder: {e}");
                FinalAssessment::fallback()
            }
        };
        store.set_final_results(candidate_id, assessment).await?;
        info!(%candidate_id, "interview concluded");
    }

    Ok(TurnOutcome { step, concluded })
}
