//! In-memory interview store: the candidate roster plus the single active
//! session, with all mutation constrained to the state-machine transitions.
//!
//! State is process-local and volatile by design. The store is the only
//! owner of interview state; handlers, the orchestrator, and the countdown
//! all go through it.
//!
//! Lifecycle: `initial → {details_missing | pending} → active → completed`,
//! with `reset` returning to `initial` while retaining the roster.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{
    Author, Candidate, Evaluation, FinalAssessment, InterviewMode, NextStep, Session,
    SessionStatus, StepType,
};

/// Fixed opening prompt seeded as the first AI message of every interview.
pub const OPENING_QUESTION: &str =
    "Thank you. To begin, could you please tell me a little bit about yourself and your experience?";

struct StoreInner {
    candidates: Vec<Candidate>,
    session: Session,
    selected_model: String,
    /// Answer text staged by the UI, consumed by timer auto-submit.
    draft_answer: String,
}

/// Process-wide state container. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct InterviewStore {
    inner: Arc<RwLock<StoreInner>>,
    /// "Thinking" flag: set while an orchestrator invocation is in flight.
    /// Gates concurrent submissions (manual vs timer auto-submit races).
    thinking: Arc<AtomicBool>,
}

impl InterviewStore {
    pub fn new(default_model: String) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                candidates: Vec::new(),
                session: Session::default(),
                selected_model: default_model,
                draft_answer: String::new(),
            })),
            thinking: Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Roster ──────────────────────────────────────────────────────────

    /// Ingests a freshly extracted candidate and binds the session to them.
    /// `initial → details_missing` if any of name/email/phone is absent,
    /// otherwise `initial → pending`.
    pub async fn ingest_candidate(&self, candidate: Candidate) -> Result<SessionStatus, AppError> {
        let mut inner = self.inner.write().await;
        if inner.session.status != SessionStatus::Initial {
            return Err(AppError::InvalidState(format!(
                "cannot ingest a candidate while the session is {:?}; reset first",
                inner.session.status
            )));
        }
        let status = if candidate.has_missing_details() {
            SessionStatus::DetailsMissing
        } else {
            SessionStatus::Pending
        };
        inner.session.candidate_id = Some(candidate.id);
        inner.session.status = status;
        inner.candidates.push(candidate);
        Ok(status)
    }

    /// Fills in missing candidate details. Always advances to `pending` —
    /// there is no re-validation loop.
    pub async fn complete_details(
        &self,
        candidate_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        if inner.session.status != SessionStatus::DetailsMissing {
            return Err(AppError::InvalidState(format!(
                "details can only be completed from details_missing, not {:?}",
                inner.session.status
            )));
        }
        let candidate = inner
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        if name.is_some() {
            candidate.name = name;
        }
        if email.is_some() {
            candidate.email = email;
        }
        if phone.is_some() {
            candidate.phone = phone;
        }
        inner.session.status = SessionStatus::Pending;
        Ok(())
    }

    pub async fn candidate(&self, candidate_id: Uuid) -> Result<Candidate, AppError> {
        let inner = self.inner.read().await;
        inner
            .candidates
            .iter()
            .find(|c| c.id == candidate_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
    }

    pub async fn candidates(&self) -> Vec<Candidate> {
        self.inner.read().await.candidates.clone()
    }

    // ── Session transitions ─────────────────────────────────────────────

    /// `pending → active`: binds role and mode (immutable once started) and
    /// seeds the transcript with the fixed opening prompt, untimed.
    pub async fn start_interview(
        &self,
        candidate_id: Uuid,
        role: String,
        mode: InterviewMode,
    ) -> Result<Session, AppError> {
        let mut inner = self.inner.write().await;
        if inner.session.status != SessionStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "interview can only start from pending, not {:?}",
                inner.session.status
            )));
        }
        if inner.session.candidate_id != Some(candidate_id) {
            return Err(AppError::Validation(
                "candidate_id does not match the current session".to_string(),
            ));
        }
        let candidate = inner
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        candidate.push_message(Author::Ai, OPENING_QUESTION.to_string());

        inner.session.status = SessionStatus::Active;
        inner.session.selected_role = Some(role);
        inner.session.interview_mode = mode;
        inner.session.current_question = Some(OPENING_QUESTION.to_string());
        inner.session.timer = 0;
        Ok(inner.session.clone())
    }

    /// Applies a provider step to the session: replaces the current question
    /// and timer, and transitions `active → completed` on a conclusion.
    pub async fn apply_step(&self, step: &NextStep) -> Result<Session, AppError> {
        let mut inner = self.inner.write().await;
        if inner.session.status != SessionStatus::Active {
            return Err(AppError::InvalidState(format!(
                "cannot advance a {:?} session",
                inner.session.status
            )));
        }
        inner.session.current_question = Some(step.content.clone());
        inner.session.timer = step.time;
        if step.step_type == StepType::Conclusion {
            inner.session.status = SessionStatus::Completed;
            inner.session.timer = 0;
        }
        Ok(inner.session.clone())
    }

    /// `completed | any → initial`: clears the session to defaults. The
    /// candidate roster is retained.
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.session = Session::default();
        inner.draft_answer.clear();
        self.thinking.store(false, Ordering::SeqCst);
    }

    pub async fn session(&self) -> Session {
        self.inner.read().await.session.clone()
    }

    // ── Transcript mutation (driven by the orchestrator) ────────────────

    /// Appends a message to the candidate's transcript and returns its
    /// sequence id for later evaluation correlation.
    pub async fn append_message(
        &self,
        candidate_id: Uuid,
        author: Author,
        text: String,
    ) -> Result<u64, AppError> {
        let mut inner = self.inner.write().await;
        let candidate = inner
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        Ok(candidate.push_message(author, text))
    }

    /// Attaches an evaluation to the message with the given sequence id and
    /// appends its score to the candidate's score list.
    pub async fn attach_evaluation(
        &self,
        candidate_id: Uuid,
        seq: u64,
        evaluation: Evaluation,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let candidate = inner
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        let message = candidate
            .chat_history
            .iter_mut()
            .find(|m| m.seq == seq)
            .ok_or_else(|| AppError::NotFound(format!("Message seq {seq} not found")))?;
        message.feedback = Some(evaluation.feedback);
        message.score = Some(evaluation.score);
        candidate.scores.push(evaluation.score);
        Ok(())
    }

    /// Records the final assessment. Set once, at conclusion.
    pub async fn set_final_results(
        &self,
        candidate_id: Uuid,
        assessment: FinalAssessment,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let candidate = inner
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        candidate.summary = Some(assessment.summary);
        candidate.final_score = Some(assessment.final_score);
        Ok(())
    }

    // ── UI-sync state ───────────────────────────────────────────────────

    pub async fn set_ai_speaking(&self, speaking: bool) {
        self.inner.write().await.session.is_ai_speaking = speaking;
    }

    pub async fn selected_model(&self) -> String {
        self.inner.read().await.selected_model.clone()
    }

    pub async fn set_model(&self, model: String) {
        self.inner.write().await.selected_model = model;
    }

    pub async fn stage_draft(&self, answer: String) {
        self.inner.write().await.draft_answer = answer;
    }

    /// Takes the staged draft, leaving it empty. Used by timer auto-submit.
    pub async fn take_draft(&self) -> String {
        std::mem::take(&mut self.inner.write().await.draft_answer)
    }

    // ── Busy guard ──────────────────────────────────────────────────────

    /// Claims the in-flight turn slot. Returns false if a turn is already
    /// being processed; the caller must reject the submission.
    pub fn try_begin_turn(&self) -> bool {
        self.thinking
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn end_turn(&self) {
        self.thinking.store(false, Ordering::SeqCst);
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_with(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> Candidate {
        Candidate::new(
            name.map(String::from),
            email.map(String::from),
            phone.map(String::from),
            vec!["Rust".into()],
            "resume text".into(),
            None,
        )
    }

    #[tokio::test]
    async fn test_ingest_complete_candidate_goes_straight_to_pending() {
        let store = InterviewStore::new("test-model".into());
        let c = candidate_with(Some("Ada"), Some("ada@example.com"), Some("555"));
        let status = store.ingest_candidate(c).await.unwrap();
        assert_eq!(status, SessionStatus::Pending);
        assert_eq!(store.session().await.status, SessionStatus::Pending);
    }

    #[tokio::test]
    async fn test_ingest_with_missing_email_requires_details() {
        let store = InterviewStore::new("test-model".into());
        let c = candidate_with(Some("Ada"), None, Some("555"));
        let id = c.id;
        let status = store.ingest_candidate(c).await.unwrap();
        assert_eq!(status, SessionStatus::DetailsMissing);

        store
            .complete_details(id, None, Some("ada@example.com".into()), None)
            .await
            .unwrap();
        assert_eq!(store.session().await.status, SessionStatus::Pending);
        let candidate = store.candidate(id).await.unwrap();
        assert_eq!(candidate.email.as_deref(), Some("ada@example.com"));
        assert_eq!(candidate.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_start_interview_seeds_one_ai_message_untimed() {
        let store = InterviewStore::new("test-model".into());
        let c = candidate_with(Some("Ada"), Some("a@b.c"), Some("555"));
        let id = c.id;
        store.ingest_candidate(c).await.unwrap();

        let session = store
            .start_interview(id, "Backend Developer".into(), InterviewMode::Chat)
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.timer, 0);
        assert_eq!(session.current_question.as_deref(), Some(OPENING_QUESTION));

        let candidate = store.candidate(id).await.unwrap();
        assert_eq!(candidate.chat_history.len(), 1);
        assert_eq!(candidate.chat_history[0].author, Author::Ai);
    }

    #[tokio::test]
    async fn test_start_interview_rejected_unless_pending() {
        let store = InterviewStore::new("test-model".into());
        let err = store
            .start_interview(Uuid::new_v4(), "Backend Developer".into(), InterviewMode::Chat)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_conclusion_step_completes_session_and_zeroes_timer() {
        let store = InterviewStore::new("test-model".into());
        let c = candidate_with(Some("Ada"), Some("a@b.c"), Some("555"));
        let id = c.id;
        store.ingest_candidate(c).await.unwrap();
        store
            .start_interview(id, "Backend Developer".into(), InterviewMode::Avatar)
            .await
            .unwrap();

        let step = NextStep {
            step_type: StepType::Conclusion,
            content: "Thank you, we're done.".into(),
            time: 30, // ignored on conclusion
        };
        let session = store.apply_step(&step).await.unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.timer, 0);

        // Completed is terminal: further advances are rejected until reset.
        let err = store.apply_step(&step).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_reset_clears_session_but_keeps_roster() {
        let store = InterviewStore::new("test-model".into());
        let c = candidate_with(Some("Ada"), Some("a@b.c"), Some("555"));
        let id = c.id;
        store.ingest_candidate(c).await.unwrap();
        store
            .start_interview(id, "Full Stack Developer".into(), InterviewMode::Chat)
            .await
            .unwrap();

        store.reset().await;
        let session = store.session().await;
        assert_eq!(session.status, SessionStatus::Initial);
        assert_eq!(session.candidate_id, None);
        assert_eq!(store.candidates().await.len(), 1);

        // Roster survives; a new candidate can be ingested again.
        let again = candidate_with(Some("Grace"), Some("g@h.i"), Some("777"));
        store.ingest_candidate(again).await.unwrap();
        assert_eq!(store.candidates().await.len(), 2);
    }

    #[tokio::test]
    async fn test_evaluation_attaches_by_seq_even_with_repeated_text() {
        let store = InterviewStore::new("test-model".into());
        let c = candidate_with(Some("Ada"), Some("a@b.c"), Some("555"));
        let id = c.id;
        store.ingest_candidate(c).await.unwrap();

        let first = store
            .append_message(id, Author::User, "same answer".into())
            .await
            .unwrap();
        let second = store
            .append_message(id, Author::User, "same answer".into())
            .await
            .unwrap();
        assert_ne!(first, second);

        store
            .attach_evaluation(
                id,
                second,
                Evaluation {
                    feedback: "ok".into(),
                    score: 7,
                },
            )
            .await
            .unwrap();

        let candidate = store.candidate(id).await.unwrap();
        assert_eq!(candidate.chat_history[0].score, None);
        assert_eq!(candidate.chat_history[1].score, Some(7));
        assert_eq!(candidate.scores, vec![7]);
    }

    #[tokio::test]
    async fn test_busy_guard_is_exclusive() {
        let store = InterviewStore::new("test-model".into());
        assert!(store.try_begin_turn());
        assert!(!store.try_begin_turn());
        assert!(store.is_thinking());
        store.end_turn();
        assert!(store.try_begin_turn());
    }
}
