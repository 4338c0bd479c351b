//! Domain types for the interview engine: the candidate roster, the chat
//! transcript, and the single active session.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    Ai,
    User,
}

/// One entry in a candidate's transcript. `feedback`/`score` are attached
/// only to evaluated user answers, correlated by `seq` (assigned at append
/// time, monotonically increasing per candidate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    pub author: Author,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

/// Opaque résumé blob kept for the interviewer detail view. Never parsed
/// after ingestion.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub content_type: String,
    pub data: Bytes,
}

/// A candidate record. Created on successful résumé ingestion, accumulated
/// over the interview, never deleted.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub resume_text: String,
    pub resume_file: Option<ResumeFile>,
    pub chat_history: Vec<Message>,
    pub scores: Vec<u8>,
    pub summary: Option<String>,
    pub final_score: Option<u8>,
    pub created_at: DateTime<Utc>,
    next_seq: u64,
}

impl Candidate {
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        skills: Vec<String>,
        resume_text: String,
        resume_file: Option<ResumeFile>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            skills,
            resume_text,
            resume_file,
            chat_history: Vec::new(),
            scores: Vec::new(),
            summary: None,
            final_score: None,
            created_at: Utc::now(),
            next_seq: 0,
        }
    }

    pub fn has_missing_details(&self) -> bool {
        self.name.is_none() || self.email.is_none() || self.phone.is_none()
    }

    /// Appends a message, assigning its sequence id. Returns the id so the
    /// orchestrator can correlate a later evaluation back to this message.
    pub fn push_message(&mut self, author: Author, text: String) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.chat_history.push(Message {
            seq,
            author,
            text,
            feedback: None,
            score: None,
        });
        seq
    }

    pub fn ai_message_count(&self) -> u32 {
        self.chat_history
            .iter()
            .filter(|m| m.author == Author::Ai)
            .count() as u32
    }

    /// Every AI message text so far, passed to the provider as a
    /// do-not-repeat constraint.
    pub fn asked_questions(&self) -> Vec<String> {
        self.chat_history
            .iter()
            .filter(|m| m.author == Author::Ai)
            .map(|m| m.text.clone())
            .collect()
    }
}

/// Session lifecycle. `Completed` is terminal; only `reset` leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initial,
    DetailsMissing,
    Pending,
    Active,
    Completed,
}

/// Presentation mode chosen at start. Purely a rendering difference — both
/// modes are backed by the same orchestrator and countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    Chat,
    Avatar,
}

/// The single active interview's transient state. Cleared on reset; the
/// candidate roster persists.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub candidate_id: Option<Uuid>,
    pub status: SessionStatus,
    pub selected_role: Option<String>,
    pub current_question: Option<String>,
    /// Seconds allotted to the current question. 0 means untimed.
    pub timer: u32,
    pub is_ai_speaking: bool,
    pub interview_mode: InterviewMode,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            candidate_id: None,
            status: SessionStatus::Initial,
            selected_role: None,
            current_question: None,
            timer: 0,
            is_ai_speaking: false,
            interview_mode: InterviewMode::Chat,
        }
    }
}

/// The provider's decision for the next AI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Conversation,
    Question,
    Conclusion,
}

/// A full step as returned by the generative provider: what to say, what
/// kind of turn it is, and the time budget for the answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStep {
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub content: String,
    #[serde(default)]
    pub time: u32,
}

impl NextStep {
    /// The fixed substitute applied when step generation fails or returns
    /// unparsable output. The session must never be left without a valid
    /// current question.
    pub fn error_conclusion() -> Self {
        Self {
            step_type: StepType::Conclusion,
            content: "There was an error. We'll have to end here. Thank you.".to_string(),
            time: 0,
        }
    }
}

/// Structured result of evaluating one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub feedback: String,
    pub score: u8,
}

impl Evaluation {
    /// Substitute used when the evaluation service fails. Must not block
    /// turn progression.
    pub fn fallback() -> Self {
        Self {
            feedback: "Error evaluating answer.".to_string(),
            score: 0,
        }
    }
}

/// Final assessment produced at conclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAssessment {
    pub summary: String,
    #[serde(rename = "finalScore")]
    pub final_score: u8,
}

impl FinalAssessment {
    pub fn fallback() -> Self {
        Self {
            summary: "Could not generate summary.".to_string(),
            final_score: 0,
        }
    }
}

/// Candidate details as extracted from résumé text. Missing fields stay
/// `None` and route the session through `details_missing`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_message_assigns_monotonic_seq() {
        let mut c = Candidate::new(None, None, None, vec![], String::new(), None);
        let a = c.push_message(Author::Ai, "hello".into());
        let b = c.push_message(Author::User, "hi".into());
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(c.chat_history.len(), 2);
    }

    #[test]
    fn test_missing_details_detection() {
        let c = Candidate::new(
            Some("Ada".into()),
            None,
            Some("555".into()),
            vec![],
            String::new(),
            None,
        );
        assert!(c.has_missing_details());

        let full = Candidate::new(
            Some("Ada".into()),
            Some("ada@example.com".into()),
            Some("555".into()),
            vec![],
            String::new(),
            None,
        );
        assert!(!full.has_missing_details());
    }

    #[test]
    fn test_asked_questions_filters_ai_only() {
        let mut c = Candidate::new(None, None, None, vec![], String::new(), None);
        c.push_message(Author::Ai, "q1".into());
        c.push_message(Author::User, "a1".into());
        c.push_message(Author::Ai, "q2".into());
        assert_eq!(c.asked_questions(), vec!["q1", "q2"]);
        assert_eq!(c.ai_message_count(), 2);
    }

    #[test]
    fn test_next_step_deserializes_provider_json() {
        let json = r#"{"type": "question", "content": "Explain ownership.", "time": 20}"#;
        let step: NextStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.step_type, StepType::Question);
        assert_eq!(step.time, 20);
    }

    #[test]
    fn test_next_step_time_defaults_to_zero() {
        let json = r#"{"type": "conclusion", "content": "Thank you."}"#;
        let step: NextStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.step_type, StepType::Conclusion);
        assert_eq!(step.time, 0);
    }
}
