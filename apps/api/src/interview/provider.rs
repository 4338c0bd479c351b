//! AI capabilities consumed by the interview engine — pluggable, trait-based.
//!
//! `AppState` holds an `Arc<dyn InterviewAi>`; the default backend drives the
//! LLM client with the templates in `interview::prompts` / `intake::prompts`.
//! Tests swap in scripted implementations.
//!
//! The backend returns plain errors. All fallback substitution (fixed
//! conclusion step, zero-score evaluation, placeholder summary) happens in
//! the orchestrator so the engine's guarantees live in one layer.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::intake::prompts::{
    DETAILS_EXTRACT_PROMPT, DETAILS_EXTRACT_SYSTEM, SKILLS_EXTRACT_PROMPT, SKILLS_EXTRACT_SYSTEM,
};
use crate::interview::classifier::{plan_turn, Phase, TurnPlan};
use crate::interview::models::{
    Evaluation, ExtractedDetails, FinalAssessment, Message, NextStep, StepType,
};
use crate::interview::prompts::{
    EVALUATE_PROMPT, EVALUATE_SYSTEM, NEXT_STEP_PROMPT, NEXT_STEP_SYSTEM, SUMMARY_PROMPT,
    SUMMARY_SYSTEM, TASK_CONCLUSION, TASK_INTRO, TASK_QUESTION,
};
use crate::llm_client::LlmClient;

/// Everything the step generator needs to decide the next AI message.
pub struct StepContext<'a> {
    pub role: &'a str,
    pub resume_text: &'a str,
    pub chat_history: &'a [Message],
    /// Do-not-repeat constraint: every question already asked.
    pub asked_questions: &'a [String],
}

/// The AI capabilities the engine consumes. Callers depend on the
/// contracts only; transport is this module's concern.
#[async_trait]
pub trait InterviewAi: Send + Sync {
    async fn extract_details(
        &self,
        model: &str,
        resume_text: &str,
    ) -> Result<ExtractedDetails, AppError>;

    async fn extract_skills(&self, model: &str, resume_text: &str)
        -> Result<Vec<String>, AppError>;

    async fn next_step(&self, model: &str, ctx: &StepContext<'_>) -> Result<NextStep, AppError>;

    async fn evaluate(
        &self,
        model: &str,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, AppError>;

    async fn summarize(
        &self,
        model: &str,
        chat_history: &[Message],
    ) -> Result<FinalAssessment, AppError>;
}

/// LLM-backed implementation of every interview AI capability.
pub struct LlmInterviewAi {
    llm: LlmClient,
}

impl LlmInterviewAi {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[derive(Debug, Deserialize)]
struct SkillsResponse {
    #[serde(default)]
    skills: Vec<String>,
}

#[async_trait]
impl InterviewAi for LlmInterviewAi {
    async fn extract_details(
        &self,
        model: &str,
        resume_text: &str,
    ) -> Result<ExtractedDetails, AppError> {
        let prompt = DETAILS_EXTRACT_PROMPT.replace("{resume_text}", resume_text);
        self.llm
            .call_json::<ExtractedDetails>(model, &prompt, DETAILS_EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Detail extraction failed: {e}")))
    }

    async fn extract_skills(
        &self,
        model: &str,
        resume_text: &str,
    ) -> Result<Vec<String>, AppError> {
        let prompt = SKILLS_EXTRACT_PROMPT.replace("{resume_text}", resume_text);
        let response: SkillsResponse = self
            .llm
            .call_json(model, &prompt, SKILLS_EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Skill extraction failed: {e}")))?;
        Ok(response.skills)
    }

    async fn next_step(&self, model: &str, ctx: &StepContext<'_>) -> Result<NextStep, AppError> {
        let ai_count = ctx
            .chat_history
            .iter()
            .filter(|m| m.author == crate::interview::models::Author::Ai)
            .count() as u32;
        let plan = plan_turn(ai_count);

        let prompt = build_step_prompt(ctx, ai_count, &plan);
        let step: NextStep = self
            .llm
            .call_json(model, &prompt, NEXT_STEP_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Step generation failed: {e}")))?;

        Ok(normalize_step(step, &plan))
    }

    async fn evaluate(
        &self,
        model: &str,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, AppError> {
        let prompt = EVALUATE_PROMPT
            .replace("{question}", question)
            .replace("{answer}", answer);
        let mut evaluation: Evaluation = self
            .llm
            .call_json(model, &prompt, EVALUATE_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Evaluation failed: {e}")))?;
        evaluation.score = evaluation.score.min(10);
        Ok(evaluation)
    }

    async fn summarize(
        &self,
        model: &str,
        chat_history: &[Message],
    ) -> Result<FinalAssessment, AppError> {
        let transcript =
            serde_json::to_string(chat_history).map_err(|e| AppError::Llm(e.to_string()))?;
        let prompt = SUMMARY_PROMPT.replace("{transcript}", &transcript);
        let mut assessment: FinalAssessment = self
            .llm
            .call_json(model, &prompt, SUMMARY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))?;
        assessment.final_score = assessment.final_score.min(100);
        Ok(assessment)
    }
}

fn build_step_prompt(ctx: &StepContext<'_>, ai_count: u32, plan: &TurnPlan) -> String {
    let task = match plan.phase {
        Phase::Intro => TASK_INTRO.to_string(),
        Phase::Technical => {
            // difficulty is always present on a Technical plan
            let difficulty = plan.difficulty.map(|d| d.as_str()).unwrap_or("Easy");
            TASK_QUESTION
                .replace("{question_number}", &(plan.technical_index + 1).to_string())
                .replace("{difficulty}", difficulty)
                .replace("{time}", &plan.time_secs.to_string())
        }
        Phase::Conclusion => TASK_CONCLUSION.to_string(),
    };

    let asked = if ctx.asked_questions.is_empty() {
        "(none yet)".to_string()
    } else {
        ctx.asked_questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let history = serde_json::to_string(ctx.chat_history).unwrap_or_default();

    NEXT_STEP_PROMPT
        .replace("{role}", ctx.role)
        .replace("{ai_count}", &ai_count.to_string())
        .replace("{technical_count}", &plan.technical_index.to_string())
        .replace("{task}", &task)
        .replace("{asked_questions}", &asked)
        .replace("{resume_text}", ctx.resume_text)
        .replace("{chat_history}", &history)
}

/// The classifier, not the model, is authoritative for step type and time
/// budget. Whatever the LLM returned is coerced onto the planned phase.
fn normalize_step(step: NextStep, plan: &TurnPlan) -> NextStep {
    let (step_type, time) = match plan.phase {
        Phase::Intro => (StepType::Conversation, 0),
        Phase::Technical => (StepType::Question, plan.time_secs),
        Phase::Conclusion => (StepType::Conclusion, 0),
    };
    NextStep {
        step_type,
        content: step.content,
        time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::classifier::plan_turn;
    use crate::interview::models::Author;

    fn msg(author: Author, text: &str) -> Message {
        Message {
            seq: 0,
            author,
            text: text.to_string(),
            feedback: None,
            score: None,
        }
    }

    #[test]
    fn test_step_prompt_carries_difficulty_and_constraints() {
        let asked = vec!["What is ownership?".to_string()];
        let history = vec![
            msg(Author::Ai, "intro"),
            msg(Author::User, "hi"),
            msg(Author::Ai, "follow-up"),
            msg(Author::User, "sure"),
            msg(Author::Ai, "What is ownership?"),
            msg(Author::User, "it's..."),
        ];
        let ctx = StepContext {
            role: "Backend Developer",
            resume_text: "Rust, Axum, Postgres",
            chat_history: &history,
            asked_questions: &asked,
        };
        // A = 3 -> T = 1, second Easy question
        let prompt = build_step_prompt(&ctx, 3, &plan_turn(3));
        assert!(prompt.contains("Backend Developer"));
        assert!(prompt.contains("'Easy' difficulty"));
        assert!(prompt.contains("question #2 of 6"));
        assert!(prompt.contains("- What is ownership?"));
        assert!(prompt.contains("Rust, Axum, Postgres"));
    }

    #[test]
    fn test_step_prompt_intro_task_at_one_ai_message() {
        let ctx = StepContext {
            role: "Frontend Developer",
            resume_text: "resume",
            chat_history: &[],
            asked_questions: &[],
        };
        let prompt = build_step_prompt(&ctx, 1, &plan_turn(1));
        assert!(prompt.contains("conversational"));
        assert!(prompt.contains("(none yet)"));
    }

    #[test]
    fn test_normalize_step_forces_classifier_decision() {
        // Model claims a timed question, but the plan says conclusion.
        let rogue = NextStep {
            step_type: StepType::Question,
            content: "One more thing...".into(),
            time: 120,
        };
        let normalized = normalize_step(rogue, &plan_turn(8));
        assert_eq!(normalized.step_type, StepType::Conclusion);
        assert_eq!(normalized.time, 0);
        assert_eq!(normalized.content, "One more thing...");
    }

    #[test]
    fn test_normalize_step_applies_time_table_to_questions() {
        let step = NextStep {
            step_type: StepType::Question,
            content: "Explain lifetimes.".into(),
            time: 0, // model forgot the budget
        };
        // A = 5 -> T = 3, Medium/60
        let normalized = normalize_step(step, &plan_turn(5));
        assert_eq!(normalized.step_type, StepType::Question);
        assert_eq!(normalized.time, 60);
    }
}
