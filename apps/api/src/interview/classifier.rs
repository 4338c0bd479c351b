//! Turn Classifier — pure function from accumulated transcript shape to the
//! next phase, difficulty tier, and time budget.
//!
//! This table defines the interview's length and escalation: a 2-message
//! conversational intro followed by exactly 6 scored technical questions
//! (2 Easy, 2 Medium, 2 Hard), then a conclusion. The generative provider is
//! instructed to honor it; the classifier is the single authority for the
//! counting rule `T = max(0, A - 2)`.

use serde::Serialize;

/// Difficulty tier of a scored technical question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Which segment of the interview the next AI message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Conversational follow-up to the self-introduction. Untimed.
    Intro,
    /// Scored technical question (transition included: the first technical
    /// question doubles as the intro-to-interview transition).
    Technical,
    /// All six questions asked; conclude the interview.
    Conclusion,
}

/// The classifier's full output for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPlan {
    pub phase: Phase,
    /// Set only for `Technical` turns.
    pub difficulty: Option<Difficulty>,
    /// Time budget in seconds for the candidate's answer. 0 = untimed.
    pub time_secs: u32,
    /// 0-based count of scored questions already asked (`T`).
    pub technical_index: u32,
}

/// Number of scored technical questions per interview.
pub const TECHNICAL_QUESTION_COUNT: u32 = 6;

/// Maps a technical-question index `T` to its difficulty and time budget.
/// Returns `None` once the interview should conclude (`T >= 6`).
pub fn difficulty_for(technical_index: u32) -> Option<(Difficulty, u32)> {
    match technical_index {
        0..=1 => Some((Difficulty::Easy, 20)),
        2..=3 => Some((Difficulty::Medium, 60)),
        4..=5 => Some((Difficulty::Hard, 120)),
        _ => None,
    }
}

/// Plans the next turn from the count of AI messages already in the
/// transcript. `A == 0` is unreachable in practice (starting an interview
/// always seeds one AI intro message) but classifies as an intro follow-up.
pub fn plan_turn(ai_messages: u32) -> TurnPlan {
    let technical_index = ai_messages.saturating_sub(2);

    if ai_messages <= 1 {
        return TurnPlan {
            phase: Phase::Intro,
            difficulty: None,
            time_secs: 0,
            technical_index: 0,
        };
    }

    match difficulty_for(technical_index) {
        Some((difficulty, time_secs)) => TurnPlan {
            phase: Phase::Technical,
            difficulty: Some(difficulty),
            time_secs,
            technical_index,
        },
        None => TurnPlan {
            phase: Phase::Conclusion,
            difficulty: None,
            time_secs: 0,
            technical_index,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technical_index_is_ai_count_minus_two_floored() {
        assert_eq!(plan_turn(0).technical_index, 0);
        assert_eq!(plan_turn(1).technical_index, 0);
        assert_eq!(plan_turn(2).technical_index, 0);
        assert_eq!(plan_turn(3).technical_index, 1);
        assert_eq!(plan_turn(8).technical_index, 6);
    }

    #[test]
    fn test_one_ai_message_is_intro_followup() {
        let plan = plan_turn(1);
        assert_eq!(plan.phase, Phase::Intro);
        assert_eq!(plan.time_secs, 0);
        assert_eq!(plan.difficulty, None);
    }

    #[test]
    fn test_two_ai_messages_starts_easy_technical() {
        // Transition turn: combined transition + first technical question.
        let plan = plan_turn(2);
        assert_eq!(plan.phase, Phase::Technical);
        assert_eq!(plan.difficulty, Some(Difficulty::Easy));
        assert_eq!(plan.time_secs, 20);
        assert_eq!(plan.technical_index, 0);
    }

    #[test]
    fn test_difficulty_table_boundaries() {
        assert_eq!(difficulty_for(0), Some((Difficulty::Easy, 20)));
        assert_eq!(difficulty_for(1), Some((Difficulty::Easy, 20)));
        assert_eq!(difficulty_for(2), Some((Difficulty::Medium, 60)));
        assert_eq!(difficulty_for(3), Some((Difficulty::Medium, 60)));
        assert_eq!(difficulty_for(4), Some((Difficulty::Hard, 120)));
        assert_eq!(difficulty_for(5), Some((Difficulty::Hard, 120)));
        assert_eq!(difficulty_for(6), None);
        assert_eq!(difficulty_for(100), None);
    }

    #[test]
    fn test_sixth_question_concludes() {
        // A=7 -> T=5, last Hard question. A=8 -> T=6, conclusion.
        let last = plan_turn(7);
        assert_eq!(last.phase, Phase::Technical);
        assert_eq!(last.difficulty, Some(Difficulty::Hard));

        let done = plan_turn(8);
        assert_eq!(done.phase, Phase::Conclusion);
        assert_eq!(done.time_secs, 0);
    }

    #[test]
    fn test_escalation_covers_exactly_six_questions() {
        let technical: Vec<_> = (0..20)
            .map(plan_turn)
            .filter(|p| p.phase == Phase::Technical)
            .collect();
        assert_eq!(technical.len() as u32, TECHNICAL_QUESTION_COUNT);
    }
}
