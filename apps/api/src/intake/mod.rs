//! Résumé intake: file upload → text extraction → AI detail/skill
//! extraction → candidate creation, plus the interviewer's roster views.

pub mod extract;
pub mod handlers;
pub mod prompts;
