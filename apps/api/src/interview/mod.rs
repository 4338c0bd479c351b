//! The interview orchestration engine: session state machine, turn
//! classifier, answer orchestrator, and the per-question countdown.

pub mod classifier;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod store;
pub mod timer;
