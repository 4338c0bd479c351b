use std::sync::Arc;

use crate::config::Config;
use crate::interview::provider::InterviewAi;
use crate::interview::store::InterviewStore;
use crate::interview::timer::Countdown;
use crate::speech::Speaker;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidate roster + the single active session. Process-local.
    pub store: InterviewStore,
    /// Pluggable AI backend. Default: LLM-backed. Swapped for scripted
    /// implementations in tests.
    pub ai: Arc<dyn InterviewAi>,
    /// Pluggable speech backend, fire-and-forget from the engine's view.
    pub speaker: Arc<dyn Speaker>,
    /// The one countdown shared by every presentation mode.
    pub countdown: Arc<Countdown>,
    pub config: Config,
}
