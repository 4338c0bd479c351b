//! Speech adapter — fire-and-forget playback of AI messages.
//!
//! Playback never gates answer submission; its only contract with the core
//! is toggling the session's `is_ai_speaking` flag so UIs can animate the
//! avatar. The default backend just simulates playback duration; a real
//! text-to-speech engine plugs in behind the same trait.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::interview::store::InterviewStore;

#[async_trait]
pub trait Speaker: Send + Sync {
    /// Plays `text` to completion. Best-effort; errors are the backend's
    /// problem, not the engine's.
    async fn speak(&self, text: &str);
}

/// Default backend: logs the utterance and sleeps roughly as long as a
/// human reading it aloud (~150 words per minute).
pub struct SimulatedSpeaker;

#[async_trait]
impl Speaker for SimulatedSpeaker {
    async fn speak(&self, text: &str) {
        let words = text.split_whitespace().count() as u64;
        let duration = Duration::from_millis(words * 400);
        debug!(words, ?duration, "simulating speech playback");
        tokio::time::sleep(duration).await;
    }
}

/// Spawns playback of the latest AI message, toggling `is_ai_speaking`
/// around it. Detached on purpose: submission flow never waits on speech.
pub fn speak_in_background(store: InterviewStore, speaker: Arc<dyn Speaker>, text: String) {
    tokio::spawn(async move {
        store.set_ai_speaking(true).await;
        speaker.speak(&text).await;
        store.set_ai_speaking(false).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_background_speech_toggles_speaking_flag() {
        let store = InterviewStore::new("test-model".into());
        let speaker: Arc<dyn Speaker> = Arc::new(SimulatedSpeaker);

        speak_in_background(store.clone(), speaker, "hello there candidate".into());

        // Let the spawned task start playback.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.session().await.is_ai_speaking);

        // 3 words * 400ms each.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!store.session().await.is_ai_speaking);
    }
}
