//! Countdown Timer — one per-question countdown that auto-submits on expiry.
//!
//! A single `Countdown` instance backs every presentation mode (chat and
//! avatar render the same clock). Re-arming fully cancels the previous
//! countdown before starting the next: a generation counter makes a stale
//! task a no-op even if its abort hasn't landed yet, so the timer can never
//! be double-armed.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

pub struct Countdown {
    /// Bumped on every arm/disarm; a running task only acts while its own
    /// generation is still current.
    generation: Arc<AtomicU64>,
    remaining: watch::Sender<u32>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        let (remaining, _) = watch::channel(0);
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            remaining,
            handle: Mutex::new(None),
        }
    }

    /// Arms the countdown for a new question. Cancels any countdown still
    /// running for the previous question first. `seconds == 0` means the
    /// question is untimed: nothing runs.
    ///
    /// On expiry `on_expiry` is invoked once; it is expected to submit the
    /// staged answer through the orchestrator (which itself rejects the
    /// submission if a manual one won the race).
    pub async fn arm<F, Fut>(&self, seconds: u32, on_expiry: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut slot = self.handle.lock().await;
        if let Some(old) = slot.take() {
            old.abort();
        }
        self.remaining.send_replace(seconds);

        if seconds == 0 {
            debug!("countdown disarmed (untimed question)");
            return;
        }

        let generation = Arc::clone(&self.generation);
        let remaining = self.remaining.clone();
        *slot = Some(tokio::spawn(async move {
            for left in (0..seconds).rev() {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if generation.load(Ordering::SeqCst) != my_generation {
                    return; // re-armed for a newer question; stand down
                }
                remaining.send_replace(left);
            }
            if generation.load(Ordering::SeqCst) != my_generation {
                return;
            }
            debug!("countdown expired, auto-submitting staged answer");
            on_expiry().await;
        }));
    }

    /// Cancels the countdown without firing. Called on manual submission
    /// before the orchestrator runs.
    pub async fn disarm(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(old) = self.handle.lock().await.take() {
            old.abort();
        }
        self.remaining.send_replace(0);
    }

    /// Seconds left on the current question's clock. 0 when untimed or
    /// expired.
    pub fn time_left(&self) -> u32 {
        *self.remaining.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn counter_expiry(
        counter: &Arc<AtomicU32>,
    ) -> impl Send + 'static + FnOnce() -> std::future::Ready<()> {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_fires_exactly_once() {
        let countdown = Countdown::new();
        let fired = Arc::new(AtomicU32::new(0));
        countdown.arm(3, counter_expiry(&fired)).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(countdown.time_left(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_untimed_question_never_fires() {
        let countdown = Countdown::new();
        let fired = Arc::new(AtomicU32::new(0));
        countdown.arm(0, counter_expiry(&fired)).await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_cancels_before_expiry() {
        let countdown = Countdown::new();
        let fired = Arc::new(AtomicU32::new(0));
        countdown.arm(5, counter_expiry(&fired)).await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        countdown.disarm().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(countdown.time_left(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_previous_countdown() {
        let countdown = Countdown::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        countdown.arm(5, counter_expiry(&first)).await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        // New question arrives while the old countdown is mid-flight.
        countdown.arm(2, counter_expiry(&second)).await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(first.load(Ordering::SeqCst), 0, "stale countdown fired");
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_left_ticks_down() {
        let countdown = Countdown::new();
        let fired = Arc::new(AtomicU32::new(0));
        countdown.arm(10, counter_expiry(&fired)).await;
        assert_eq!(countdown.time_left(), 10);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(countdown.time_left(), 7);
    }
}
