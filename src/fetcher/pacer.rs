use async_trait::async_trait;
use std::time::Duration;

/// Why the fetcher is about to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// Randomized pause before every attempt.
    Politeness,
    /// Fixed pause after a failed attempt: the rate-limit delay after an
    /// HTTP 429, the error delay otherwise.
    Cooldown,
}

/// Every wait the fetcher takes goes through here.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, reason: PauseReason, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, reason: PauseReason, duration: Duration) {
        tracing::trace!(?reason, ?duration, "Pausing");
        tokio::time::sleep(duration).await;
    }
}

/// Pacer doubles shared by unit and integration tests.
#[doc(hidden)]
pub mod testing {
    use super::{Pacer, PauseReason};
    use async_trait::async_trait;
    use std::{
        sync::{Mutex, PoisonError},
        time::Duration,
    };

    /// Records pauses and returns immediately.
    #[derive(Debug, Default)]
    pub struct RecordingPacer {
        pauses: Mutex<Vec<(PauseReason, Duration)>>,
    }

    impl RecordingPacer {
        pub fn pauses(&self) -> Vec<(PauseReason, Duration)> {
            self.pauses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        pub fn of(&self, reason: PauseReason) -> Vec<Duration> {
            self.pauses()
                .into_iter()
                .filter(|(r, _)| *r == reason)
                .map(|(_, d)| d)
                .collect()
        }
    }

    #[async_trait]
    impl Pacer for RecordingPacer {
        async fn pause(&self, reason: PauseReason, duration: Duration) {
            self.pauses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((reason, duration));
        }
    }
}
