//! Sleeping abstraction used between scheduled runs and retries.

use std::time::Duration;

use async_trait::async_trait;

/// Async clock-independent sleeping abstraction.
#[async_trait]
pub trait RunSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    ///
    /// ```rust,no_run
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::time::Duration;
    ///
    /// use async_trait::async_trait;
    /// use random_user_etl::domain::scheduler::RunSleeper;
    ///
    /// #[derive(Default)]
    /// struct CountingSleeper {
    ///     calls: AtomicU32,
    /// }
    ///
    /// #[async_trait]
    /// impl RunSleeper for CountingSleeper {
    ///     async fn sleep(&self, _duration: Duration) {
    ///         self.calls.fetch_add(1, Ordering::SeqCst);
    ///     }
    /// }
    /// ```
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl RunSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
