//! Daily trigger and retry policy wrapped around [`PipelineRun`].
//!
//! The scheduler fires once per UTC day and retries a failed run from the
//! beginning after a fixed delay. Missed days are never replayed: the next
//! fire time is always computed from the current clock.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, Utc};
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::RunResult;
use crate::domain::ports::PipelineRun;

mod runtime;

pub use runtime::{RunSleeper, TokioSleeper};

/// Retry policy applied to failed runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Fixed pause before each retry.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_delay: Duration::from_secs(5 * 60),
        }
    }
}

/// Daily cadence anchored at UTC midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailySchedule;

impl DailySchedule {
    /// Next UTC midnight strictly after `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use random_user_etl::domain::scheduler::DailySchedule;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).single().expect("valid");
    /// let next = DailySchedule.next_fire_after(now);
    /// assert_eq!(next, Utc.with_ymd_and_hms(2024, 9, 2, 0, 0, 0).single().expect("valid"));
    /// ```
    pub fn next_fire_after(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        tomorrow.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Result of one scheduled trigger, including retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledOutcome {
    /// Runs attempted for this trigger, including the first.
    pub attempts: u32,
    /// Outcome of the last attempt.
    pub result: RunResult,
}

/// Drives a [`PipelineRun`] on a daily cadence with retries.
pub struct ScheduledRunner {
    pipeline: Arc<dyn PipelineRun>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn RunSleeper>,
    schedule: DailySchedule,
    retry: RetryPolicy,
}

impl ScheduledRunner {
    /// Build a runner that sleeps on the Tokio timer.
    pub fn new(pipeline: Arc<dyn PipelineRun>, clock: Arc<dyn Clock>, retry: RetryPolicy) -> Self {
        Self::with_sleeper(pipeline, clock, Arc::new(TokioSleeper), retry)
    }

    /// Build a runner with an injected sleeper.
    pub fn with_sleeper(
        pipeline: Arc<dyn PipelineRun>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn RunSleeper>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            pipeline,
            clock,
            sleeper,
            schedule: DailySchedule,
            retry,
        }
    }

    /// Run the pipeline, retrying failed runs per the retry policy.
    pub async fn run_with_retry(&self) -> ScheduledOutcome {
        let mut attempts = 1_u32;
        loop {
            match self.pipeline.run().await {
                Err(failure) if attempts <= self.retry.max_retries => {
                    warn!(
                        run_id = %failure.run_id,
                        attempt = attempts,
                        retry_delay_secs = self.retry.retry_delay.as_secs(),
                        error = %failure.error,
                        "pipeline run failed; retrying"
                    );
                    self.sleeper.sleep(self.retry.retry_delay).await;
                    attempts = attempts.saturating_add(1);
                }
                result => return ScheduledOutcome { attempts, result },
            }
        }
    }

    /// Sleep until the next daily fire time, then run with retries.
    pub async fn next_tick(&self) -> ScheduledOutcome {
        let now = self.clock.utc();
        let fire_at = self.schedule.next_fire_after(now);
        let wait = (fire_at - now).to_std().unwrap_or(Duration::ZERO);
        info!(%fire_at, wait_secs = wait.as_secs(), "next pipeline run scheduled");
        self.sleeper.sleep(wait).await;
        self.run_with_retry().await
    }

    /// Run once immediately, then once per day, until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let work = async {
            log_outcome(&self.run_with_retry().await);
            loop {
                log_outcome(&self.next_tick().await);
            }
        };

        tokio::select! {
            biased;
            () = shutdown => info!("scheduler stopping"),
            _ = work => {}
        }
    }
}

fn log_outcome(outcome: &ScheduledOutcome) {
    match &outcome.result {
        Ok(summary) => info!(
            run_id = %summary.run_id,
            attempts = outcome.attempts,
            inserted_count = summary.inserted_count,
            "scheduled run succeeded"
        ),
        Err(failure) => error!(
            run_id = %failure.run_id,
            attempts = outcome.attempts,
            failed_in = %failure.failed_in,
            error = %failure.error,
            "scheduled run failed"
        ),
    }
}
