//! Driving port through which a scheduler triggers pipeline runs.

use async_trait::async_trait;

use crate::domain::RunResult;

/// One complete extract, transform, load sequence.
///
/// Implementations never retry internally; retry and cadence belong to the
/// caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PipelineRun: Send + Sync {
    /// Execute every stage once and report the terminal outcome.
    async fn run(&self) -> RunResult;
}
