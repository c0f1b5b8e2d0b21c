//! Per-run state machine and outcome types.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::PipelineError;

/// Lifecycle of one pipeline run.
///
/// ```text
/// Pending -> Extracting -> Transforming -> Loading -> Succeeded
///    \___________\______________\____________\______> Failed
/// ```
///
/// `Succeeded` and `Failed` are terminal; the pipeline never retries on its
/// own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Run created but no stage started.
    Pending,
    /// Fetching raw users from the source.
    Extracting,
    /// Mapping raw users into normalised records.
    Transforming,
    /// Writing normalised records to the store.
    Loading,
    /// Every stage completed.
    Succeeded,
    /// A stage failed; later stages were not invoked.
    Failed,
}

impl RunState {
    /// Return the state after the current stage completes successfully, or
    /// `None` when the state is terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use random_user_etl::domain::RunState;
    ///
    /// assert_eq!(RunState::Pending.advance(), Some(RunState::Extracting));
    /// assert_eq!(RunState::Succeeded.advance(), None);
    /// ```
    pub fn advance(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Extracting),
            Self::Extracting => Some(Self::Transforming),
            Self::Transforming => Some(Self::Loading),
            Self::Loading => Some(Self::Succeeded),
            Self::Succeeded | Self::Failed => None,
        }
    }

    /// Return `Failed` for any non-terminal state, `None` otherwise.
    pub fn fail(self) -> Option<Self> {
        if self.is_terminal() {
            None
        } else {
            Some(Self::Failed)
        }
    }

    /// Whether no further transition exists.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Stable lowercase label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Extracting => "extracting",
            Self::Transforming => "transforming",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a run that reached `Succeeded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Correlation identifier shared by every log line of the run.
    pub run_id: Uuid,
    /// When the run left `Pending`.
    pub started_at: DateTime<Utc>,
    /// When the run reached `Succeeded`.
    pub finished_at: DateTime<Utc>,
    /// Raw users returned by the source.
    pub extracted_count: usize,
    /// Records handed to the loader.
    pub transformed_count: usize,
    /// Rows newly inserted; existing `uuid`s are not counted.
    pub inserted_count: u64,
}

/// A run that ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("run {run_id} failed while {failed_in}: {error}")]
pub struct RunFailure {
    /// Correlation identifier shared by every log line of the run.
    pub run_id: Uuid,
    /// State the run was in when the error surfaced.
    pub failed_in: RunState,
    /// When the run left `Pending`.
    pub started_at: DateTime<Utc>,
    /// When the failure was recorded.
    pub finished_at: DateTime<Utc>,
    /// The stage error.
    #[source]
    pub error: PipelineError,
}

/// Outcome of one run as seen by a scheduler.
pub type RunResult = Result<RunSummary, RunFailure>;
