//! Pipeline driver sequencing extract, transform and load.
//!
//! Each stage is exposed on its own so an orchestrator can call them as
//! discrete units; [`PipelineRun::run`] chains them for a scheduler. A stage
//! only starts once the previous stage's output is fully materialised, and the
//! first error ends the run.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::ports::{PipelineRun, RandomUserRepository, RandomUserSource};
use crate::domain::{
    NormalizedUserRecord, PipelineError, RawUserRecord, RunFailure, RunResult, RunState,
    RunSummary, transform_users,
};

/// Domain service running the random user ETL.
pub struct RandomUserPipeline<S, R> {
    source: Arc<S>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S, R> RandomUserPipeline<S, R> {
    /// Create a pipeline over the given source and repository.
    pub fn new(source: Arc<S>, repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            repository,
            clock,
        }
    }
}

impl<S, R> RandomUserPipeline<S, R>
where
    S: RandomUserSource,
    R: RandomUserRepository,
{
    /// Fetch one batch of raw users.
    ///
    /// # Errors
    ///
    /// [`PipelineError::SourceUnavailable`] for non-success statuses and
    /// transport failures, [`PipelineError::MalformedResponse`] for bodies
    /// that do not decode.
    pub async fn extract(&self) -> Result<Vec<RawUserRecord>, PipelineError> {
        self.source.fetch_users().await.map_err(PipelineError::from)
    }

    /// Normalise a batch of raw users. See [`transform_users`].
    ///
    /// # Errors
    ///
    /// [`PipelineError::FieldMissing`] when any record lacks a required field.
    pub fn transform(
        &self,
        raw: Vec<RawUserRecord>,
    ) -> Result<Vec<NormalizedUserRecord>, PipelineError> {
        transform_users(raw)
    }

    /// Persist a batch, returning the number of rows newly inserted.
    ///
    /// # Errors
    ///
    /// [`PipelineError::LoadFailed`] when table creation or any insert fails;
    /// the batch is rolled back in that case.
    pub async fn load(&self, records: &[NormalizedUserRecord]) -> Result<u64, PipelineError> {
        self.repository
            .insert_if_absent(records)
            .await
            .map_err(PipelineError::from)
    }

    async fn execute(&self, run: &mut RunTracker) -> Result<StageCounts, PipelineError> {
        run.advance();
        let raw = self.extract().await?;
        let extracted_count = raw.len();
        info!(run_id = %run.run_id, extracted_count, "extracted raw users");

        run.advance();
        let records = self.transform(raw)?;
        let transformed_count = records.len();

        run.advance();
        let inserted_count = self.load(&records).await?;
        info!(
            run_id = %run.run_id,
            inserted_count,
            skipped_count = u64::try_from(transformed_count)
                .unwrap_or(u64::MAX)
                .saturating_sub(inserted_count),
            "loaded users"
        );

        run.advance();
        Ok(StageCounts {
            extracted_count,
            transformed_count,
            inserted_count,
        })
    }
}

#[async_trait]
impl<S, R> PipelineRun for RandomUserPipeline<S, R>
where
    S: RandomUserSource,
    R: RandomUserRepository,
{
    async fn run(&self) -> RunResult {
        let mut run = RunTracker::new(self.clock.utc());
        info!(run_id = %run.run_id, "pipeline run started");

        match self.execute(&mut run).await {
            Ok(counts) => {
                let summary = RunSummary {
                    run_id: run.run_id,
                    started_at: run.started_at,
                    finished_at: self.clock.utc(),
                    extracted_count: counts.extracted_count,
                    transformed_count: counts.transformed_count,
                    inserted_count: counts.inserted_count,
                };
                info!(run_id = %summary.run_id, state = %run.state, "pipeline run finished");
                Ok(summary)
            }
            Err(error) => {
                let failed_in = run.state;
                run.fail();
                warn!(
                    run_id = %run.run_id,
                    %failed_in,
                    error = %error,
                    "pipeline run failed"
                );
                Err(RunFailure {
                    run_id: run.run_id,
                    failed_in,
                    started_at: run.started_at,
                    finished_at: self.clock.utc(),
                    error,
                })
            }
        }
    }
}

struct StageCounts {
    extracted_count: usize,
    transformed_count: usize,
    inserted_count: u64,
}

struct RunTracker {
    run_id: Uuid,
    state: RunState,
    started_at: DateTime<Utc>,
}

impl RunTracker {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: RunState::Pending,
            started_at,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.advance() {
            self.transition(next);
        }
    }

    fn fail(&mut self) {
        if let Some(next) = self.state.fail() {
            self.transition(next);
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!(run_id = %self.run_id, from = %self.state, to = %next, "run state changed");
        self.state = next;
    }
}
