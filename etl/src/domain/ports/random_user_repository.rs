//! Driven port for persisting normalised users.

use std::sync::Mutex;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::NormalizedUserRecord;

define_port_error! {
    /// Errors raised while persisting users.
    pub enum RandomUserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "random user persistence connection failed: {message}",
        /// The destination table could not be created.
        Schema { message: String } =>
            "random user table creation failed: {message}",
        /// A statement failed and the batch was rolled back.
        Query { message: String } =>
            "random user persistence query failed: {message}",
    }
}

/// Port for writing users to the destination store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RandomUserRepository: Send + Sync {
    /// Ensure the destination table exists, then insert every record whose
    /// `uuid` is not yet stored, all in one transaction.
    ///
    /// Returns the number of rows newly inserted. Records whose `uuid` already
    /// exists are skipped silently; any other failure rolls back the batch.
    async fn insert_if_absent(
        &self,
        records: &[NormalizedUserRecord],
    ) -> Result<u64, RandomUserRepositoryError>;
}

/// In-memory implementation keyed by `uuid`, for tests that do not need a
/// database.
#[derive(Debug, Default)]
pub struct FixtureRandomUserRepository {
    rows: Mutex<Vec<NormalizedUserRecord>>,
}

impl FixtureRandomUserRepository {
    /// Snapshot the stored rows in insertion order.
    pub fn rows(&self) -> Vec<NormalizedUserRecord> {
        self.rows
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl RandomUserRepository for FixtureRandomUserRepository {
    async fn insert_if_absent(
        &self,
        records: &[NormalizedUserRecord],
    ) -> Result<u64, RandomUserRepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| RandomUserRepositoryError::connection("fixture store poisoned"))?;
        let mut staged = rows.clone();
        let mut inserted = 0_u64;
        for record in records {
            if staged.iter().any(|row| row.uuid == record.uuid) {
                continue;
            }
            if staged.iter().any(|row| row.email == record.email) {
                return Err(RandomUserRepositoryError::query(format!(
                    "duplicate email for uuid {}",
                    record.uuid
                )));
            }
            staged.push(record.clone());
            inserted += 1;
        }
        *rows = staged;
        Ok(inserted)
    }
}
