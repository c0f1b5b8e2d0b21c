//! Driven port for fetching raw users from the upstream API.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::RawUserRecord;

/// Number of users requested from the source on every run.
pub const RANDOM_USER_BATCH_SIZE: u32 = 50;

define_port_error! {
    /// Errors surfaced while calling the random user source.
    pub enum RandomUserSourceError {
        /// The source answered with a non-success HTTP status.
        Status { status: u16, message: String } =>
            "random user source returned {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "random user transport failed: {message}",
        /// The request exceeded the client timeout.
        Timeout { message: String } =>
            "random user request timed out: {message}",
        /// The response body did not have the expected shape.
        Decode { message: String } =>
            "random user response decode failed: {message}",
    }
}

/// Port for pulling one batch of raw users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RandomUserSource: Send + Sync {
    /// Fetch one batch of [`RANDOM_USER_BATCH_SIZE`] raw users.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use random_user_etl::domain::ports::{FixtureRandomUserSource, RandomUserSource};
    ///
    /// let users = FixtureRandomUserSource::default().fetch_users().await?;
    /// assert!(users.is_empty());
    /// # Ok::<(), random_user_etl::domain::ports::RandomUserSourceError>(())
    /// ```
    async fn fetch_users(&self) -> Result<Vec<RawUserRecord>, RandomUserSourceError>;
}

/// Fixture implementation returning a preset batch.
#[derive(Debug, Clone, Default)]
pub struct FixtureRandomUserSource {
    users: Vec<RawUserRecord>,
}

impl FixtureRandomUserSource {
    /// Build a fixture that serves `users` on every call.
    pub fn new(users: Vec<RawUserRecord>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RandomUserSource for FixtureRandomUserSource {
    async fn fetch_users(&self) -> Result<Vec<RawUserRecord>, RandomUserSourceError> {
        Ok(self.users.clone())
    }
}
