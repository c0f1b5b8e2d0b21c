//! PostgreSQL-backed random user loader.

use async_trait::async_trait;
use diesel::sql_query;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use super::diesel_helpers::{map_diesel_error, map_pool_error, map_schema_error};
use super::models::NewRandomUserRow;
use super::pool::{DbPool, PoolConfig, PoolError};
use super::schema::random_users;
use crate::config::DatabaseSettings;
use crate::domain::NormalizedUserRecord;
use crate::domain::ports::{RandomUserRepository, RandomUserRepositoryError};

const CREATE_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS random_users (
    uuid TEXT PRIMARY KEY,
    full_name TEXT,
    gender TEXT,
    age INT,
    email TEXT UNIQUE,
    city TEXT,
    country TEXT
)
";

/// Diesel-backed implementation of the random user repository port.
#[derive(Clone)]
pub struct DieselRandomUserRepository {
    pool: DbPool,
}

impl DieselRandomUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Build a pool from connection settings and wrap it.
    ///
    /// No connection is opened here; the first load checks one out.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the settings do not form a valid
    /// URL or the pool cannot be constructed.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, PoolError> {
        let database_url = settings
            .database_url()
            .map_err(|err| PoolError::build(err.to_string()))?;
        let pool = DbPool::new(PoolConfig::new(database_url)).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RandomUserRepository for DieselRandomUserRepository {
    async fn insert_if_absent(
        &self,
        records: &[NormalizedUserRecord],
    ) -> Result<u64, RandomUserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        sql_query(CREATE_TABLE_SQL)
            .execute(&mut conn)
            .await
            .map_err(map_schema_error)?;

        if records.is_empty() {
            return Ok(0);
        }

        let rows: Vec<NewRandomUserRow<'_>> = records.iter().map(NewRandomUserRow::from).collect();
        let inserted = conn
            .transaction(|conn| {
                async move {
                    let mut inserted = 0_u64;
                    for row in &rows {
                        let affected = diesel::insert_into(random_users::table)
                            .values(row)
                            .on_conflict(random_users::uuid)
                            .do_nothing()
                            .execute(conn)
                            .await?;
                        if affected == 0 {
                            debug!(uuid = row.uuid, "user already stored; skipping");
                        }
                        inserted += u64::try_from(affected).unwrap_or(0);
                    }
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted)
    }
}
