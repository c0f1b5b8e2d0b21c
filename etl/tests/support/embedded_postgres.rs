//! Database helpers for suites running against embedded PostgreSQL.
//!
//! Database reset and inspection go through `postgres` directly so they do
//! not share connections or transactions with the code under test.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

fn connect(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))
}

/// Drop and recreate `name` so each suite starts from an empty database.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = connect(&admin_url)?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Whether `random_users` exists in the public schema.
pub fn table_exists(database_url: &str) -> Result<bool, String> {
    let mut client = connect(database_url)?;
    client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name = 'random_users')",
            &[],
        )
        .map(|row| row.get::<_, bool>(0))
        .map_err(|err| format_postgres_error(&err))
}

/// Number of stored users, or zero when the table does not exist yet.
pub fn stored_row_count(database_url: &str) -> Result<i64, String> {
    if !table_exists(database_url)? {
        return Ok(0);
    }
    let mut client = connect(database_url)?;
    client
        .query_one("SELECT COUNT(*) FROM random_users", &[])
        .map(|row| row.get::<_, i64>(0))
        .map_err(|err| format_postgres_error(&err))
}
