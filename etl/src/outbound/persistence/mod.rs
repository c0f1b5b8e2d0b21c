//! PostgreSQL persistence adapters using Diesel.
//!
//! The repository translates normalized records into Diesel rows; schema
//! definitions and row structs stay internal to this module.
//!
//! # Example
//!
//! ```ignore
//! use random_user_etl::outbound::persistence::{DbPool, DieselRandomUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/warehouse")).await?;
//! let repo = DieselRandomUserRepository::new(pool);
//! ```

mod diesel_helpers;
mod diesel_random_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_random_user_repository::DieselRandomUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
