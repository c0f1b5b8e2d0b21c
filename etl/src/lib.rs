//! Daily extract, transform and load of randomuser.me users into PostgreSQL.
//!
//! The [`domain`] module holds the pipeline, its ports and the scheduler;
//! [`outbound`] holds the HTTP source and the Diesel loader; [`config`]
//! loads database settings.

pub mod config;
pub mod domain;
pub mod outbound;
