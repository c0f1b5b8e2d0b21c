//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod pipeline_run;
mod random_user_repository;
mod random_user_source;

#[cfg(test)]
pub use pipeline_run::MockPipelineRun;
pub use pipeline_run::PipelineRun;
#[cfg(test)]
pub use random_user_repository::MockRandomUserRepository;
pub use random_user_repository::{
    FixtureRandomUserRepository, RandomUserRepository, RandomUserRepositoryError,
};
#[cfg(test)]
pub use random_user_source::MockRandomUserSource;
pub use random_user_source::{
    FixtureRandomUserSource, RANDOM_USER_BATCH_SIZE, RandomUserSource, RandomUserSourceError,
};
