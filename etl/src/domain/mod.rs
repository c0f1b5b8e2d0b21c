//! Domain model for the random user pipeline.
//!
//! Purpose: define the raw and normalized record shapes, the pure
//! transformation between them, the run state machine, and the ports
//! through which adapters feed and drain the pipeline. Adapters live under
//! `crate::outbound`.

pub mod ports;
pub mod scheduler;

mod error;
mod pipeline;
mod run;
mod transform;
mod user;

pub use self::error::PipelineError;
pub use self::pipeline::RandomUserPipeline;
pub use self::run::{RunFailure, RunResult, RunState, RunSummary};
pub use self::transform::transform_users;
pub use self::user::{
    NormalizedUserRecord, RawDateOfBirth, RawLocation, RawLogin, RawName, RawUserRecord,
};
