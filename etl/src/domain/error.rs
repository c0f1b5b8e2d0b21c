//! Pipeline error taxonomy.
//!
//! Every stage failure surfaces as one of these variants. There is no partial
//! success path: a run either completes every stage or fails with the first
//! error raised.

use crate::domain::ports::{RandomUserRepositoryError, RandomUserSourceError, define_port_error};

define_port_error! {
    /// Errors that abort a pipeline run.
    pub enum PipelineError {
        /// The source could not be reached or answered with a non-success
        /// status. `status` is `None` for transport failures and timeouts.
        SourceUnavailable { status: Option<u16>, message: String } =>
            "random user source unavailable: {message}",
        /// The source answered but the body was not the expected shape.
        MalformedResponse { message: String } =>
            "random user response malformed: {message}",
        /// A raw record lacked a required field; the whole batch is rejected.
        FieldMissing { path: String, index: usize } =>
            "raw user record {index} is missing required field `{path}`",
        /// Table creation or the batch insert failed and was rolled back.
        LoadFailed { message: String } =>
            "random user load failed: {message}",
    }
}

impl PipelineError {
    /// Return the HTTP status observed by the extractor, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SourceUnavailable { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<RandomUserSourceError> for PipelineError {
    fn from(error: RandomUserSourceError) -> Self {
        match error {
            RandomUserSourceError::Status { status, message } => {
                Self::source_unavailable(status, message)
            }
            RandomUserSourceError::Transport { message }
            | RandomUserSourceError::Timeout { message } => {
                Self::source_unavailable(None::<u16>, message)
            }
            RandomUserSourceError::Decode { message } => Self::malformed_response(message),
        }
    }
}

impl From<RandomUserRepositoryError> for PipelineError {
    fn from(error: RandomUserRepositoryError) -> Self {
        Self::load_failed(error.to_string())
    }
}
