//! randomuser.me outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `RandomUserSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_ENDPOINT, RandomUserHttpSource};
