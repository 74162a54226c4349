//! Error handling and backoff policy

pub mod backoff;
pub mod engine_error;

pub use backoff::*;
pub use engine_error::*;
