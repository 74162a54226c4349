//! Trade execution

pub mod orchestrator;

pub use orchestrator::*;
