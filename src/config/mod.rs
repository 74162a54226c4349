//! Configuration management for the engine

pub mod settings;

pub use settings::*;
