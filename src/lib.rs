//! Cross-venue arbitrage engine
//!
//! Continuously compares prices for the same pairs on a centralized venue
//! and one or more decentralized venues, computes round-trip profitability
//! after fees and gas, and executes the two legs of a trade when the
//! configured profit threshold is exceeded.

pub mod arbitrage;
pub mod cache;
pub mod config;
pub mod errors;
pub mod execution;
pub mod service;
pub mod types;
pub mod utils;
pub mod venues;

// Re-export commonly used items
pub use config::Config;
pub use errors::{EngineError, EngineResult};
pub use service::ArbEngine;
pub use types::*;
