//! Custom error types for the engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure taxonomy for the arbitrage engine.
///
/// A missing price or quote is NOT an error: venue adapters report it as
/// `Ok(None)` and the scanner skips the combination. Leg failures during
/// execution are folded into the `ExecutionOutcome` and never escape the
/// orchestrator boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Computation error: {context}")]
    Computation { context: String },

    #[error("Venue error: {venue} - {message}")]
    Venue {
        venue: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Price validation failed: {venue} price {price} is invalid - {reason}")]
    InvalidPrice {
        venue: String,
        price: Decimal,
        reason: String,
    },

    #[error("Opportunity not found: {id}")]
    NotFound { id: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl EngineError {
    pub fn computation(context: impl Into<String>) -> Self {
        Self::Computation {
            context: context.into(),
        }
    }

    pub fn venue(venue: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Venue {
            venue: venue.into(),
            message: message.into(),
            source: None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
