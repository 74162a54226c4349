//! Venue price quote types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time price observation from one venue.
///
/// A centralized venue carries both sides of the book; a decentralized
/// venue reports a single quoted price that stands in for both sides of a
/// direction-specific calculation. Quotes are never mutated, only replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueQuote {
    pub venue_id: String,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub observed_at: DateTime<Utc>,
}

impl VenueQuote {
    pub fn cex(venue_id: impl Into<String>, bid: Decimal, ask: Decimal) -> Self {
        Self {
            venue_id: venue_id.into(),
            bid: Some(bid),
            ask: Some(ask),
            observed_at: Utc::now(),
        }
    }

    /// A single-price DEX quote, usable on either side.
    pub fn dex(venue_id: impl Into<String>, price: Decimal) -> Self {
        Self {
            venue_id: venue_id.into(),
            bid: Some(price),
            ask: Some(price),
            observed_at: Utc::now(),
        }
    }
}

/// Which side of a venue a leg takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}
