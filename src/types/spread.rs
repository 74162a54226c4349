//! Spread computation and opportunity types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TradingPair;

/// Direction of a cross-venue round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Buy on the centralized venue, sell on the decentralized venue.
    CexToDex,
    /// Buy on the decentralized venue, sell on the centralized venue.
    DexToCex,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::CexToDex => write!(f, "CEX→DEX"),
            TradeDirection::DexToCex => write!(f, "DEX→CEX"),
        }
    }
}

/// Output of one profit computation for one direction on one venue.
///
/// All money-valued fields are exact decimals; `profit_percentage` keeps
/// full precision here and is rounded only at the reporting boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadResult {
    pub direction: TradeDirection,
    pub venue_id: String,
    pub pair: TradingPair,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub buy_fee_amount: Decimal,
    pub sell_fee_amount: Decimal,
    pub gas_cost: Decimal,
    pub trade_size: Decimal,
    pub total_buy_cost: Decimal,
    pub total_sell_proceeds: Decimal,
    pub raw_profit: Decimal,
    pub profit_after_gas: Decimal,
    pub profit_percentage: Decimal,
    pub computed_at: DateTime<Utc>,
}

/// A spread result that cleared the minimum-profit threshold, addressable
/// by a generated identifier for manual execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    #[serde(flatten)]
    pub spread: SpreadResult,
}

impl Opportunity {
    pub fn new(spread: SpreadResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            spread,
        }
    }
}
