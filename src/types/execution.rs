//! Trade execution types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Opportunity, TradeSide};

/// Fill report for a centralized-venue market order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFill {
    pub order_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub requested_qty: Decimal,
    pub filled_qty: Decimal,
    pub avg_price: Decimal,
    pub filled_at: DateTime<Utc>,
}

/// Receipt for a decentralized-venue swap submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub tx_ref: String,
    pub venue_id: String,
    pub side: TradeSide,
    pub filled_amount: Decimal,
    pub submitted_at: DateTime<Utc>,
}

/// Outcome of one leg, tagged by the venue kind that executed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LegResult {
    CexFill(OrderFill),
    DexSwap(SwapReceipt),
}

/// Which leg failed, if any. Once Leg1 settles the position is real; a
/// `Leg2` failure means a one-sided position exists and must be resolved
/// externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    None,
    Leg1,
    Leg2,
}

/// Result of one execution attempt. Created once per attempt; the audit
/// trail beyond this value belongs to the logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub opportunity: Opportunity,
    pub leg1: Option<LegResult>,
    pub leg2: Option<LegResult>,
    pub succeeded: bool,
    pub failure_stage: FailureStage,
    pub error_message: Option<String>,
}
