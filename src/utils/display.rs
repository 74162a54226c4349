//! Human-readable report lines for opportunities and executions
//!
//! Percentages are rounded to display precision here and nowhere else.

use tracing::{info, warn};

use crate::types::{ExecutionOutcome, FailureStage, Opportunity};

pub fn print_opportunity(opportunity: &Opportunity) {
    let s = &opportunity.spread;
    info!("💰 ARBITRAGE OPPORTUNITY {}", opportunity.id);
    info!("   {} | {} | {}", s.pair, s.venue_id, s.direction);
    info!(
        "   Buy @ {} → Sell @ {} (size {})",
        s.buy_price, s.sell_price, s.trade_size
    );
    info!(
        "   Profit after gas: {} {} ({}%)",
        s.profit_after_gas.round_dp(4),
        s.pair.quote,
        s.profit_percentage.round_dp(4)
    );
}

pub fn print_execution_outcome(outcome: &ExecutionOutcome) {
    match outcome.failure_stage {
        FailureStage::None => {
            info!(
                "🏁 Execution of {} settled both legs ({}%)",
                outcome.opportunity.id,
                outcome.opportunity.spread.profit_percentage.round_dp(4)
            );
        }
        FailureStage::Leg1 => {
            warn!(
                "🏁 Execution of {} failed at Leg1, no position taken: {}",
                outcome.opportunity.id,
                outcome.error_message.as_deref().unwrap_or("unknown")
            );
        }
        FailureStage::Leg2 => {
            warn!(
                "🏁 Execution of {} failed at Leg2 - ONE-SIDED POSITION open: {}",
                outcome.opportunity.id,
                outcome.error_message.as_deref().unwrap_or("unknown")
            );
        }
    }
}
