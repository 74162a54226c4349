//! Two-leg execution orchestration
//!
//! The two legs of a cross-venue trade cannot be made atomic: once Leg1
//! settles, the position is real. A Leg2 failure is therefore reported as
//! a one-sided position for external resolution, never rolled back.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::types::{
    ExecutionOutcome, FailureStage, LegResult, Opportunity, TradeDirection, TradeSide,
};
use crate::venues::{CexVenue, DexVenue};

pub struct ExecutionOrchestrator {
    cex: Arc<dyn CexVenue>,
    dex: Arc<dyn DexVenue>,
    max_slippage_pct: Decimal,
    // Single-permit gate: manual triggers and the autonomous loop must
    // never execute concurrently over the same balances.
    gate: Mutex<()>,
}

impl ExecutionOrchestrator {
    pub fn new(cex: Arc<dyn CexVenue>, dex: Arc<dyn DexVenue>, max_slippage_pct: Decimal) -> Self {
        Self {
            cex,
            dex,
            max_slippage_pct,
            gate: Mutex::new(()),
        }
    }

    /// Execute both legs in sequence. Never returns an error: every
    /// failure is captured in the outcome.
    pub async fn execute(&self, opportunity: &Opportunity) -> ExecutionOutcome {
        let _permit = self.gate.lock().await;

        let spread = &opportunity.spread;
        let symbol = spread.pair.symbol();
        let qty = self.cex.normalize_quantity(&symbol, spread.trade_size);

        info!(
            "⚙️ Executing {}: {} {} on {} (size {})",
            opportunity.id, spread.direction, spread.pair, spread.venue_id, qty
        );

        // Leg1: the buy side of the round trip.
        let leg1 = match spread.direction {
            TradeDirection::CexToDex => self
                .cex
                .market_buy(&symbol, qty)
                .await
                .map(LegResult::CexFill),
            TradeDirection::DexToCex => self
                .dex
                .swap(
                    &spread.venue_id,
                    TradeSide::Buy,
                    &spread.pair.base,
                    &spread.pair.quote,
                    qty,
                    self.max_slippage_pct,
                )
                .await
                .map(LegResult::DexSwap),
        };

        let leg1 = match leg1 {
            Ok(leg1) => leg1,
            Err(e) => {
                error!("❌ Leg1 failed for {}: {}", opportunity.id, e);
                return ExecutionOutcome {
                    opportunity: opportunity.clone(),
                    leg1: None,
                    leg2: None,
                    succeeded: false,
                    failure_stage: FailureStage::Leg1,
                    error_message: Some(e.to_string()),
                };
            }
        };

        // Leg2 sizes off Leg1's actual fill.
        let filled_qty = match &leg1 {
            LegResult::CexFill(fill) => fill.filled_qty,
            LegResult::DexSwap(receipt) => receipt.filled_amount,
        };
        info!(
            "✅ Leg1 settled for {} (filled {}), submitting Leg2",
            opportunity.id, filled_qty
        );

        let leg2 = match spread.direction {
            TradeDirection::CexToDex => self
                .dex
                .swap(
                    &spread.venue_id,
                    TradeSide::Sell,
                    &spread.pair.base,
                    &spread.pair.quote,
                    filled_qty,
                    self.max_slippage_pct,
                )
                .await
                .map(LegResult::DexSwap),
            TradeDirection::DexToCex => self
                .cex
                .market_sell(&symbol, filled_qty)
                .await
                .map(LegResult::CexFill),
        };

        match leg2 {
            Ok(leg2) => {
                info!("✅ Both legs settled for {}", opportunity.id);
                ExecutionOutcome {
                    opportunity: opportunity.clone(),
                    leg1: Some(leg1),
                    leg2: Some(leg2),
                    succeeded: true,
                    failure_stage: FailureStage::None,
                    error_message: None,
                }
            }
            Err(e) => {
                error!(
                    "🚨 Leg2 failed for {} after Leg1 settled - one-sided position of {} {} requires manual resolution: {}",
                    opportunity.id, filled_qty, spread.pair.base, e
                );
                ExecutionOutcome {
                    opportunity: opportunity.clone(),
                    leg1: Some(leg1),
                    leg2: None,
                    succeeded: false,
                    failure_stage: FailureStage::Leg2,
                    error_message: Some(e.to_string()),
                }
            }
        }
    }
}
