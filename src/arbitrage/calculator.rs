//! Spread and profit calculation for one direction of a cross-venue trade

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::errors::{EngineError, EngineResult};
use crate::types::{SpreadResult, TradeDirection, TradingPair};

/// Inputs for one spread computation. `computed_at` is supplied by the
/// caller so the computation stays deterministic given its inputs.
#[derive(Debug, Clone)]
pub struct SpreadParams {
    pub direction: TradeDirection,
    pub venue_id: String,
    pub pair: TradingPair,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub buy_fee_rate: Decimal,
    pub sell_fee_rate: Decimal,
    pub gas_cost: Decimal,
    pub trade_size: Decimal,
    pub computed_at: DateTime<Utc>,
}

/// Pure profit computation for one direction. No I/O, no hidden state.
///
/// A zero total buy cost is a malformed input and fails explicitly rather
/// than silently producing a meaningless percentage.
pub fn compute_spread(params: &SpreadParams) -> EngineResult<SpreadResult> {
    let buy_cost = params.buy_price * params.trade_size;
    let buy_fee = buy_cost * params.buy_fee_rate;
    let total_buy_cost = buy_cost + buy_fee;

    let sell_proceeds = params.sell_price * params.trade_size;
    let sell_fee = sell_proceeds * params.sell_fee_rate;
    let total_sell_proceeds = sell_proceeds - sell_fee;

    let raw_profit = total_sell_proceeds - total_buy_cost;
    let profit_after_gas = raw_profit - params.gas_cost;

    let profit_percentage = profit_after_gas
        .checked_div(total_buy_cost)
        .ok_or_else(|| {
            EngineError::computation(format!(
                "Total buy cost is zero for {} on {}",
                params.pair, params.venue_id
            ))
        })?
        * dec!(100);

    Ok(SpreadResult {
        direction: params.direction,
        venue_id: params.venue_id.clone(),
        pair: params.pair.clone(),
        buy_price: params.buy_price,
        sell_price: params.sell_price,
        buy_fee_amount: buy_fee,
        sell_fee_amount: sell_fee,
        gas_cost: params.gas_cost,
        trade_size: params.trade_size,
        total_buy_cost,
        total_sell_proceeds,
        raw_profit,
        profit_after_gas,
        profit_percentage,
        computed_at: params.computed_at,
    })
}
