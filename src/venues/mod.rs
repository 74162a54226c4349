//! Venue adapters and connection management
//!
//! The engine core only sees these traits; concrete adapters own transport,
//! retries, and price validation at the boundary. `Ok(None)` from a price
//! lookup means "no price available this cycle" and is never an error.

pub mod binance;
pub mod dex_http;
pub mod retry;

pub use binance::*;
pub use dex_http::*;
pub use retry::*;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::EngineResult;
use crate::types::{OrderFill, SwapReceipt, TradeSide};

/// Centralized-venue adapter: top-of-book prices and market orders.
#[async_trait]
pub trait CexVenue: Send + Sync {
    /// Venue identifier used in quotes and logs.
    fn name(&self) -> &str;

    async fn best_bid(&self, symbol: &str) -> EngineResult<Option<Decimal>>;
    async fn best_ask(&self, symbol: &str) -> EngineResult<Option<Decimal>>;
    async fn market_buy(&self, symbol: &str, qty: Decimal) -> EngineResult<OrderFill>;
    async fn market_sell(&self, symbol: &str, qty: Decimal) -> EngineResult<OrderFill>;

    /// Round a quantity to the venue's order-size granularity. Applied once
    /// before Leg1 submission, never inside profit logic.
    fn normalize_quantity(&self, symbol: &str, qty: Decimal) -> Decimal;
}

/// Decentralized-venue adapter: quoted output amounts and swap submission.
#[async_trait]
pub trait DexVenue: Send + Sync {
    /// Quoted price per unit of `base` in `quote` units for the given size.
    async fn quote(
        &self,
        venue_id: &str,
        base: &str,
        quote: &str,
        amount: Decimal,
    ) -> EngineResult<Option<Decimal>>;

    async fn swap(
        &self,
        venue_id: &str,
        side: TradeSide,
        base: &str,
        quote: &str,
        amount: Decimal,
        max_slippage_pct: Decimal,
    ) -> EngineResult<SwapReceipt>;
}
