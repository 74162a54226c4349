//! Per-cycle opportunity scanning across pairs and venues

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::arbitrage::calculator::{SpreadParams, compute_spread};
use crate::arbitrage::ledger::OpportunityLedger;
use crate::cache::{PriceCache, cache_key};
use crate::config::{Config, DexVenueParams};
use crate::errors::EngineResult;
use crate::types::{Opportunity, SpreadResult, TradeDirection, TradingPair, VenueQuote};
use crate::venues::{CexVenue, DexVenue};

/// Fans out over every configured pair × venue × direction each cycle and
/// publishes the ranked, threshold-filtered snapshot to the ledger.
pub struct OpportunityScanner {
    config: Arc<Config>,
    cex: Arc<dyn CexVenue>,
    dex: Arc<dyn DexVenue>,
    cache: Arc<dyn PriceCache>,
    ledger: Arc<OpportunityLedger>,
}

impl OpportunityScanner {
    pub fn new(
        config: Arc<Config>,
        cex: Arc<dyn CexVenue>,
        dex: Arc<dyn DexVenue>,
        cache: Arc<dyn PriceCache>,
        ledger: Arc<OpportunityLedger>,
    ) -> Self {
        Self {
            config,
            cex,
            dex,
            cache,
            ledger,
        }
    }

    /// Produce a fresh, fully materialized snapshot and atomically replace
    /// the ledger contents with it.
    pub async fn scan(&self) -> EngineResult<Vec<Opportunity>> {
        let computed_at = Utc::now();
        let mut retained: Vec<SpreadResult> = Vec::new();

        for pair in &self.config.trading_pairs {
            let symbol = pair.symbol();
            let Some(cex_quote) = self.cex_top_of_book(&symbol).await else {
                debug!("No CEX top-of-book for {} this cycle, skipping pair", pair);
                continue;
            };

            for venue in &self.config.dex_venues {
                let Some(dex_quote) = self.dex_quote_cached(venue, pair).await else {
                    debug!(
                        "No DEX quote for {} on {} this cycle, skipping",
                        pair, venue.venue_id
                    );
                    continue;
                };

                for direction in [TradeDirection::CexToDex, TradeDirection::DexToCex] {
                    let Some(params) = self.spread_params(
                        direction, venue, pair, &cex_quote, &dex_quote, computed_at,
                    ) else {
                        continue;
                    };
                    match compute_spread(&params) {
                        Ok(result) => {
                            if result.profit_percentage > self.config.min_profit_pct {
                                retained.push(result);
                            }
                        }
                        Err(e) => {
                            warn!(
                                "Spread computation failed for {} on {} ({}): {}",
                                pair, venue.venue_id, direction, e
                            );
                        }
                    }
                }
            }
        }

        let opportunities: Vec<Opportunity> =
            rank(retained).into_iter().map(Opportunity::new).collect();

        self.ledger.replace(opportunities.clone()).await;
        Ok(opportunities)
    }

    /// One CEX fetch per pair per cycle; both sides must be present.
    async fn cex_top_of_book(&self, symbol: &str) -> Option<VenueQuote> {
        let bid = match self.cex.best_bid(symbol).await {
            Ok(Some(bid)) => bid,
            Ok(None) => return None,
            Err(e) => {
                debug!("CEX bid fetch failed for {}: {}", symbol, e);
                return None;
            }
        };
        let ask = match self.cex.best_ask(symbol).await {
            Ok(Some(ask)) => ask,
            Ok(None) => return None,
            Err(e) => {
                debug!("CEX ask fetch failed for {}: {}", symbol, e);
                return None;
            }
        };
        Some(VenueQuote::cex(self.cex.name(), bid, ask))
    }

    /// Cache-or-fetch DEX price. A miss followed by an adapter failure is
    /// "no price available this cycle", never an error.
    async fn dex_quote_cached(
        &self,
        venue: &DexVenueParams,
        pair: &TradingPair,
    ) -> Option<VenueQuote> {
        let key = cache_key("dex_price", &[&venue.venue_id, &pair.base, &pair.quote]);
        if let Some(price) = self.cache.get(&key).await {
            return Some(VenueQuote::dex(&venue.venue_id, price));
        }

        match self
            .dex
            .quote(&venue.venue_id, &pair.base, &pair.quote, self.config.trade_size)
            .await
        {
            Ok(Some(price)) => {
                self.cache
                    .set(
                        &key,
                        price,
                        Duration::from_millis(self.config.price_cache_ttl_ms),
                    )
                    .await;
                Some(VenueQuote::dex(&venue.venue_id, price))
            }
            Ok(None) => None,
            Err(e) => {
                debug!("DEX quote failed for {} on {}: {}", pair, venue.venue_id, e);
                None
            }
        }
    }

    /// Map a direction onto concrete prices and fee rates. `None` when the
    /// required side of a quote is missing.
    fn spread_params(
        &self,
        direction: TradeDirection,
        venue: &DexVenueParams,
        pair: &TradingPair,
        cex_quote: &VenueQuote,
        dex_quote: &VenueQuote,
        computed_at: chrono::DateTime<Utc>,
    ) -> Option<SpreadParams> {
        let (buy_price, sell_price, buy_fee_rate, sell_fee_rate) = match direction {
            TradeDirection::CexToDex => (
                cex_quote.ask?,
                dex_quote.ask?,
                self.config.cex_fee_rate(),
                venue.fee_rate(),
            ),
            TradeDirection::DexToCex => (
                dex_quote.bid?,
                cex_quote.bid?,
                venue.fee_rate(),
                self.config.cex_fee_rate(),
            ),
        };

        Some(SpreadParams {
            direction,
            venue_id: venue.venue_id.clone(),
            pair: pair.clone(),
            buy_price,
            sell_price,
            buy_fee_rate,
            sell_fee_rate,
            gas_cost: venue.gas_cost,
            trade_size: self.config.trade_size,
            computed_at,
        })
    }
}

/// Rank by profit percentage descending. The sort is stable, so ties keep
/// discovery order (pair outer, venue inner, CEX→DEX before DEX→CEX).
fn rank(mut spreads: Vec<SpreadResult>) -> Vec<SpreadResult> {
    spreads.sort_by(|a, b| b.profit_percentage.cmp(&a.profit_percentage));
    spreads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryPriceCache;
    use crate::errors::{EngineError, EngineResult};
    use crate::types::{OrderFill, SwapReceipt, TradeSide};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubCex {
        bid: Option<Decimal>,
        ask: Option<Decimal>,
    }

    #[async_trait]
    impl CexVenue for StubCex {
        fn name(&self) -> &str {
            "stub-cex"
        }
        async fn best_bid(&self, _symbol: &str) -> EngineResult<Option<Decimal>> {
            Ok(self.bid)
        }
        async fn best_ask(&self, _symbol: &str) -> EngineResult<Option<Decimal>> {
            Ok(self.ask)
        }
        async fn market_buy(&self, _symbol: &str, _qty: Decimal) -> EngineResult<OrderFill> {
            Err(EngineError::venue("stub-cex", "orders not supported"))
        }
        async fn market_sell(&self, _symbol: &str, _qty: Decimal) -> EngineResult<OrderFill> {
            Err(EngineError::venue("stub-cex", "orders not supported"))
        }
        fn normalize_quantity(&self, _symbol: &str, qty: Decimal) -> Decimal {
            qty
        }
    }

    struct StubDex {
        prices: HashMap<String, Decimal>,
        quote_calls: AtomicU32,
    }

    impl StubDex {
        fn with_price(venue_id: &str, price: Decimal) -> Self {
            let mut prices = HashMap::new();
            prices.insert(venue_id.to_string(), price);
            Self {
                prices,
                quote_calls: AtomicU32::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                prices: HashMap::new(),
                quote_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl DexVenue for StubDex {
        async fn quote(
            &self,
            venue_id: &str,
            _base: &str,
            _quote: &str,
            _amount: Decimal,
        ) -> EngineResult<Option<Decimal>> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.prices.get(venue_id).copied())
        }

        async fn swap(
            &self,
            _venue_id: &str,
            _side: TradeSide,
            _base: &str,
            _quote: &str,
            _amount: Decimal,
            _max_slippage_pct: Decimal,
        ) -> EngineResult<SwapReceipt> {
            Err(EngineError::venue("stub-dex", "swaps not supported"))
        }
    }

    fn test_config() -> Config {
        Config {
            min_profit_pct: dec!(0.5),
            max_slippage_pct: dec!(0.5),
            trade_size: dec!(1),
            cex_fee_pct: dec!(0.1),
            trading_pairs: vec![TradingPair::new("ETH", "USDT")],
            dex_venues: vec![DexVenueParams {
                venue_id: "uniswap_v3".to_string(),
                fee_pct: dec!(0.3),
                gas_cost: dec!(0.10),
            }],
            scan_interval_ms: 1000,
            error_backoff_ms: 5000,
            price_cache_ttl_ms: 60_000,
            cex_api_url: String::new(),
            dex_quote_url: String::new(),
        }
    }

    fn build_scanner(
        config: Config,
        cex: StubCex,
        dex: StubDex,
    ) -> (OpportunityScanner, Arc<OpportunityLedger>) {
        let ledger = Arc::new(OpportunityLedger::new());
        let scanner = OpportunityScanner::new(
            Arc::new(config),
            Arc::new(cex),
            Arc::new(dex),
            Arc::new(MemoryPriceCache::new()),
            ledger.clone(),
        );
        (scanner, ledger)
    }

    fn spread_with_pct(pct: Decimal, venue_id: &str) -> SpreadResult {
        // Fee-free, gas-free spread over a buy cost of 100 hits the target
        // percentage exactly.
        compute_spread(&SpreadParams {
            direction: TradeDirection::CexToDex,
            venue_id: venue_id.to_string(),
            pair: TradingPair::new("ETH", "USDT"),
            buy_price: dec!(100),
            sell_price: dec!(100) + pct,
            buy_fee_rate: dec!(0),
            sell_fee_rate: dec!(0),
            gas_cost: dec!(0),
            trade_size: dec!(1),
            computed_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_data_yields_empty_snapshot_and_empty_ledger() {
        let (scanner, ledger) = build_scanner(
            test_config(),
            StubCex { bid: None, ask: None },
            StubDex::empty(),
        );

        let result = scanner.scan().await.unwrap();
        assert!(result.is_empty());
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_dex_quote_skips_combination() {
        let (scanner, ledger) = build_scanner(
            test_config(),
            StubCex {
                bid: Some(dec!(99.98)),
                ask: Some(dec!(100.00)),
            },
            StubDex::empty(),
        );

        let result = scanner.scan().await.unwrap();
        assert!(result.is_empty());
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_reference_scenario_is_excluded_below_threshold() {
        // CEX ask 100.00, DEX 101.00 → CEX→DEX profit ≈ 0.4965% < 0.5%
        let (scanner, _ledger) = build_scanner(
            test_config(),
            StubCex {
                bid: Some(dec!(99.98)),
                ask: Some(dec!(100.00)),
            },
            StubDex::with_price("uniswap_v3", dec!(101.00)),
        );

        assert!(scanner.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reference_scenario_is_included_above_threshold() {
        // DEX at 102.00 → CEX→DEX profit ≈ 1.4925% > 0.5%
        let (scanner, ledger) = build_scanner(
            test_config(),
            StubCex {
                bid: Some(dec!(99.98)),
                ask: Some(dec!(100.00)),
            },
            StubDex::with_price("uniswap_v3", dec!(102.00)),
        );

        let result = scanner.scan().await.unwrap();
        assert_eq!(result.len(), 1);
        let spread = &result[0].spread;
        assert_eq!(spread.direction, TradeDirection::CexToDex);
        assert_eq!(spread.profit_after_gas, dec!(1.494));
        assert_eq!(spread.profit_percentage.round_dp(4), dec!(1.4925));
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_threshold_comparison_is_strictly_greater_than() {
        // Fee-free venue: ask 100, DEX 100.5 → exactly 0.5%, excluded.
        let mut config = test_config();
        config.cex_fee_pct = dec!(0);
        config.dex_venues[0].fee_pct = dec!(0);
        config.dex_venues[0].gas_cost = dec!(0);

        let (at_threshold, _) = build_scanner(
            config.clone(),
            StubCex {
                bid: Some(dec!(99)),
                ask: Some(dec!(100)),
            },
            StubDex::with_price("uniswap_v3", dec!(100.5)),
        );
        assert!(at_threshold.scan().await.unwrap().is_empty());

        // One tick above the threshold is included.
        let (above_threshold, _) = build_scanner(
            config,
            StubCex {
                bid: Some(dec!(99)),
                ask: Some(dec!(100)),
            },
            StubDex::with_price("uniswap_v3", dec!(100.501)),
        );
        assert_eq!(above_threshold.scan().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_bounds_quote_requests_within_ttl() {
        let config = test_config();
        let ledger = Arc::new(OpportunityLedger::new());
        let dex = Arc::new(StubDex::with_price("uniswap_v3", dec!(102.00)));
        let scanner = OpportunityScanner::new(
            Arc::new(config),
            Arc::new(StubCex {
                bid: Some(dec!(99.98)),
                ask: Some(dec!(100.00)),
            }),
            dex.clone(),
            Arc::new(MemoryPriceCache::new()),
            ledger,
        );

        scanner.scan().await.unwrap();
        scanner.scan().await.unwrap();
        assert_eq!(dex.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ranking_is_descending_and_stable_on_ties() {
        let spreads = vec![
            spread_with_pct(dec!(1.2), "venue_a"),
            spread_with_pct(dec!(3.4), "venue_b"),
            spread_with_pct(dec!(3.4), "venue_c"),
            spread_with_pct(dec!(0.9), "venue_d"),
        ];

        let ranked = rank(spreads);
        let order: Vec<&str> = ranked.iter().map(|s| s.venue_id.as_str()).collect();
        assert_eq!(order, vec!["venue_b", "venue_c", "venue_a", "venue_d"]);
    }
}
