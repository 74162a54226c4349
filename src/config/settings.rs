//! Engine configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

use crate::errors::{EngineError, EngineResult};
use crate::types::TradingPair;

// Configuration bounds
pub const MIN_TRADE_SIZE: Decimal = dec!(0.0001);
pub const MAX_TRADE_SIZE: Decimal = dec!(1000);
pub const MIN_PROFIT_PCT_FLOOR: Decimal = dec!(0);
pub const MAX_SLIPPAGE_PCT_CAP: Decimal = dec!(5);

// Scan loop defaults
pub const DEFAULT_SCAN_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_ERROR_BACKOFF_MS: u64 = 5000;
pub const DEFAULT_PRICE_CACHE_TTL_MS: u64 = 500;

/// Fee and gas parameters for one decentralized venue.
#[derive(Debug, Clone, PartialEq)]
pub struct DexVenueParams {
    pub venue_id: String,
    pub fee_pct: Decimal,
    pub gas_cost: Decimal,
}

impl DexVenueParams {
    /// Fee as a fraction (0.3% → 0.003).
    pub fn fee_rate(&self) -> Decimal {
        self.fee_pct / dec!(100)
    }

    /// Parse a `venue:fee_pct:gas_cost` spec string.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.trim().split(':');
        let venue_id = parts.next()?.trim();
        if venue_id.is_empty() {
            return None;
        }
        let fee_pct = Decimal::from_str(parts.next()?.trim()).ok()?;
        let gas_cost = Decimal::from_str(parts.next()?.trim()).ok()?;
        if fee_pct < dec!(0) || gas_cost < dec!(0) {
            return None;
        }
        Some(Self {
            venue_id: venue_id.to_string(),
            fee_pct,
            gas_cost,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub min_profit_pct: Decimal,
    pub max_slippage_pct: Decimal,
    pub trade_size: Decimal,
    pub cex_fee_pct: Decimal,
    pub trading_pairs: Vec<TradingPair>,
    pub dex_venues: Vec<DexVenueParams>,
    pub scan_interval_ms: u64,
    pub error_backoff_ms: u64,
    pub price_cache_ttl_ms: u64,
    pub cex_api_url: String,
    pub dex_quote_url: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            min_profit_pct: env::var("MIN_PROFIT_PCT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(0.5))
                .max(MIN_PROFIT_PCT_FLOOR),
            max_slippage_pct: env::var("MAX_SLIPPAGE_PCT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(0.5))
                .max(dec!(0))
                .min(MAX_SLIPPAGE_PCT_CAP),
            trade_size: env::var("TRADE_SIZE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1.0))
                .max(MIN_TRADE_SIZE)
                .min(MAX_TRADE_SIZE),
            cex_fee_pct: env::var("CEX_FEE_PCT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(0.1))
                .max(dec!(0)),
            trading_pairs: parse_trading_pairs(
                &env::var("TRADING_PAIRS").unwrap_or_else(|_| "ETH/USDT".to_string()),
            ),
            dex_venues: parse_dex_venues(
                &env::var("DEX_VENUES").unwrap_or_else(|_| "uniswap_v3:0.3:0.10".to_string()),
            ),
            scan_interval_ms: env::var("SCAN_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SCAN_INTERVAL_MS)
                .max(100),
            error_backoff_ms: env::var("ERROR_BACKOFF_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_ERROR_BACKOFF_MS),
            price_cache_ttl_ms: env::var("PRICE_CACHE_TTL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PRICE_CACHE_TTL_MS),
            cex_api_url: env::var("CEX_API_URL")
                .unwrap_or_else(|_| "https://api.binance.com".to_string()),
            dex_quote_url: env::var("DEX_QUOTE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8787".to_string()),
        }
    }

    /// Startup validation. The engine cannot run without at least one
    /// pair and one venue.
    pub fn validate(&self) -> EngineResult<()> {
        if self.trading_pairs.is_empty() {
            return Err(EngineError::Config {
                message: "No valid trading pairs configured".to_string(),
            });
        }
        if self.dex_venues.is_empty() {
            return Err(EngineError::Config {
                message: "No valid DEX venues configured".to_string(),
            });
        }
        Ok(())
    }

    /// CEX taker fee as a fraction (0.1% → 0.001).
    pub fn cex_fee_rate(&self) -> Decimal {
        self.cex_fee_pct / dec!(100)
    }

    pub fn venue_params(&self, venue_id: &str) -> Option<&DexVenueParams> {
        self.dex_venues.iter().find(|v| v.venue_id == venue_id)
    }
}

fn parse_trading_pairs(raw: &str) -> Vec<TradingPair> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(TradingPair::parse)
        .collect()
}

fn parse_dex_venues(raw: &str) -> Vec<DexVenueParams> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(DexVenueParams::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dex_venue_spec() {
        let params = DexVenueParams::parse("uniswap_v3:0.3:0.10").unwrap();
        assert_eq!(params.venue_id, "uniswap_v3");
        assert_eq!(params.fee_pct, dec!(0.3));
        assert_eq!(params.gas_cost, dec!(0.10));
        assert_eq!(params.fee_rate(), dec!(0.003));
    }

    #[test]
    fn test_parse_dex_venue_rejects_malformed_specs() {
        assert!(DexVenueParams::parse("uniswap_v3").is_none());
        assert!(DexVenueParams::parse(":0.3:0.10").is_none());
        assert!(DexVenueParams::parse("uniswap_v3:abc:0.10").is_none());
        assert!(DexVenueParams::parse("uniswap_v3:-0.3:0.10").is_none());
    }

    #[test]
    fn test_parse_trading_pair_list() {
        let pairs = parse_trading_pairs("ETH/USDT, WBTC/USDT");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], TradingPair::new("ETH", "USDT"));
        assert_eq!(pairs[1], TradingPair::new("WBTC", "USDT"));
    }

    #[test]
    fn test_parse_venue_list_skips_bad_entries() {
        let venues = parse_dex_venues("uniswap_v3:0.3:0.10,bogus,sushiswap:0.25:0.08");
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[1].venue_id, "sushiswap");
    }

    #[test]
    fn test_validate_rejects_empty_pairs_or_venues() {
        let config = Config {
            min_profit_pct: dec!(0.5),
            max_slippage_pct: dec!(0.5),
            trade_size: dec!(1),
            cex_fee_pct: dec!(0.1),
            trading_pairs: Vec::new(),
            dex_venues: parse_dex_venues("uniswap_v3:0.3:0.10"),
            scan_interval_ms: 1000,
            error_backoff_ms: 5000,
            price_cache_ttl_ms: 500,
            cex_api_url: String::new(),
            dex_quote_url: String::new(),
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::Config { .. })
        ));

        let config = Config {
            trading_pairs: parse_trading_pairs("ETH/USDT"),
            dex_venues: Vec::new(),
            ..config
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::Config { .. })
        ));
    }
}
