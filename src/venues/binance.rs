//! Binance venue adapter
//!
//! Live top-of-book prices from the public book-ticker endpoint. Market
//! orders are paper-filled at the current top of book with the configured
//! slippage allowance applied, so the engine runs end-to-end without API
//! keys.

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{EngineError, EngineResult};
use crate::types::{OrderFill, TradeSide};
use crate::venues::{CexVenue, RetryConfig, retry_with_backoff};

const VENUE_NAME: &str = "binance";
const HTTP_TIMEOUT_SECS: u64 = 3;
const DEFAULT_QTY_STEP: Decimal = dec!(0.0001);

#[derive(Debug, Deserialize)]
struct BookTicker {
    #[serde(rename = "bidPrice")]
    bid_price: String,
    #[serde(rename = "askPrice")]
    ask_price: String,
}

pub struct BinanceVenue {
    client: reqwest::Client,
    base_url: String,
    max_slippage_rate: Decimal,
    qty_step: Decimal,
}

impl BinanceVenue {
    pub fn new(base_url: &str, max_slippage_pct: Decimal) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| EngineError::Venue {
                venue: VENUE_NAME.to_string(),
                message: "Failed to build HTTP client".to_string(),
                source: Some(e.into()),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_slippage_rate: max_slippage_pct / dec!(100),
            qty_step: DEFAULT_QTY_STEP,
        })
    }

    /// Fetch (bid, ask) for a symbol. `Ok(None)` when the venue has no
    /// book for it this cycle.
    async fn book_ticker(&self, symbol: &str) -> EngineResult<Option<(Decimal, Decimal)>> {
        let url = format!("{}/api/v3/ticker/bookTicker", self.base_url);

        let operation = || async {
            let response = self
                .client
                .get(&url)
                .query(&[("symbol", symbol)])
                .send()
                .await
                .context("HTTP request failed")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("⚠️ Binance API returned error status {}: {}", status, body);
                return Ok(None);
            }

            let ticker: BookTicker = response
                .json()
                .await
                .context("Failed to parse book ticker response")?;

            let bid = Decimal::from_str(&ticker.bid_price).context("Failed to parse bid price")?;
            let ask = Decimal::from_str(&ticker.ask_price).context("Failed to parse ask price")?;

            Ok(Some((bid, ask)))
        };

        let ticker = retry_with_backoff(
            operation,
            &RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 200,
                ..Default::default()
            },
            "Binance book ticker fetch",
        )
        .await?;

        match ticker {
            Some((bid, ask)) => {
                if bid <= dec!(0) || ask <= dec!(0) {
                    warn!("⚠️ Invalid price received from Binance: bid={} ask={}", bid, ask);
                    return Err(EngineError::InvalidPrice {
                        venue: VENUE_NAME.to_string(),
                        price: bid.min(ask),
                        reason: "Non-positive top-of-book price".to_string(),
                    });
                }
                Ok(Some((bid, ask)))
            }
            None => Ok(None),
        }
    }

    async fn paper_fill(
        &self,
        symbol: &str,
        side: TradeSide,
        qty: Decimal,
    ) -> EngineResult<OrderFill> {
        let (bid, ask) = self.book_ticker(symbol).await?.ok_or_else(|| {
            EngineError::venue(VENUE_NAME, format!("No top-of-book price for {}", symbol))
        })?;

        // Fill at top of book degraded by the slippage allowance.
        let avg_price = match side {
            TradeSide::Buy => ask * (dec!(1) + self.max_slippage_rate),
            TradeSide::Sell => bid * (dec!(1) - self.max_slippage_rate),
        };

        let fill = OrderFill {
            order_id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            side,
            requested_qty: qty,
            filled_qty: qty,
            avg_price,
            filled_at: Utc::now(),
        };

        info!(
            "🎭 Paper fill on Binance: {:?} {} {} @ {}",
            side, qty, symbol, avg_price
        );

        Ok(fill)
    }
}

#[async_trait]
impl CexVenue for BinanceVenue {
    fn name(&self) -> &str {
        VENUE_NAME
    }

    async fn best_bid(&self, symbol: &str) -> EngineResult<Option<Decimal>> {
        Ok(self.book_ticker(symbol).await?.map(|(bid, _)| bid))
    }

    async fn best_ask(&self, symbol: &str) -> EngineResult<Option<Decimal>> {
        Ok(self.book_ticker(symbol).await?.map(|(_, ask)| ask))
    }

    async fn market_buy(&self, symbol: &str, qty: Decimal) -> EngineResult<OrderFill> {
        self.paper_fill(symbol, TradeSide::Buy, qty).await
    }

    async fn market_sell(&self, symbol: &str, qty: Decimal) -> EngineResult<OrderFill> {
        self.paper_fill(symbol, TradeSide::Sell, qty).await
    }

    fn normalize_quantity(&self, _symbol: &str, qty: Decimal) -> Decimal {
        (qty / self.qty_step).floor() * self.qty_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker_body(bid: &str, ask: &str) -> String {
        format!(
            r#"{{"symbol":"ETHUSDT","bidPrice":"{}","bidQty":"10.5","askPrice":"{}","askQty":"8.2"}}"#,
            bid, ask
        )
    }

    #[tokio::test]
    async fn test_parses_top_of_book() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/bookTicker")
            .match_query(mockito::Matcher::UrlEncoded(
                "symbol".into(),
                "ETHUSDT".into(),
            ))
            .with_status(200)
            .with_body(ticker_body("99.98", "100.02"))
            .create_async()
            .await;

        let venue = BinanceVenue::new(&server.url(), dec!(0.5)).unwrap();
        let bid = venue.best_bid("ETHUSDT").await.unwrap();
        let ask = venue.best_ask("ETHUSDT").await.unwrap();

        assert_eq!(bid, Some(dec!(99.98)));
        assert_eq!(ask, Some(dec!(100.02)));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_unavailable_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/bookTicker")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
            .create_async()
            .await;

        let venue = BinanceVenue::new(&server.url(), dec!(0.5)).unwrap();
        assert_eq!(venue.best_bid("NOPEUSDT").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_positive_price_rejected_at_boundary() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/bookTicker")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(ticker_body("0", "100.02"))
            .create_async()
            .await;

        let venue = BinanceVenue::new(&server.url(), dec!(0.5)).unwrap();
        let err = venue.best_bid("ETHUSDT").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidPrice { .. }));
    }

    #[tokio::test]
    async fn test_paper_buy_fills_at_ask_plus_slippage() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v3/ticker/bookTicker")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(ticker_body("99.98", "100.00"))
            .create_async()
            .await;

        let venue = BinanceVenue::new(&server.url(), dec!(0.5)).unwrap();
        let fill = venue.market_buy("ETHUSDT", dec!(1)).await.unwrap();

        assert_eq!(fill.side, TradeSide::Buy);
        assert_eq!(fill.filled_qty, dec!(1));
        assert_eq!(fill.avg_price, dec!(100.00) * dec!(1.005));
    }

    #[test]
    fn test_normalize_quantity_rounds_down_to_step() {
        let venue = BinanceVenue::new("http://localhost", dec!(0.5)).unwrap();
        assert_eq!(venue.normalize_quantity("ETHUSDT", dec!(1.23456789)), dec!(1.2345));
        assert_eq!(venue.normalize_quantity("ETHUSDT", dec!(2)), dec!(2.0000));
    }
}
