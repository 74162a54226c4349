//! HTTP quote-server DEX adapter
//!
//! Talks to an aggregator-style quote endpoint (`GET /quote`) that returns
//! the output amount for a given input amount and token pair. Swaps are
//! paper-filled from a fresh quote with the slippage allowance applied;
//! on-chain submission lives behind this interface and is not part of the
//! engine.

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
use crate::types::{SwapReceipt, TradeSide};
use crate::venues::{DexVenue, RetryConfig, retry_with_backoff};

const HTTP_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "outAmount")]
    out_amount: String,
}

pub struct HttpQuoteDex {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuoteDex {
    pub fn new(base_url: &str) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| EngineError::Venue {
                venue: "dex".to_string(),
                message: "Failed to build HTTP client".to_string(),
                source: Some(e.into()),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_quote(
        &self,
        venue_id: &str,
        input_token: &str,
        output_token: &str,
        amount: Decimal,
    ) -> EngineResult<Option<Decimal>> {
        if amount <= dec!(0) {
            return Err(EngineError::computation(format!(
                "Quote amount must be positive, got {}",
                amount
            )));
        }

        let url = format!("{}/quote", self.base_url);
        let amount_str = amount.to_string();

        let operation = || async {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("venue", venue_id),
                    ("inputToken", input_token),
                    ("outputToken", output_token),
                    ("amount", amount_str.as_str()),
                ])
                .send()
                .await
                .context("HTTP request failed")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(
                    "⚠️ Quote server returned error status {} for {}: {}",
                    status, venue_id, body
                );
                return Ok(None);
            }

            let quote: QuoteResponse = response
                .json()
                .await
                .context("Failed to parse quote response")?;

            let out_amount =
                Decimal::from_str(&quote.out_amount).context("Failed to parse outAmount")?;

            Ok(Some(out_amount))
        };

        let out_amount = retry_with_backoff(
            operation,
            &RetryConfig {
                max_attempts: 3,
                initial_delay_ms: 200,
                ..Default::default()
            },
            "DEX quote fetch",
        )
        .await?;

        match out_amount {
            Some(out) if out <= dec!(0) => Err(EngineError::InvalidPrice {
                venue: venue_id.to_string(),
                price: out,
                reason: "Non-positive quoted output amount".to_string(),
            }),
            Some(out) => {
                let price = out.checked_div(amount).ok_or_else(|| {
                    EngineError::computation("Division by zero in quote price")
                })?;
                Ok(Some(price))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DexVenue for HttpQuoteDex {
    async fn quote(
        &self,
        venue_id: &str,
        base: &str,
        quote: &str,
        amount: Decimal,
    ) -> EngineResult<Option<Decimal>> {
        self.fetch_quote(venue_id, base, quote, amount).await
    }

    async fn swap(
        &self,
        venue_id: &str,
        side: TradeSide,
        base: &str,
        quote: &str,
        amount: Decimal,
        max_slippage_pct: Decimal,
    ) -> EngineResult<SwapReceipt> {
        let price = self
            .fetch_quote(venue_id, base, quote, amount)
            .await?
            .ok_or_else(|| {
                EngineError::venue(venue_id, format!("No quote for {}/{}", base, quote))
            })?;

        let slippage_factor = dec!(1) - max_slippage_pct / dec!(100);
        let filled_amount = match side {
            // Buying base: the fill degrades the amount of base received.
            TradeSide::Buy => amount * slippage_factor,
            // Selling base: the fill degrades the quote proceeds.
            TradeSide::Sell => amount * price * slippage_factor,
        };

        let receipt = SwapReceipt {
            tx_ref: format!("0x{}", uuid::Uuid::new_v4().to_string().replace('-', "")),
            venue_id: venue_id.to_string(),
            side,
            filled_amount,
            submitted_at: Utc::now(),
        };

        info!(
            "🎭 Paper swap on {}: {:?} {} {} @ {} → filled {}",
            venue_id, side, amount, base, price, filled_amount
        );

        Ok(receipt)
    }
}
