//! Cross-Venue Arbitrage Bot - Main Entry Point

use anyhow::Result;
use cross_arb_bot::cache::MemoryPriceCache;
use cross_arb_bot::venues::{BinanceVenue, HttpQuoteDex};
use cross_arb_bot::{ArbEngine, Config, utils};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;

    // Load configuration
    let config = Config::load();

    info!("🤖 Cross-Venue Arbitrage Bot v0.3.0");
    info!("📋 Configuration:");
    info!("   Pairs: {:?}", config.trading_pairs.iter().map(|p| p.to_string()).collect::<Vec<_>>());
    info!("   DEX venues: {:?}", config.dex_venues.iter().map(|v| v.venue_id.clone()).collect::<Vec<_>>());
    info!("   Min Profit: {}%", config.min_profit_pct);
    info!("   Max Slippage: {}%", config.max_slippage_pct);
    info!("   Trade Size: {}", config.trade_size);
    info!("   Scan Interval: {}ms", config.scan_interval_ms);
    info!("   Error Backoff: {}ms", config.error_backoff_ms);

    // Validate configuration
    config.validate()?;

    // Initialize venue adapters; the service cannot run without both.
    let cex = Arc::new(BinanceVenue::new(&config.cex_api_url, config.max_slippage_pct)?);
    let dex = Arc::new(HttpQuoteDex::new(&config.dex_quote_url)?);
    let cache = Arc::new(MemoryPriceCache::new());

    let engine = Arc::new(ArbEngine::new(config, cex, dex, cache));

    // Cooperative shutdown: clear the running flag and let the loop
    // finish its current iteration.
    let shutdown_engine = engine.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        info!("📛 Received shutdown signal (Ctrl+C)...");
        shutdown_engine.stop();
    });

    engine.run_loop().await;

    Ok(())
}
