//! Long-lived engine service: owns the scan loop and exposes the
//! operations an external inspection surface consumes

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, error, info};

use crate::arbitrage::{OpportunityLedger, OpportunityScanner};
use crate::cache::PriceCache;
use crate::config::Config;
use crate::errors::{BackoffPolicy, EngineError, EngineResult};
use crate::execution::ExecutionOrchestrator;
use crate::types::{EngineStatus, ExecutionOutcome, Opportunity};
use crate::utils::display;
use crate::venues::{CexVenue, DexVenue};

const STATS_EVERY_CYCLES: u64 = 50;

#[derive(Debug, Default)]
struct ScanStats {
    cycles: AtomicU64,
    opportunities_found: AtomicU64,
    executions: AtomicU64,
    successful_executions: AtomicU64,
}

/// The engine: all collaborators are injected at construction, so both
/// venue adapters can be replaced by test doubles.
pub struct ArbEngine {
    config: Arc<Config>,
    scanner: OpportunityScanner,
    ledger: Arc<OpportunityLedger>,
    orchestrator: ExecutionOrchestrator,
    backoff: BackoffPolicy,
    running: AtomicBool,
    stats: ScanStats,
}

impl ArbEngine {
    pub fn new(
        config: Config,
        cex: Arc<dyn CexVenue>,
        dex: Arc<dyn DexVenue>,
        cache: Arc<dyn PriceCache>,
    ) -> Self {
        let config = Arc::new(config);
        let ledger = Arc::new(OpportunityLedger::new());
        let scanner = OpportunityScanner::new(
            config.clone(),
            cex.clone(),
            dex.clone(),
            cache,
            ledger.clone(),
        );
        let orchestrator = ExecutionOrchestrator::new(cex, dex, config.max_slippage_pct);
        let backoff = BackoffPolicy::new(config.scan_interval_ms, config.error_backoff_ms);

        Self {
            config,
            scanner,
            ledger,
            orchestrator,
            backoff,
            running: AtomicBool::new(false),
            stats: ScanStats::default(),
        }
    }

    /// The ledger's current ranked snapshot.
    pub async fn current_opportunities(&self) -> Arc<Vec<Opportunity>> {
        self.ledger.snapshot().await
    }

    /// Synchronous re-scan on demand; replaces the ledger like a loop
    /// cycle would.
    pub async fn trigger_scan(&self) -> EngineResult<Vec<Opportunity>> {
        self.scanner.scan().await
    }

    /// Execute one ledger entry by identifier. Serialized against the
    /// autonomous loop by the orchestrator's gate.
    pub async fn execute_by_id(&self, id: &str) -> EngineResult<ExecutionOutcome> {
        let opportunity = self
            .ledger
            .find(id)
            .await
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })?;
        Ok(self.execute(&opportunity).await)
    }

    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            running: self.is_running(),
            initialized: true,
            opportunity_count: self.ledger.len().await,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Cooperative stop: the loop exits after completing its current
    /// iteration; an in-flight execution is never interrupted.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Spawn the scan loop onto the runtime.
    pub fn start(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move { engine.run_loop().await })
    }

    /// Scan → execute everything above threshold → sleep, until stopped.
    /// A cycle error is logged and widens the sleep; it never terminates
    /// the loop.
    pub async fn run_loop(&self) {
        self.running.store(true, Ordering::SeqCst);
        info!(
            "🚀 Scan loop started: {} pair(s), {} venue(s), interval {:?}",
            self.config.trading_pairs.len(),
            self.config.dex_venues.len(),
            self.backoff.scan_interval
        );

        while self.is_running() {
            let errored = match self.run_cycle().await {
                Ok(()) => false,
                Err(e) => {
                    error!("Scan cycle error: {}. Backing off.", e);
                    true
                }
            };

            let cycles = self.stats.cycles.fetch_add(1, Ordering::SeqCst) + 1;
            if cycles % STATS_EVERY_CYCLES == 0 {
                self.log_stats();
            }

            tokio::time::sleep(self.backoff.delay(errored)).await;
        }

        info!("🛑 Scan loop stopped");
        self.log_stats();
    }

    async fn run_cycle(&self) -> EngineResult<()> {
        let opportunities = self.scanner.scan().await?;
        if opportunities.is_empty() {
            debug!("No opportunities above threshold this cycle");
            return Ok(());
        }

        self.stats
            .opportunities_found
            .fetch_add(opportunities.len() as u64, Ordering::SeqCst);
        info!(
            "💹 {} opportunity(ies) above {}% threshold",
            opportunities.len(),
            self.config.min_profit_pct
        );

        // Strictly sequential: one execution settles before the next
        // starts, and before the next scan cycle begins.
        for opportunity in &opportunities {
            display::print_opportunity(opportunity);
            self.execute(opportunity).await;
        }

        Ok(())
    }

    async fn execute(&self, opportunity: &Opportunity) -> ExecutionOutcome {
        let outcome = self.orchestrator.execute(opportunity).await;
        self.stats.executions.fetch_add(1, Ordering::SeqCst);
        if outcome.succeeded {
            self.stats
                .successful_executions
                .fetch_add(1, Ordering::SeqCst);
        }
        display::print_execution_outcome(&outcome);
        outcome
    }

    fn log_stats(&self) {
        info!(
            "📊 Session stats: {} cycles, {} opportunities, {}/{} executions succeeded",
            self.stats.cycles.load(Ordering::SeqCst),
            self.stats.opportunities_found.load(Ordering::SeqCst),
            self.stats.successful_executions.load(Ordering::SeqCst),
            self.stats.executions.load(Ordering::SeqCst),
        );
    }
}
