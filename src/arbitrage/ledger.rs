//! Opportunity ledger: the current scan's ranked snapshot
//!
//! Single writer (the scanner, once per cycle), many readers. `replace`
//! swaps one immutable snapshot for another, so readers holding the
//! previous `Arc` keep a consistent view and never observe a mix of old
//! and new entries.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::types::Opportunity;

pub struct OpportunityLedger {
    entries: RwLock<Arc<Vec<Opportunity>>>,
}

impl OpportunityLedger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Atomically replace the full contents with a fresh scan's results.
    pub async fn replace(&self, opportunities: Vec<Opportunity>) {
        let mut entries = self.entries.write().await;
        *entries = Arc::new(opportunities);
    }

    /// The current ranked snapshot.
    pub async fn snapshot(&self) -> Arc<Vec<Opportunity>> {
        self.entries.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<Opportunity> {
        self.entries
            .read()
            .await
            .iter()
            .find(|opp| opp.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for OpportunityLedger {
    fn default() -> Self {
        Self::new()
    }
}
