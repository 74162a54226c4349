//! Short-TTL price caching for decentralized quote lookups
//!
//! The cache exists purely to bound request volume to the quote venue
//! within one scan cadence, never for correctness. A miss is an expected
//! steady-state condition.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Key/value contract the scanner consumes: `get` returns the cached price
/// or a miss, `set` stores a price with a time-to-live.
#[async_trait]
pub trait PriceCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Decimal>;
    async fn set(&self, key: &str, value: Decimal, ttl: Duration);
}

/// Build a cache key from a prefix and parameters, `prefix:a:b:c`.
pub fn cache_key(prefix: &str, params: &[&str]) -> String {
    let mut key = prefix.to_string();
    for param in params {
        key.push(':');
        key.push_str(param);
    }
    key
}

/// In-process cache with lazy expiry on read.
pub struct MemoryPriceCache {
    entries: RwLock<HashMap<String, (Decimal, Instant)>>,
}

impl MemoryPriceCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryPriceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceCache for MemoryPriceCache {
    async fn get(&self, key: &str) -> Option<Decimal> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, expires_at)) => {
                    if Instant::now() < *expires_at {
                        debug!("Cache HIT for key: {}", key);
                        return Some(*value);
                    }
                    true
                }
                None => false,
            }
        };

        if expired {
            self.entries.write().await.remove(key);
        }
        debug!("Cache MISS for key: {}", key);
        None
    }

    async fn set(&self, key: &str, value: Decimal, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value, expires_at));
    }
}
