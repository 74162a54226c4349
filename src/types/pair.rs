//! Trading pair identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered (base, quote) pair, e.g. (ETH, USDT). Loaded from
/// configuration once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// Parse a `BASE/QUOTE` spec string.
    pub fn parse(spec: &str) -> Option<Self> {
        let (base, quote) = spec.trim().split_once('/')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some(Self::new(base, quote))
    }

    /// Concatenated exchange symbol, e.g. `ETHUSDT`.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_spec() {
        let pair = TradingPair::parse("eth/usdt").unwrap();
        assert_eq!(pair.base, "ETH");
        assert_eq!(pair.quote, "USDT");
        assert_eq!(pair.symbol(), "ETHUSDT");
        assert_eq!(pair.to_string(), "ETH/USDT");
    }

    #[test]
    fn test_parse_rejects_malformed_specs() {
        assert!(TradingPair::parse("ETHUSDT").is_none());
        assert!(TradingPair::parse("/USDT").is_none());
        assert!(TradingPair::parse("ETH/").is_none());
    }
}
