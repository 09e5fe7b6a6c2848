//! Market Snapshot Analyzer
//!
//! Fetches the trailing window for a symbol, reduces it to summary
//! statistics, and evaluates the tolerance-adjusted BUY threshold.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AdvisorError, Result};
use crate::market::MarketDataProvider;
use crate::model::{Decision, MarketSnapshot, Recommendation};

/// Tolerance-adjusted price ceiling: `(1 + tolerance/100) * recent_low`.
///
/// Strictly increasing in the tolerance score for any positive recent low,
/// so a higher tolerance always admits a higher close.
pub fn buy_threshold(recent_low: Decimal, stock_tolerance: u8) -> Decimal {
    recent_low * Decimal::from(100 + u32::from(stock_tolerance)) / dec!(100)
}

/// Evaluate a snapshot against a stock tolerance score.
///
/// BUY only while the latest close sits strictly below the threshold; a
/// close exactly at the threshold is DON'T BUY.
pub fn evaluate(snapshot: MarketSnapshot, stock_tolerance: u8) -> Recommendation {
    let threshold = buy_threshold(snapshot.recent_low, stock_tolerance);
    let decision = if snapshot.latest_close < threshold {
        Decision::Buy
    } else {
        Decision::DontBuy
    };

    Recommendation {
        decision,
        threshold,
        snapshot,
    }
}

/// Analyzer over an injected market data provider.
pub struct SnapshotAnalyzer {
    provider: Arc<dyn MarketDataProvider>,
}

impl SnapshotAnalyzer {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// One read-only provider call, then pure evaluation.
    ///
    /// An empty or missing series fails with `DataUnavailable` before any
    /// statistic is computed; no partial snapshot escapes.
    pub async fn analyze(&self, symbol: &str, stock_tolerance: u8) -> Result<Recommendation> {
        let bars = self.provider.daily_history(symbol).await?;

        let snapshot = MarketSnapshot::from_bars(symbol, &bars)
            .ok_or_else(|| AdvisorError::DataUnavailable(symbol.to_string()))?;
        tracing::debug!(symbol, as_of = %snapshot.as_of, "market snapshot computed");

        Ok(evaluate(snapshot, stock_tolerance))
    }
}
