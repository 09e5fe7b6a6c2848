//! Market Data Integration
//!
//! Abstractions and implementations for daily price history providers.

mod mock;
mod yahoo;

pub use mock::MockMarketData;
pub use yahoo::YahooMarketData;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::DailyBar;

/// Market data client trait (Strategy pattern)
///
/// Implement this for each upstream source: Yahoo, a broker API, a fixture
/// set for tests. One call fetches the whole trailing window; the advisor
/// never retries or caches on its own.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Trailing one-month daily OHLC history for a symbol, ascending by
    /// date. An unknown symbol yields an empty series, which the analyzer
    /// reports as unavailable data.
    async fn daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>>;

    /// Provider name
    fn name(&self) -> &str;
}
