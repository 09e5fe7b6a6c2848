//! Mock Market Data Provider
//!
//! For testing and offline runs. Serves deterministic per-symbol series and
//! counts invocations so tests can assert whether the market was reached at
//! all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MarketDataProvider;
use crate::error::Result;
use crate::model::DailyBar;

const WINDOW_DAYS: i64 = 22;

/// Mock market data with deterministic prices
pub struct MockMarketData {
    fixtures: HashMap<String, Vec<DailyBar>>,
    calls: AtomicUsize,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            fixtures: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pin an exact series for a symbol, overriding the built-in seeds.
    pub fn with_fixture(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.fixtures.insert(symbol.to_uppercase(), bars);
        self
    }

    /// Number of `daily_history` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seed (starting close, per-day drift) for built-in symbols
    fn seed(symbol: &str) -> Option<(Decimal, Decimal)> {
        match symbol {
            "AAPL" => Some((dec!(180.00), dec!(0.75))),
            "MSFT" => Some((dec!(410.00), dec!(-1.25))),
            "IBM" => Some((dec!(135.00), dec!(0.40))),
            "TSLA" => Some((dec!(240.00), dec!(-2.50))),
            "KO" => Some((dec!(62.00), dec!(0.10))),
            _ => None,
        }
    }

    fn build_series(start: Decimal, drift: Decimal) -> Vec<DailyBar> {
        // fixed anchor keeps the series reproducible across runs
        let anchor = NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid anchor date");

        (0..WINDOW_DAYS)
            .map(|day| {
                let close = start + drift * Decimal::from(day);
                DailyBar {
                    date: anchor + Duration::days(day),
                    open: close - dec!(0.50),
                    high: close + dec!(1.20),
                    low: close - dec!(1.60),
                    close,
                }
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let symbol = symbol.to_uppercase();
        if let Some(bars) = self.fixtures.get(&symbol) {
            return Ok(bars.clone());
        }

        Ok(Self::seed(&symbol)
            .map(|(start, drift)| Self::build_series(start, drift))
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_symbol_series() {
        let provider = MockMarketData::new();

        let bars = provider.daily_history("aapl").await.unwrap();
        assert_eq!(bars.len(), WINDOW_DAYS as usize);
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
        assert!(bars.iter().all(|b| b.low < b.close && b.close < b.high));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty() {
        let provider = MockMarketData::new();
        let bars = provider.daily_history("NOTREAL").await.unwrap();
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn test_call_counter() {
        let provider = MockMarketData::new();
        assert_eq!(provider.call_count(), 0);

        provider.daily_history("IBM").await.unwrap();
        provider.daily_history("NOTREAL").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fixture_overrides_seed() {
        let bar = DailyBar {
            date: NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
            open: dec!(10),
            high: dec!(11),
            low: dec!(9),
            close: dec!(10.50),
        };
        let provider = MockMarketData::new().with_fixture("IBM", vec![bar]);

        let bars = provider.daily_history("IBM").await.unwrap();
        assert_eq!(bars, vec![bar]);
    }
}
