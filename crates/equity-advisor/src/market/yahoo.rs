//! Yahoo Finance Provider
//!
//! Fetches the trailing one-month daily chart from the public v8 chart
//! endpoint. One request per call; no retry, no caching.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use rust_decimal::Decimal;
use serde_json::Value;

use super::MarketDataProvider;
use crate::error::Result;
use crate::model::DailyBar;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Market data client backed by the Yahoo Finance chart API
pub struct YahooMarketData {
    http: reqwest::Client,
}

impl YahooMarketData {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let url = format!("{CHART_URL}/{symbol}?range=1mo&interval=1d");

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            // Yahoo answers 404 for unknown symbols; an empty series lets
            // the analyzer report that as unavailable data
            tracing::debug!(symbol, status = %resp.status(), "chart request rejected");
            return Ok(Vec::new());
        }

        let json: Value = resp.json().await?;
        Ok(parse_chart(&json))
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Pull (timestamp, open, high, low, close) rows out of the chart payload.
///
/// Non-trading days show up as nulls in the quote arrays; those rows are
/// skipped rather than zero-filled.
fn parse_chart(json: &Value) -> Vec<DailyBar> {
    let Some(result) = json["chart"]["result"].as_array().and_then(|r| r.first()) else {
        return Vec::new();
    };
    let Some(timestamps) = result["timestamp"].as_array() else {
        return Vec::new();
    };
    let Some(quote) = result["indicators"]["quote"]
        .as_array()
        .and_then(|q| q.first())
    else {
        return Vec::new();
    };

    let opens = quote["open"].as_array();
    let highs = quote["high"].as_array();
    let lows = quote["low"].as_array();
    let closes = quote["close"].as_array();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(ts) = ts.as_i64() else { continue };
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };

        let (Some(open), Some(high), Some(low), Some(close)) = (
            decimal_at(opens, i),
            decimal_at(highs, i),
            decimal_at(lows, i),
            decimal_at(closes, i),
        ) else {
            continue;
        };

        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
        });
    }

    bars
}

fn decimal_at(values: Option<&Vec<Value>>, i: usize) -> Option<Decimal> {
    values?
        .get(i)
        .and_then(Value::as_f64)
        .and_then(Decimal::from_f64_retain)
}
