//! Advice Orchestrator
//!
//! Validates the raw request, runs the tolerance pipeline, and only then
//! touches the market. The first failing stage is surfaced unchanged; there
//! are no retries and no partial results.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::market::MarketDataProvider;
use crate::model::{AdviceReport, Gender, Residency, ToleranceResult, UserProfile};
use crate::snapshot::SnapshotAnalyzer;
use crate::tolerance::{ToleranceStore, reason_for};

/// Raw request fields as the front end collects them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdviceRequest {
    /// Display name only, never consulted by the decision logic
    #[serde(default)]
    pub username: String,

    pub salary: i64,
    pub age: i64,
    pub residency: i64,
    pub gender: String,
    pub symbol: String,
}

/// The advice pipeline with its two injected capabilities.
pub struct Advisor {
    store: Arc<dyn ToleranceStore>,
    analyzer: SnapshotAnalyzer,
}

impl Advisor {
    pub fn new(store: Arc<dyn ToleranceStore>, market: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            store,
            analyzer: SnapshotAnalyzer::new(market),
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// Stage order matters: a tolerance lookup failure must short-circuit
    /// before any market call is attempted.
    pub async fn advise(&self, request: &AdviceRequest) -> Result<AdviceReport> {
        let (profile, symbol) = validate(request)?;

        let bracket = profile.bracket();
        let scores = self.store.scores_for(&profile, bracket)?;
        tracing::info!(
            %bracket,
            portfolio = scores.portfolio,
            stock = scores.stock,
            "tolerance resolved"
        );

        let tolerance = ToleranceResult {
            portfolio_tolerance: scores.portfolio,
            stock_tolerance: scores.stock,
            reason: reason_for(scores.portfolio, scores.stock).to_string(),
        };

        let recommendation = self.analyzer.analyze(&symbol, scores.stock).await?;

        Ok(AdviceReport {
            tolerance,
            recommendation,
        })
    }
}

fn validate(request: &AdviceRequest) -> Result<(UserProfile, String)> {
    if request.salary < 0 {
        return Err(invalid("salary", "must be non-negative"));
    }

    let age = u8::try_from(request.age)
        .ok()
        .filter(|age| *age <= 120)
        .ok_or_else(|| invalid("age", "must be a whole number of years between 0 and 120"))?;

    let residency = Residency::from_flag(request.residency)
        .ok_or_else(|| invalid("residency", "must be 0 (non-resident) or 1 (resident)"))?;

    let gender = Gender::from_code(&request.gender)
        .ok_or_else(|| invalid("gender", "must be the code M or F"))?;

    let symbol = request.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(invalid("symbol", "must be a non-empty ticker"));
    }

    let profile = UserProfile {
        salary: Decimal::from(request.salary),
        age,
        gender,
        residency,
    };

    Ok((profile, symbol))
}

fn invalid(field: &'static str, message: &str) -> AdvisorError {
    AdvisorError::Validation {
        field,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketData;
    use crate::model::{DailyBar, Decision, SalaryBracket, ToleranceRecord};
    use crate::tolerance::ToleranceTable;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn table() -> ToleranceTable {
        ToleranceTable::from_records(vec![
            ToleranceRecord {
                age_min: 18,
                age_max: 45,
                gender: Gender::Male,
                residency: Residency::Resident,
                bracket: SalaryBracket::LowerMiddle,
                portfolio_tolerance: 80,
                stock_tolerance: 75,
            },
            ToleranceRecord {
                age_min: 46,
                age_max: 120,
                gender: Gender::Male,
                residency: Residency::Resident,
                bracket: SalaryBracket::LowerMiddle,
                portfolio_tolerance: 45,
                stock_tolerance: 40,
            },
        ])
        .unwrap()
    }

    fn request(symbol: &str) -> AdviceRequest {
        AdviceRequest {
            username: "jo".into(),
            salary: 400_000,
            age: 30,
            residency: 1,
            gender: "m".into(),
            symbol: symbol.into(),
        }
    }

    fn flat_bars(close: Decimal, low: Decimal) -> Vec<DailyBar> {
        vec![DailyBar {
            date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            open: close,
            high: close + dec!(1),
            low,
            close,
        }]
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let market = Arc::new(
            MockMarketData::new().with_fixture("IBM", flat_bars(dec!(100), dec!(95))),
        );
        let advisor = Advisor::new(Arc::new(table()), market);

        let report = advisor.advise(&request("ibm")).await.unwrap();

        assert_eq!(report.tolerance.portfolio_tolerance, 80);
        assert_eq!(report.tolerance.stock_tolerance, 75);
        assert!(report.tolerance.reason.contains("good decision to buy"));

        // threshold 1.75 * 95 = 166.25, close 100 sits below it
        assert_eq!(report.recommendation.threshold, dec!(166.25));
        assert_eq!(report.recommendation.decision, Decision::Buy);
        assert_eq!(report.recommendation.snapshot.symbol, "IBM");
    }

    #[tokio::test]
    async fn test_lookup_failure_skips_market_call() {
        let market = Arc::new(MockMarketData::new());
        let advisor = Advisor::new(Arc::new(table()), market.clone());

        // female profile has no coverage in the fixture table
        let mut req = request("IBM");
        req.gender = "F".into();

        let err = advisor.advise(&req).await.unwrap_err();
        assert_eq!(err.kind(), "lookup_failure");
        assert_eq!(market.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_data_unavailable() {
        let market = Arc::new(MockMarketData::new());
        let advisor = Advisor::new(Arc::new(table()), market.clone());

        let err = advisor.advise(&request("NOTREAL")).await.unwrap_err();
        assert_eq!(err.kind(), "data_unavailable");
        assert_eq!(market.call_count(), 1);
    }

    #[tokio::test]
    async fn test_validation_rejections() {
        let market = Arc::new(MockMarketData::new());
        let advisor = Advisor::new(Arc::new(table()), market.clone());

        let cases: Vec<(&str, AdviceRequest)> = vec![
            ("salary", AdviceRequest { salary: -1, ..request("IBM") }),
            ("age", AdviceRequest { age: 121, ..request("IBM") }),
            ("age", AdviceRequest { age: -3, ..request("IBM") }),
            ("residency", AdviceRequest { residency: 2, ..request("IBM") }),
            ("gender", AdviceRequest { gender: "X".into(), ..request("IBM") }),
            ("symbol", AdviceRequest { symbol: "  ".into(), ..request("IBM") }),
        ];

        for (field, req) in cases {
            let err = advisor.advise(&req).await.unwrap_err();
            assert_eq!(err.kind(), "validation");
            assert!(err.to_string().contains(field), "expected {field} in {err}");
        }

        // none of the rejected requests may reach the market
        assert_eq!(market.call_count(), 0);
    }

    #[tokio::test]
    async fn test_symbol_is_normalized() {
        let market = Arc::new(
            MockMarketData::new().with_fixture("IBM", flat_bars(dec!(100), dec!(95))),
        );
        let advisor = Advisor::new(Arc::new(table()), market);

        let report = advisor.advise(&request("  ibm ")).await.unwrap();
        assert_eq!(report.recommendation.snapshot.symbol, "IBM");
    }

    #[tokio::test]
    async fn test_low_tolerance_profile_reads_low() {
        let market = Arc::new(
            MockMarketData::new().with_fixture("KO", flat_bars(dec!(62), dec!(60))),
        );
        let advisor = Advisor::new(Arc::new(table()), market);

        let mut req = request("KO");
        req.age = 70;

        let report = advisor.advise(&req).await.unwrap();
        assert_eq!(report.tolerance.stock_tolerance, 40);
        assert!(report.tolerance.reason.contains("too low"));
        // the market verdict is still produced; the reason text is advisory
        assert_eq!(report.recommendation.decision, Decision::Buy);
    }
}
