//! Domain Models
//!
//! Core data types for the tolerance and recommendation pipeline.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Categorical gender code, one of the reference-table keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Parse a single-letter code, case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Residency flag: `1` for resident, `0` for non-resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Residency {
    NonResident,
    Resident,
}

impl Residency {
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Self::NonResident),
            1 => Some(Self::Resident),
            _ => None,
        }
    }

    pub fn flag(&self) -> u8 {
        match self {
            Self::NonResident => 0,
            Self::Resident => 1,
        }
    }
}

impl fmt::Display for Residency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// Discretized income category used as a reference-table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryBracket {
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "LM")]
    LowerMiddle,
    #[serde(rename = "UM")]
    UpperMiddle,
    #[serde(rename = "H")]
    High,
}

impl SalaryBracket {
    /// Classify a salary into its bracket.
    ///
    /// Total for any non-negative salary; the upper bound of each bracket is
    /// inclusive. Negative salaries are rejected by request validation
    /// before classification is ever reached.
    pub fn for_salary(salary: Decimal) -> Self {
        if salary <= dec!(250_000) {
            Self::Low
        } else if salary <= dec!(1_000_000) {
            Self::LowerMiddle
        } else if salary <= dec!(3_000_000) {
            Self::UpperMiddle
        } else {
            Self::High
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "L" => Some(Self::Low),
            "LM" => Some(Self::LowerMiddle),
            "UM" => Some(Self::UpperMiddle),
            "H" => Some(Self::High),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::LowerMiddle => "LM",
            Self::UpperMiddle => "UM",
            Self::High => "H",
        }
    }
}

impl fmt::Display for SalaryBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An investor profile, immutable for the lifetime of a request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// Gross yearly salary in currency units, non-negative
    pub salary: Decimal,

    /// Age in whole years, 0 to 120
    pub age: u8,

    pub gender: Gender,

    pub residency: Residency,
}

impl UserProfile {
    pub fn bracket(&self) -> SalaryBracket {
        SalaryBracket::for_salary(self.salary)
    }
}

/// One row of the demographic reference table.
///
/// The age band is inclusive on both ends. Tolerance scores are percentages
/// in 0 to 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToleranceRecord {
    pub age_min: u8,
    pub age_max: u8,
    pub gender: Gender,
    pub residency: Residency,
    pub bracket: SalaryBracket,
    pub portfolio_tolerance: u8,
    pub stock_tolerance: u8,
}

/// Tolerance scores plus the written rationale, derived per request and
/// never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToleranceResult {
    pub portfolio_tolerance: u8,
    pub stock_tolerance: u8,
    pub reason: String,
}

/// A single daily OHLC record from the market data provider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// Summary statistics over the trailing one-month daily window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,

    /// Date of the most recent bar in the window
    pub as_of: NaiveDate,

    pub latest_close: Decimal,

    pub recent_high: Decimal,

    pub recent_low: Decimal,
}

impl MarketSnapshot {
    /// Reduce an ascending-by-date series to its snapshot.
    ///
    /// Returns `None` for an empty series; callers map that to
    /// `DataUnavailable` rather than emitting a partial snapshot.
    pub fn from_bars(symbol: impl Into<String>, bars: &[DailyBar]) -> Option<Self> {
        let last = bars.last()?;
        let recent_high = bars.iter().map(|b| b.high).max()?;
        let recent_low = bars.iter().map(|b| b.low).min()?;

        Some(Self {
            symbol: symbol.into(),
            as_of: last.date,
            latest_close: last.close,
            recent_high,
            recent_low,
        })
    }
}

/// The binary trade call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "DONT_BUY")]
    DontBuy,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::DontBuy => f.write_str("DONT_BUY"),
        }
    }
}

/// A tolerance-adjusted trade recommendation for one symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendation {
    pub decision: Decision,

    /// Tolerance-adjusted price level the latest close was compared against
    pub threshold: Decimal,

    pub snapshot: MarketSnapshot,
}

/// Combined result of one advice request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdviceReport {
    pub tolerance: ToleranceResult,
    pub recommendation: Recommendation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_boundaries() {
        assert_eq!(SalaryBracket::for_salary(dec!(0)), SalaryBracket::Low);
        assert_eq!(SalaryBracket::for_salary(dec!(250_000)), SalaryBracket::Low);
        assert_eq!(
            SalaryBracket::for_salary(dec!(250_001)),
            SalaryBracket::LowerMiddle
        );
        assert_eq!(
            SalaryBracket::for_salary(dec!(1_000_000)),
            SalaryBracket::LowerMiddle
        );
        assert_eq!(
            SalaryBracket::for_salary(dec!(1_000_001)),
            SalaryBracket::UpperMiddle
        );
        assert_eq!(
            SalaryBracket::for_salary(dec!(3_000_000)),
            SalaryBracket::UpperMiddle
        );
        assert_eq!(
            SalaryBracket::for_salary(dec!(3_000_001)),
            SalaryBracket::High
        );
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::from_code("m"), Some(Gender::Male));
        assert_eq!(Gender::from_code(" F "), Some(Gender::Female));
        assert_eq!(Gender::from_code("X"), None);
    }

    #[test]
    fn test_residency_flags() {
        assert_eq!(Residency::from_flag(0), Some(Residency::NonResident));
        assert_eq!(Residency::from_flag(1), Some(Residency::Resident));
        assert_eq!(Residency::from_flag(2), None);
        assert_eq!(Residency::from_flag(-1), None);
    }

    #[test]
    fn test_snapshot_from_bars() {
        let bars = vec![
            DailyBar {
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                open: dec!(101),
                high: dec!(108),
                low: dec!(99),
                close: dec!(104),
            },
            DailyBar {
                date: NaiveDate::from_ymd_opt(2026, 7, 2).unwrap(),
                open: dec!(104),
                high: dec!(105),
                low: dec!(95),
                close: dec!(97),
            },
        ];

        let snapshot = MarketSnapshot::from_bars("IBM", &bars).unwrap();
        assert_eq!(snapshot.as_of, NaiveDate::from_ymd_opt(2026, 7, 2).unwrap());
        assert_eq!(snapshot.latest_close, dec!(97));
        assert_eq!(snapshot.recent_high, dec!(108));
        assert_eq!(snapshot.recent_low, dec!(95));
    }

    #[test]
    fn test_snapshot_empty_series() {
        assert!(MarketSnapshot::from_bars("IBM", &[]).is_none());
    }
}
