//! Tolerance Table Store
//!
//! The demographic reference table, loaded once and read-only for the rest
//! of the process lifetime. Rows are indexed by (gender, residency, bracket)
//! at load time, so a lookup is one hash probe plus an age-band scan, and a
//! key served by two overlapping age bands is a load error instead of being
//! silently resolved by row order.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AdvisorError, Result};
use crate::model::{Gender, Residency, SalaryBracket, ToleranceRecord, UserProfile};

/// Portfolio- and stock-level tolerance scores for one profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToleranceScores {
    pub portfolio: u8,
    pub stock: u8,
}

/// Lookup capability over the reference table.
///
/// Implementations must be shareable across concurrent requests; the table
/// never changes after load, so no locking is involved.
pub trait ToleranceStore: Send + Sync {
    /// Scores for the profile's demographic key, or `NoToleranceMatch` when
    /// the table covers no such combination.
    fn scores_for(&self, profile: &UserProfile, bracket: SalaryBracket) -> Result<ToleranceScores>;
}

type TableKey = (Gender, Residency, SalaryBracket);

#[derive(Debug, Clone, Copy)]
struct AgeBand {
    min: u8,
    max: u8,
    scores: ToleranceScores,
}

/// In-memory reference table indexed by (gender, residency, bracket).
#[derive(Debug, Default)]
pub struct ToleranceTable {
    index: HashMap<TableKey, Vec<AgeBand>>,
    rows: usize,
}

/// CSV row shape: `Age_Min,Age_Max,Gender,Residency,Sal_Cat,Tol_P,Tol_S`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Age_Min")]
    age_min: u8,
    #[serde(rename = "Age_Max")]
    age_max: u8,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Residency")]
    residency: i64,
    #[serde(rename = "Sal_Cat")]
    sal_cat: String,
    #[serde(rename = "Tol_P")]
    tol_p: u8,
    #[serde(rename = "Tol_S")]
    tol_s: u8,
}

impl ToleranceTable {
    /// Build the index, rejecting rows that would make lookups ambiguous.
    pub fn from_records(records: Vec<ToleranceRecord>) -> Result<Self> {
        let rows = records.len();
        let mut index: HashMap<TableKey, Vec<AgeBand>> = HashMap::new();

        for record in records {
            validate_record(&record)?;

            let bands = index
                .entry((record.gender, record.residency, record.bracket))
                .or_default();

            for existing in bands.iter() {
                if record.age_min <= existing.max && existing.min <= record.age_max {
                    return Err(AdvisorError::Table(format!(
                        "overlapping age bands {}-{} and {}-{} for gender {}, residency {}, bracket {}",
                        existing.min,
                        existing.max,
                        record.age_min,
                        record.age_max,
                        record.gender,
                        record.residency,
                        record.bracket,
                    )));
                }
            }

            bands.push(AgeBand {
                min: record.age_min,
                max: record.age_max,
                scores: ToleranceScores {
                    portfolio: record.portfolio_tolerance,
                    stock: record.stock_tolerance,
                },
            });
        }

        Ok(Self { index, rows })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // data lines start after the header, 1-based
            let line = i + 2;
            records.push(parse_row(row?, line)?);
        }

        Self::from_records(records)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AdvisorError::Table(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::from_csv_reader(file)
    }

    /// Number of rows loaded.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl ToleranceStore for ToleranceTable {
    fn scores_for(&self, profile: &UserProfile, bracket: SalaryBracket) -> Result<ToleranceScores> {
        self.index
            .get(&(profile.gender, profile.residency, bracket))
            .and_then(|bands| {
                bands
                    .iter()
                    .find(|band| band.min <= profile.age && profile.age <= band.max)
            })
            .map(|band| band.scores)
            .ok_or(AdvisorError::NoToleranceMatch {
                age: profile.age,
                gender: profile.gender,
                residency: profile.residency,
                bracket,
            })
    }
}

fn validate_record(record: &ToleranceRecord) -> Result<()> {
    if record.age_min > record.age_max {
        return Err(AdvisorError::Table(format!(
            "inverted age band {}-{}",
            record.age_min, record.age_max
        )));
    }
    if record.portfolio_tolerance > 100 || record.stock_tolerance > 100 {
        return Err(AdvisorError::Table(format!(
            "tolerance scores {}/{} out of range 0-100",
            record.portfolio_tolerance, record.stock_tolerance
        )));
    }
    Ok(())
}

fn parse_row(row: CsvRow, line: usize) -> Result<ToleranceRecord> {
    let gender = Gender::from_code(&row.gender).ok_or_else(|| {
        AdvisorError::Table(format!("line {line}: unknown gender code {:?}", row.gender))
    })?;
    let residency = Residency::from_flag(row.residency).ok_or_else(|| {
        AdvisorError::Table(format!(
            "line {line}: residency must be 0 or 1, got {}",
            row.residency
        ))
    })?;
    let bracket = SalaryBracket::from_code(&row.sal_cat).ok_or_else(|| {
        AdvisorError::Table(format!(
            "line {line}: unknown salary bracket {:?}",
            row.sal_cat
        ))
    })?;

    Ok(ToleranceRecord {
        age_min: row.age_min,
        age_max: row.age_max,
        gender,
        residency,
        bracket,
        portfolio_tolerance: row.tol_p,
        stock_tolerance: row.tol_s,
    })
}
