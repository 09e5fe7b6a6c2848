//! Error Types for the Advisor

use thiserror::Error;

use crate::model::{Gender, Residency, SalaryBracket};

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error(
        "no tolerance record for age {age}, gender {gender}, residency {residency}, bracket {bracket}"
    )]
    NoToleranceMatch {
        age: u8,
        gender: Gender,
        residency: Residency,
        bracket: SalaryBracket,
    },

    #[error("market data unavailable for {0}")]
    DataUnavailable(String),

    #[error("malformed tolerance table: {0}")]
    Table(String),

    #[error("tolerance table read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AdvisorError {
    /// Stable machine-readable error kind, used by HTTP callers to pick a
    /// status code without matching on variants.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NoToleranceMatch { .. } => "lookup_failure",
            Self::DataUnavailable(_) => "data_unavailable",
            Self::Table(_) | Self::Csv(_) => "table",
            Self::Network(_) => "network",
        }
    }
}
