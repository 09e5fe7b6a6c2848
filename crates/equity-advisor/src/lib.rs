//! # equity-advisor
//!
//! Risk-tolerance driven trade advisor: given an investor's demographic
//! profile and a ticker symbol, derive how much price risk that investor can
//! bear, then compare recent market behavior against a tolerance-adjusted
//! threshold to produce a BUY / DON'T BUY call with a written rationale.
//!
//! ## Pipeline
//!
//! ```text
//! profile ──► SalaryBracket ──► ToleranceStore ──► (portfolio, stock) scores
//!                                                        │
//!                                          reason text ◄─┘
//!
//! symbol + stock score ──► MarketDataProvider ──► SnapshotAnalyzer ──► BUY / DON'T BUY
//! ```
//!
//! Both external data sources are injected capabilities:
//! [`ToleranceStore`] for the demographic reference table and
//! [`market::MarketDataProvider`] for trailing daily OHLC history. Tests
//! substitute deterministic fakes for both, so no stage of the pipeline
//! hides state or talks to the network on its own.
//!
//! Failures are explicit values, never guesses: a request that cannot be
//! validated, matched against the table, or priced comes back as a typed
//! [`AdvisorError`] instead of a fabricated recommendation.

pub mod advisor;
pub mod error;
pub mod market;
pub mod model;
pub mod snapshot;
pub mod tolerance;

pub use advisor::{AdviceRequest, Advisor};
pub use error::{AdvisorError, Result};
pub use model::{
    AdviceReport, DailyBar, Decision, Gender, MarketSnapshot, Recommendation, Residency,
    SalaryBracket, ToleranceRecord, ToleranceResult, UserProfile,
};
pub use snapshot::SnapshotAnalyzer;
pub use tolerance::{ToleranceScores, ToleranceStore, ToleranceTable};
