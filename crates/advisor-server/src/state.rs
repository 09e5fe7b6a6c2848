//! Application State

use std::sync::Arc;

use equity_advisor::Advisor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The advice pipeline with its injected capabilities
    pub advisor: Arc<Advisor>,

    /// Name of the active market data provider, reported by /health
    pub provider_name: String,

    /// Rows loaded into the tolerance table, reported by /health
    pub table_rows: usize,
}
