//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use equity_advisor::{AdviceRequest, AdvisorError, Decision};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub market_provider: String,
    pub tolerance_rows: usize,
}

/// Wire shape of a successful advice call, flattened the way the original
/// result page consumed it.
#[derive(Serialize)]
pub struct AdviceResponse {
    pub request_id: String,
    pub last_refreshed: NaiveDate,
    pub latest_close: Decimal,
    pub recent_high: Decimal,
    pub recent_low: Decimal,
    pub threshold: Decimal,
    pub decision: Decision,
    pub portfolio_tolerance: u8,
    pub stock_tolerance: u8,
    pub reason: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        market_provider: state.provider_name.clone(),
        tolerance_rows: state.table_rows,
    })
}

/// Advice endpoint: profile plus symbol in, decision plus rationale out
pub async fn advice_handler(
    State(state): State<AppState>,
    Json(payload): Json<AdviceRequest>,
) -> Result<Json<AdviceResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(%request_id, symbol = %payload.symbol, "advice request");

    let report = state.advisor.advise(&payload).await.map_err(|e| {
        tracing::warn!(%request_id, kind = e.kind(), error = %e, "advice request failed");
        (
            status_for(&e),
            Json(ErrorResponse {
                kind: e.kind(),
                message: e.to_string(),
            }),
        )
    })?;

    tracing::info!(
        %request_id,
        decision = %report.recommendation.decision,
        "advice request served"
    );

    let snapshot = &report.recommendation.snapshot;
    Ok(Json(AdviceResponse {
        request_id,
        last_refreshed: snapshot.as_of,
        latest_close: snapshot.latest_close,
        recent_high: snapshot.recent_high,
        recent_low: snapshot.recent_low,
        threshold: report.recommendation.threshold,
        decision: report.recommendation.decision,
        portfolio_tolerance: report.tolerance.portfolio_tolerance,
        stock_tolerance: report.tolerance.stock_tolerance,
        reason: report.tolerance.reason,
    }))
}

fn status_for(error: &AdvisorError) -> StatusCode {
    match error.kind() {
        "validation" => StatusCode::BAD_REQUEST,
        "lookup_failure" => StatusCode::NOT_FOUND,
        "data_unavailable" | "network" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
