//! Tolerance Advisor HTTP Server
//!
//! Axum-based server exposing the advice pipeline as a JSON API. Chart
//! rendering and any conversational front end live elsewhere; this binary
//! returns structured results only.

mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equity_advisor::market::{MarketDataProvider, MockMarketData, YahooMarketData};
use equity_advisor::{Advisor, ToleranceTable};

use crate::handlers::{advice_handler, health_check};
use crate::state::AppState;

const DEFAULT_TABLE_PATH: &str = "data/tolerance_table.csv";
const DEFAULT_MARKET_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // The reference table is loaded once and immutable afterwards, so every
    // request reads it without coordination
    let table_path =
        std::env::var("TOLERANCE_TABLE_PATH").unwrap_or_else(|_| DEFAULT_TABLE_PATH.into());
    let table = Arc::new(ToleranceTable::from_csv_path(&table_path)?);
    tracing::info!(rows = table.len(), path = %table_path, "✓ tolerance table loaded");

    let provider = build_provider()?;
    tracing::info!(provider = provider.name(), "✓ market data provider ready");

    let state = AppState {
        advisor: Arc::new(Advisor::new(table.clone(), provider.clone())),
        provider_name: provider.name().to_string(),
        table_rows: table.len(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/advice", post(advice_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("advisor server running on http://{}", addr);
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  POST /api/advice  - Tolerance-adjusted trade advice");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_provider() -> anyhow::Result<Arc<dyn MarketDataProvider>> {
    match std::env::var("MARKET_PROVIDER").as_deref() {
        Ok("mock") => {
            tracing::warn!("⚠ MARKET_PROVIDER=mock - serving fixture market data");
            Ok(Arc::new(MockMarketData::new()))
        }
        _ => {
            let timeout_secs = std::env::var("MARKET_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_MARKET_TIMEOUT_SECS);
            let yahoo = YahooMarketData::with_timeout(Duration::from_secs(timeout_secs))?;
            Ok(Arc::new(yahoo))
        }
    }
}
