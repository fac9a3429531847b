//! HTTP surface for Smart Hat telemetry snapshots.
//!
//! Serves the assembled snapshot as JSON so any rendering layer (dashboard,
//! notebook, curl) can consume it without linking the core. Every request
//! runs a fresh refresh cycle; the server holds no snapshot state between
//! requests, matching the aggregator's one-cycle-one-snapshot model.

use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::get};
use serde::Serialize;

use smarthat_core::{Aggregator, Connectivity, SourceKind};

/// Shared server state. The aggregator is read-only per cycle, so no lock is
/// needed around it.
struct AppState {
    aggregator: Aggregator,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    connectivity: Connectivity,
    records: usize,
    skipped_events: usize,
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Smart Hat Telemetry Server",
        "version": smarthat_core::VERSION,
        "sources": SourceKind::ALL.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
        "endpoints": {
            "/": "This API index",
            "/snapshot": "Assemble and return a full telemetry snapshot",
            "/health": "Connectivity and per-cycle record counts",
        },
    }))
}

async fn handle_snapshot(State(state): State<Arc<AppState>>) -> Json<smarthat_core::Snapshot> {
    Json(state.aggregator.assemble())
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.aggregator.assemble();
    let counts = snapshot.counts();
    Json(HealthResponse {
        status: match snapshot.connectivity {
            Connectivity::Connected => "ok".to_string(),
            Connectivity::Disconnected => "disconnected".to_string(),
        },
        connectivity: snapshot.connectivity,
        records: counts.total(),
        skipped_events: snapshot.skipped_events,
    })
}

/// Build the axum router.
fn build_router(aggregator: Aggregator) -> Router {
    let state = Arc::new(AppState { aggregator });

    Router::new()
        .route("/", get(handle_index))
        .route("/snapshot", get(handle_snapshot))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Run the HTTP snapshot server.
pub async fn run_server(aggregator: Aggregator, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(aggregator);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("serving telemetry snapshots on http://{addr}");
    axum::serve(listener, app).await
}
