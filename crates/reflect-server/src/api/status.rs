//! Status Routes
//!
//! Routes:
//! - GET /health - Basic health check with the current entry count

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppState, Result};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub entries_file: String,
    pub entries: usize,
}

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let entries = state.with_store_blocking(|store| store.load().len()).await?;

    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        entries_file: state.store.path().display().to_string(),
        entries,
    }))
}
