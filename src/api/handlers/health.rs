//! Health check handler.

use crate::{
    api::{AppState, dto::HealthResponse},
    core::event,
    errors::Result,
};
use axum::{Json, extract::State};

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let events = event::event_count(&state.db).await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        events,
    }))
}
