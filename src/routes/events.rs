use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct TrackEventRequest {
    pub name: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

#[derive(Serialize)]
pub struct TrackEventResponse {
    pub pending: usize,
}

#[derive(Serialize)]
pub struct FlushResponse {
    pub flushed: usize,
}

/// Record a custom analytics event in the in-process buffer
pub async fn record(
    State(state): State<AppState>,
    Json(payload): Json<TrackEventRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Event name cannot be empty".to_string()));
    }

    let key = state
        .users
        .current()
        .map(|ctx| ctx.key)
        .unwrap_or_else(|| "anonymous".to_string());
    state.flags.track_custom(&key, &payload.name, payload.properties);

    Ok(Json(TrackEventResponse {
        pending: state.flags.pending_events(),
    }))
}

/// Drain the buffer towards the flag service. The buffer empties either
/// way; delivery failures only cost the batch.
pub async fn flush(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let flushed = state.flags.flush_events().await;

    Ok(Json(FlushResponse { flushed }))
}
