use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    status: u16,
    flags_ready: bool,
    flag_service_configured: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthData> {
    let health_data = HealthData {
        status: StatusCode::OK.as_u16(),
        flags_ready: state.flags.is_ready(),
        flag_service_configured: state.flags.service_configured(),
    };
    Json(health_data)
}
