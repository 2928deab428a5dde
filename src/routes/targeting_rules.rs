use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingRulesQuery {
    pub config_key: Option<String>,
    pub project_key: Option<String>,
}

fn error_body(message: &str) -> Json<Value> {
    Json(json!({ "error": message }))
}

/// Read-through to the management API so the demo card can show the real
/// rules next to the local simulation
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TargetingRulesQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let config_key = query
        .config_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, error_body("configKey is required")))?;

    let project_key = query
        .project_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| state.config.flag_project_key.clone())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, error_body("projectKey is required")))?;

    let (Some(management_url), Some(token)) = (
        state.config.flag_management_url.as_deref(),
        state.config.flag_management_token.as_deref(),
    ) else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("Management API is not configured"),
        ));
    };

    let url = format!(
        "{}/api/v1/configs/{}/{}/rules",
        management_url, project_key, config_key
    );

    let response = state
        .http
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| {
            eprintln!("Targeting rules fetch failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Management API unreachable"),
            )
        })?;

    if !response.status().is_success() {
        eprintln!("Targeting rules fetch returned {}", response.status());
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("Targeting rules fetch failed"),
        ));
    }

    let value: Value = response.json().await.map_err(|e| {
        eprintln!("Targeting rules response was not JSON: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("Management API returned malformed data"),
        )
    })?;

    Ok(Json(value))
}
