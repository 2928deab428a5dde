use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::flags::catalog::SHOW_ADMIN_PAGE;
use crate::flags::context::UserContext;
use crate::routes::require_flag;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfigRequest {
    pub config_key: Option<String>,
    pub user_context: Option<UserContext>,
}

fn error_body(message: &str) -> Json<Value> {
    Json(json!({ "error": message }))
}

/// Read-through to the provider's AI config evaluation endpoint. We attach
/// credentials and a context; the variation payload passes through as-is.
pub async fn evaluate(
    State(state): State<AppState>,
    Json(payload): Json<AiConfigRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    require_flag(&state.flags, SHOW_ADMIN_PAGE)
        .map_err(|(status, message)| (status, error_body(&message)))?;

    let config_key = payload
        .config_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, error_body("configKey is required")))?;

    let (Some(service_url), Some(sdk_key)) = (
        state.config.flag_service_url.as_deref(),
        state.config.flag_sdk_key.as_deref(),
    ) else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("Flag service is not configured"),
        ));
    };

    let context = match payload.user_context {
        Some(ctx) => ctx,
        None => state.users.get_or_create_current(),
    };

    let body = json!({
        "configKey": config_key,
        "environment": state.config.flag_environment,
        "context": context,
    });

    let response = state
        .http
        .post(format!("{}/sdk/ai-config/evaluate", service_url))
        .header("x-sdk-key", sdk_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            eprintln!("AI config evaluation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("AI config service unreachable"),
            )
        })?;

    if !response.status().is_success() {
        eprintln!("AI config evaluation returned {}", response.status());
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("AI config evaluation failed"),
        ));
    }

    let value: Value = response.json().await.map_err(|e| {
        eprintln!("AI config response was not JSON: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("AI config returned malformed data"),
        )
    })?;

    Ok(Json(value))
}
