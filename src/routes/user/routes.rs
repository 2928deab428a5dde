use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::flags::context::{roster_member, Geolocation};
use crate::state::AppState;
use super::{SwitchRequest, SyncRequest, SyncResponse, UpgradeRequest, UserStateResponse};

/// Current demo user, dealt from the roster on first read
pub async fn current(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.users.get_or_create_current())
}

/// Swap the whole context for another roster archetype and re-identify
pub async fn switch(
    State(state): State<AppState>,
    Json(payload): Json<SwitchRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let ctx = roster_member(&payload.key).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Unknown demo user '{}'", payload.key),
        )
    })?;

    state.users.set_current(ctx.clone());
    let flags_ready = state.flags.identify(&ctx).await;

    Ok(Json(UserStateResponse {
        user: ctx,
        flags_ready,
    }))
}

/// Change the subscription tier wholesale, keeping everything else
pub async fn upgrade(
    State(state): State<AppState>,
    Json(payload): Json<UpgradeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut ctx = state.users.get_or_create_current();
    ctx.subscription_tier = payload.tier;

    state.users.set_current(ctx.clone());
    let flags_ready = state.flags.identify(&ctx).await;

    Ok(Json(UserStateResponse {
        user: ctx,
        flags_ready,
    }))
}

/// Wipe the stored context and the snapshot, then deal a fresh archetype
pub async fn reset(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.users.clear_current();
    state.flags.reset();

    let ctx = state.users.get_or_create_current();
    let flags_ready = state.flags.identify(&ctx).await;

    Ok(Json(UserStateResponse {
        user: ctx,
        flags_ready,
    }))
}

/// The one sanctioned partial mutation: attach a reported position
pub async fn geolocation(
    State(state): State<AppState>,
    Json(geo): Json<Geolocation>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let ctx = state
        .users
        .enrich_geolocation(geo)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No current user".to_string()))?;

    let flags_ready = state.flags.identify(&ctx).await;

    Ok(Json(UserStateResponse {
        user: ctx,
        flags_ready,
    }))
}

/// Mirror a change made by another view of the same stored context. The
/// store is not re-written; only in-memory state and observers move.
pub async fn sync(
    State(state): State<AppState>,
    Json(payload): Json<SyncRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.users.apply_external_change(payload.context.clone());

    let (user, flags_ready) = match payload.context {
        Some(ctx) => {
            let ready = state.flags.identify(&ctx).await;
            (Some(ctx), ready)
        }
        None => {
            // identity is gone, so the snapshot for it goes too
            state.flags.reset();
            (None, false)
        }
    };

    Ok(Json(SyncResponse { user, flags_ready }))
}
