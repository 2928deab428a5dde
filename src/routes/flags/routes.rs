use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::flags::catalog::{FLAG_CATALOG, SHOW_ADMIN_PAGE};
use crate::flags::targeting::{demo_rules, evaluate_rule, select_demo_flag_key};
use crate::routes::require_flag;
use crate::state::AppState;
use super::{CatalogEntry, RuleOutcome, SnapshotResponse, TargetingDemoResponse};

/// Raw snapshot view: readiness plus every key the service returned.
/// `ready: false` tells the client to render a loading state, not defaults.
pub async fn snapshot(State(state): State<AppState>) -> impl IntoResponse {
    Json(SnapshotResponse {
        ready: state.flags.is_ready(),
        flags: state.flags.snapshot().values().clone(),
    })
}

/// Every catalog descriptor joined with its effective value and tri-state
pub async fn catalog(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_ADMIN_PAGE)?;

    let entries: Vec<CatalogEntry> = FLAG_CATALOG
        .iter()
        .map(|d| CatalogEntry {
            key: d.key,
            name: d.name,
            description: d.description,
            category: d.category,
            default_value: d.default_value,
            value: state.flags.get(d.key, d.default_value),
            state: state.flags.state(d.key),
        })
        .collect();

    Ok(Json(entries))
}

/// The targeting demo card: which flag the simulator featured for the
/// current user and which illustrative rules matched
pub async fn targeting_demo(State(state): State<AppState>) -> impl IntoResponse {
    let ctx = state.users.get_or_create_current();
    let flag_key = select_demo_flag_key(&ctx);

    let rules: Vec<RuleOutcome> = demo_rules()
        .into_iter()
        .map(|rule| {
            let matched = evaluate_rule(&rule, &ctx);
            RuleOutcome { rule, matched }
        })
        .collect();

    Json(TargetingDemoResponse {
        flag_key,
        state: state.flags.state(flag_key),
        enabled: state.flags.enabled(flag_key),
        rules,
    })
}
