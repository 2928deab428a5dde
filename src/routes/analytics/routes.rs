use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::demo::analytics::{pipeline_funnel, weekly_activity};
use crate::flags::catalog::SHOW_ANALYTICS_PAGE;
use crate::routes::{require_flag, track_page_view};
use crate::state::AppState;
use super::{clamp_weeks, WeeklyQuery};

/// Applications per week, Monday-anchored buckets ending this week
pub async fn weekly(
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_ANALYTICS_PAGE)?;

    track_page_view(&state, "analytics");

    let jobs = state.demo.jobs.all();
    let weeks = clamp_weeks(query.weeks);

    Ok(Json(weekly_activity(&jobs, weeks, Utc::now().date_naive())))
}

/// Stage funnel over the whole pipeline
pub async fn pipeline(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_ANALYTICS_PAGE)?;

    Ok(Json(pipeline_funnel(&state.demo.jobs.all())))
}
