use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::demo::prep::{NewPrepDoc, PrepDocUpdate};
use crate::flags::catalog::SHOW_PREP_PAGE;
use crate::routes::jobs::validate_company;
use crate::routes::{require_flag, track_page_view};
use crate::state::AppState;
use super::{CreatePrepRequest, PrepQuery, UpdatePrepRequest};

/// List prep docs, optionally narrowed to one company
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PrepQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_PREP_PAGE)?;

    track_page_view(&state, "prep");

    Ok(Json(state.demo.prep.list(query.company.as_deref())))
}

/// Start a prep doc for a company
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreatePrepRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_PREP_PAGE)?;

    validate_company(&payload.company).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let doc = state.demo.prep.create(NewPrepDoc {
        company: payload.company,
        summary: payload.summary,
        talking_points: payload.talking_points,
        questions: payload.questions,
    });

    Ok((StatusCode::CREATED, Json(doc)))
}

/// Patch a prep doc; absent fields keep their value
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePrepRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_PREP_PAGE)?;

    if let Some(company) = payload.company.as_deref() {
        validate_company(company).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }

    let doc = state
        .demo
        .prep
        .update(
            id,
            PrepDocUpdate {
                company: payload.company,
                summary: payload.summary,
                talking_points: payload.talking_points,
                questions: payload.questions,
            },
        )
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Prep doc not found".to_string()))?;

    Ok(Json(doc))
}

/// Remove a prep doc
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_PREP_PAGE)?;

    if !state.demo.prep.delete(id) {
        return Err((StatusCode::NOT_FOUND, "Prep doc not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
