use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::demo::jobs::{parse_jobs_csv, parse_stage, JobStage, JobUpdate, NewJob};
use crate::flags::catalog::{ENABLE_CSV_IMPORT, SHOW_JOBS_PAGE};
use crate::routes::{require_flag, track_page_view};
use crate::state::AppState;
use super::{
    validate_company, validate_role_title, CreateJobRequest, ImportResponse, JobsQuery,
    UpdateJobRequest,
};

/// List the pipeline, filtered by free text and stage
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_JOBS_PAGE)?;

    let stage = match query.stage.as_deref() {
        Some(raw) => Some(parse_stage(raw).ok_or_else(|| {
            let known = JobStage::ALL.map(|s| s.as_str()).join(", ");
            (
                StatusCode::BAD_REQUEST,
                format!("Unknown stage '{}', expected one of: {}", raw, known),
            )
        })?),
        None => None,
    };

    track_page_view(&state, "jobs");

    Ok(Json(state.demo.jobs.list(query.q.as_deref(), stage)))
}

/// Add an application to the pipeline
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_JOBS_PAGE)?;

    validate_company(&payload.company).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    validate_role_title(&payload.role_title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let job = state.demo.jobs.create(NewJob {
        company: payload.company,
        role_title: payload.role_title,
        stage: payload.stage.unwrap_or(JobStage::Wishlist),
        applied_on: payload.applied_on.unwrap_or_else(|| Utc::now().date_naive()),
        location: payload.location,
        salary_range: payload.salary_range,
        url: payload.url,
        notes: payload.notes,
    });

    Ok((StatusCode::CREATED, Json(job)))
}

/// Patch an application; absent fields keep their value
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_JOBS_PAGE)?;

    if let Some(company) = payload.company.as_deref() {
        validate_company(company).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }
    if let Some(role_title) = payload.role_title.as_deref() {
        validate_role_title(role_title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }

    let job = state
        .demo
        .jobs
        .update(
            id,
            JobUpdate {
                company: payload.company,
                role_title: payload.role_title,
                stage: payload.stage,
                applied_on: payload.applied_on,
                location: payload.location,
                salary_range: payload.salary_range,
                url: payload.url,
                notes: payload.notes,
            },
        )
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Job not found".to_string()))?;

    Ok(Json(job))
}

/// Remove an application from the pipeline
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_JOBS_PAGE)?;

    if !state.demo.jobs.delete(id) {
        return Err((StatusCode::NOT_FOUND, "Job not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import from a CSV export. Bad rows are reported alongside the
/// count of rows that made it in.
pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_JOBS_PAGE)?;
    require_flag(&state.flags, ENABLE_CSV_IMPORT)?;

    let import = parse_jobs_csv(&body);
    if import.rows.is_empty() && !import.errors.is_empty() {
        return Err((StatusCode::BAD_REQUEST, import.errors.join("; ")));
    }

    let imported = state.demo.jobs.append_imported(import.rows);

    Ok(Json(ImportResponse {
        imported,
        errors: import.errors,
    }))
}
