use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::demo::stories::{NewStory, StoryUpdate};
use crate::flags::catalog::SHOW_STORIES_PAGE;
use crate::routes::{require_flag, track_page_view};
use crate::state::AppState;
use super::{validate_title, CreateStoryRequest, StoriesQuery, UpdateStoryRequest};

/// List the story bank; `q` searches titles, `tag` matches exactly
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_STORIES_PAGE)?;

    track_page_view(&state, "stories");

    Ok(Json(
        state
            .demo
            .stories
            .list(query.q.as_deref(), query.tag.as_deref()),
    ))
}

/// Add a story to the bank
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_STORIES_PAGE)?;

    validate_title(&payload.title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let story = state.demo.stories.create(NewStory {
        title: payload.title,
        situation: payload.situation,
        task: payload.task,
        action: payload.action,
        result: payload.result,
        tags: payload.tags,
    });

    Ok((StatusCode::CREATED, Json(story)))
}

/// Patch a story; absent fields keep their value, tags replace wholesale
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStoryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_STORIES_PAGE)?;

    if let Some(title) = payload.title.as_deref() {
        validate_title(title).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    }

    let story = state
        .demo
        .stories
        .update(
            id,
            StoryUpdate {
                title: payload.title,
                situation: payload.situation,
                task: payload.task,
                action: payload.action,
                result: payload.result,
                tags: payload.tags,
            },
        )
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Story not found".to_string()))?;

    Ok(Json(story))
}

/// Remove a story from the bank
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_flag(&state.flags, SHOW_STORIES_PAGE)?;

    if !state.demo.stories.delete(id) {
        return Err((StatusCode::NOT_FOUND, "Story not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
