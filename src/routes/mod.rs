use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Router,
};

mod ai_config;
mod analytics;
mod events;
mod flags;
mod health;
mod jobs;
mod prep;
mod stories;
mod targeting_rules;
mod user;

pub use health::health;

use crate::flags::FlagClient;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let user_router = Router::new()
        .route("/", get(user::routes::current))
        .route("/switch", post(user::routes::switch))
        .route("/upgrade", post(user::routes::upgrade))
        .route("/reset", post(user::routes::reset))
        .route("/geolocation", post(user::routes::geolocation))
        .route("/sync", post(user::routes::sync));

    let flags_router = Router::new()
        .route("/", get(flags::routes::snapshot))
        .route("/catalog", get(flags::routes::catalog))
        .route("/targeting-demo", get(flags::routes::targeting_demo));

    let jobs_router = Router::new()
        .route("/", post(jobs::routes::create).get(jobs::routes::list))
        .route(
            "/{id}",
            put(jobs::routes::update).delete(jobs::routes::delete),
        )
        .route("/import", post(jobs::routes::import));

    let stories_router = Router::new()
        .route(
            "/",
            post(stories::routes::create).get(stories::routes::list),
        )
        .route(
            "/{id}",
            put(stories::routes::update).delete(stories::routes::delete),
        );

    let prep_router = Router::new()
        .route("/", post(prep::routes::create).get(prep::routes::list))
        .route(
            "/{id}",
            put(prep::routes::update).delete(prep::routes::delete),
        );

    let analytics_router = Router::new()
        .route("/weekly", get(analytics::routes::weekly))
        .route("/pipeline", get(analytics::routes::pipeline));

    let events_router = Router::new()
        .route("/", post(events::record))
        .route("/flush", post(events::flush));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/user", user_router)
                .nest("/flags", flags_router)
                .nest("/jobs", jobs_router)
                .nest("/stories", stories_router)
                .nest("/prep", prep_router)
                .nest("/analytics", analytics_router)
                .nest("/events", events_router)
                .route("/ai-config/evaluate", post(ai_config::evaluate))
                .route("/targeting-rules", get(targeting_rules::list)),
        )
}

async fn root() -> &'static str {
    "Welcome to the Career Stack API"
}

// A denied page flag answers like a route that does not exist
pub fn require_flag(flags: &FlagClient, key: &str) -> Result<(), (StatusCode, String)> {
    if flags.enabled(key) {
        Ok(())
    } else {
        Err((StatusCode::NOT_FOUND, "Not found".to_string()))
    }
}

// Page surfaces record a view against whoever is current right now
pub fn track_page_view(state: &AppState, page: &str) {
    let key = state
        .users
        .current()
        .map(|ctx| ctx.key)
        .unwrap_or_else(|| "anonymous".to_string());
    state.flags.track_page_view(&key, page);
}
