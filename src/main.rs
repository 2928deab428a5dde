mod config;
mod demo;
mod flags;
mod routes;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;

use flags::service::ServiceClient;
use flags::store::{
    ContextChange, ContextStorage, FileContextStorage, UnavailableContextStorage, UserContextStore,
};
use flags::FlagClient;

#[tokio::main]
async fn main() {
    let config = Arc::new(config::Config::from_env());

    let data_dir = PathBuf::from(&config.data_dir);
    let storage: Box<dyn ContextStorage> = match std::fs::create_dir_all(&data_dir) {
        Ok(()) => Box::new(FileContextStorage::new(data_dir.join("current-user.json"))),
        Err(e) => {
            eprintln!(
                "could not create {}: {}; the demo user will not survive restarts",
                config.data_dir, e
            );
            Box::new(UnavailableContextStorage)
        }
    };

    let users = Arc::new(UserContextStore::new(storage, None));
    users.subscribe(|change| match change {
        ContextChange::Switched(ctx) => println!("context switched to {}", ctx.key),
        ContextChange::Cleared => println!("context cleared"),
    });

    let service = match (&config.flag_service_url, &config.flag_sdk_key) {
        (Some(url), Some(key)) => ServiceClient::http(
            url.clone(),
            key.clone(),
            config.flag_environment.clone(),
            Some(data_dir.join("flag-cache")),
        ),
        _ => {
            println!("flag service not configured, serving catalog defaults");
            ServiceClient::unconfigured()
        }
    };

    let flags = Arc::new(FlagClient::new(service));

    // first identify; an unreachable service just leaves defaults in place
    let initial = users.get_or_create_current();
    let ready = flags.identify(&initial).await;
    println!("current demo user is {} (flags ready: {})", initial.key, ready);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let app_state = state::AppState {
        config: config.clone(),
        users,
        flags,
        demo: Arc::new(demo::DemoData::seeded()),
        http,
    };

    let app = routes::routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.addr()).await.unwrap();

    println!("server is chilling at http://{}", config.addr());

    axum::serve(listener, app).await.unwrap();
}
