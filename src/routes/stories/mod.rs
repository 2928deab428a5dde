pub mod routes;

use serde::Deserialize;

// MODELS

#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    pub title: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoryRequest {
    pub title: Option<String>,
    pub situation: Option<String>,
    pub task: Option<String>,
    pub action: Option<String>,
    pub result: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct StoriesQuery {
    pub q: Option<String>,
    pub tag: Option<String>,
}

// HELPER FUNCTIONS

pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    Ok(())
}
