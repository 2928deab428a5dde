pub mod routes;

use serde::Deserialize;

// MODELS

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrepRequest {
    pub company: String,
    pub summary: String,
    #[serde(default)]
    pub talking_points: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrepRequest {
    pub company: Option<String>,
    pub summary: Option<String>,
    pub talking_points: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct PrepQuery {
    pub company: Option<String>,
}
