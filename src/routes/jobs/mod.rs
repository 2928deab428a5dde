pub mod routes;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::demo::jobs::JobStage;

// MODELS

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub company: String,
    pub role_title: String,
    pub stage: Option<JobStage>,
    pub applied_on: Option<NaiveDate>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub company: Option<String>,
    pub role_title: Option<String>,
    pub stage: Option<JobStage>,
    pub applied_on: Option<NaiveDate>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub q: Option<String>,
    pub stage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub errors: Vec<String>,
}

// HELPER FUNCTIONS

// Company and role are the two fields the pipeline cannot render without
pub fn validate_company(company: &str) -> Result<(), String> {
    if company.trim().is_empty() {
        return Err("Company cannot be empty".to_string());
    }

    Ok(())
}

pub fn validate_role_title(role_title: &str) -> Result<(), String> {
    if role_title.trim().is_empty() {
        return Err("Role title cannot be empty".to_string());
    }

    Ok(())
}
