use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub flag_service_url: Option<String>,
    pub flag_sdk_key: Option<String>,
    pub flag_environment: String,
    pub flag_management_url: Option<String>,
    pub flag_management_token: Option<String>,
    pub flag_project_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenv().is_ok();

        let port = env::var("PORT")
            .expect("PORT missing, it is required")
            .parse()
            .expect("PORT must be a valid u16 number");

        Self {
            port,
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| ".careerstack".to_string()),
            flag_service_url: optional("FLAG_SERVICE_URL").map(strip_trailing_slash),
            flag_sdk_key: optional("FLAG_SDK_KEY"),
            flag_environment: optional("FLAG_ENVIRONMENT")
                .unwrap_or_else(|| "production".to_string()),
            flag_management_url: optional("FLAG_MANAGEMENT_URL").map(strip_trailing_slash),
            flag_management_token: optional("FLAG_MANAGEMENT_TOKEN"),
            flag_project_key: optional("FLAG_PROJECT_KEY"),
        }
    }

    pub fn addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

/// Blank values count as unset
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn strip_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
