use std::sync::Arc;

use crate::config::Config;
use crate::demo::DemoData;
use crate::flags::store::UserContextStore;
use crate::flags::FlagClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<UserContextStore>,
    pub flags: Arc<FlagClient>,
    pub demo: Arc<DemoData>,
    /// Shared client for the read-through proxies
    pub http: reqwest::Client,
}
