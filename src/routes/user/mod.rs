pub mod routes;

use serde::{Deserialize, Serialize};

use crate::flags::context::{SubscriptionTier, UserContext};

// MODELS

#[derive(Debug, Deserialize)]
pub struct SwitchRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub tier: SubscriptionTier,
}

/// Cross-view change feed payload: `context: null` means another view
/// cleared the stored user
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub context: Option<UserContext>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStateResponse {
    pub user: UserContext,
    pub flags_ready: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub user: Option<UserContext>,
    pub flags_ready: bool,
}
