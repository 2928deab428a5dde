pub mod routes;

use serde::Serialize;
use std::collections::HashMap;

use crate::flags::resolver::FlagState;
use crate::flags::targeting::TargetingRule;

// MODELS

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub ready: bool,
    pub flags: HashMap<String, bool>,
}

/// Catalog descriptor joined with the value the resolver would serve now
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub default_value: bool,
    pub value: bool,
    pub state: FlagState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub rule: TargetingRule,
    pub matched: bool,
}

/// Payload behind the "how targeting picked your flag" demo card
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingDemoResponse {
    pub flag_key: &'static str,
    pub state: FlagState,
    pub enabled: bool,
    pub rules: Vec<RuleOutcome>,
}
