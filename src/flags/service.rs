use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use super::context::UserContext;

/// Boundary to the hosted flag-evaluation service. The cache drives it
/// generically so tests can script responses; production wires in either
/// the HTTP client or the unconfigured stand-in.
pub trait FlagService: Send + Sync {
    /// Last snapshot this client cached for the context, if any. Read
    /// synchronously at identify time so surfaces can render optimistically.
    fn bootstrap(&self, ctx: &UserContext) -> Option<HashMap<String, bool>>;

    /// Authoritative evaluation for the context
    fn evaluate(
        &self,
        ctx: &UserContext,
    ) -> impl std::future::Future<Output = Result<HashMap<String, bool>, String>> + Send;

    /// Deliver a drained batch of analytics events
    fn send_events(
        &self,
        events: &[AnalyticsEvent],
    ) -> impl std::future::Future<Output = Result<(), String>> + Send;
}

// MODELS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    PageView,
    Custom,
}

/// One tracked event, keyed by the context that was current when it was
/// recorded. Buffered in memory and delivered on flush.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub context_key: String,
    pub kind: EventKind,
    pub name: String,
    pub properties: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn page_view(context_key: &str, page: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            context_key: context_key.to_string(),
            kind: EventKind::PageView,
            name: page.to_string(),
            properties: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn custom(context_key: &str, name: &str, properties: HashMap<String, String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            context_key: context_key.to_string(),
            kind: EventKind::Custom,
            name: name.to_string(),
            properties,
            timestamp: Utc::now(),
        }
    }
}

/// Flush-to-send buffer: events accumulate here until a flush drains them
/// toward the service in one batch.
pub struct EventBuffer {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn drain(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// WIRE TYPES

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest<'a> {
    environment: &'a str,
    context: &'a UserContext,
}

#[derive(Deserialize)]
struct EvaluateResponse {
    flags: HashMap<String, FlagPayload>,
}

#[derive(Deserialize)]
struct FlagPayload {
    enabled: bool,
}

#[derive(Serialize)]
struct EventsRequest<'a> {
    events: &'a [AnalyticsEvent],
}

// CLIENTS

/// HTTP client for the provider's SDK endpoints. Maintains a per-context
/// bootstrap cache on disk; its format is private to this client.
pub struct HttpFlagService {
    base_url: String,
    sdk_key: String,
    environment: String,
    cache_dir: Option<PathBuf>,
    http: reqwest::Client,
}

impl HttpFlagService {
    pub fn new(
        base_url: String,
        sdk_key: String,
        environment: String,
        cache_dir: Option<PathBuf>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url,
            sdk_key,
            environment,
            cache_dir,
            http,
        }
    }

    fn cache_path(&self, context_key: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", sanitize_cache_key(context_key))))
    }

    fn write_cache(&self, context_key: &str, values: &HashMap<String, bool>) {
        let Some(path) = self.cache_path(context_key) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("could not create flag cache dir: {}", e);
                return;
            }
        }
        match serde_json::to_string(values) {
            Ok(raw) => {
                if let Err(e) = fs::write(&path, raw) {
                    eprintln!("could not write flag cache: {}", e);
                }
            }
            Err(e) => eprintln!("could not serialize flag cache: {}", e),
        }
    }

    fn read_cache(&self, context_key: &str) -> Option<HashMap<String, bool>> {
        let path = self.cache_path(context_key)?;
        let raw = fs::read_to_string(path).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

impl FlagService for HttpFlagService {
    fn bootstrap(&self, ctx: &UserContext) -> Option<HashMap<String, bool>> {
        self.read_cache(&ctx.key)
    }

    async fn evaluate(&self, ctx: &UserContext) -> Result<HashMap<String, bool>, String> {
        let url = format!("{}/sdk/evaluate", self.base_url.trim_end_matches('/'));
        let request = EvaluateRequest {
            environment: &self.environment,
            context: ctx,
        };

        let response = self
            .http
            .post(&url)
            .header("x-sdk-key", &self.sdk_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("identify call failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("identify call returned {}", response.status()));
        }

        let body: EvaluateResponse = response
            .json()
            .await
            .map_err(|e| format!("identify response malformed: {}", e))?;

        let values: HashMap<String, bool> = body
            .flags
            .into_iter()
            .map(|(key, payload)| (key, payload.enabled))
            .collect();

        self.write_cache(&ctx.key, &values);
        Ok(values)
    }

    async fn send_events(&self, events: &[AnalyticsEvent]) -> Result<(), String> {
        let url = format!("{}/sdk/events", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header("x-sdk-key", &self.sdk_key)
            .json(&EventsRequest { events })
            .send()
            .await
            .map_err(|e| format!("event delivery failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("event delivery returned {}", response.status()));
        }
        Ok(())
    }
}

/// Stand-in used when no flag service is configured: never bootstraps,
/// every call reports unavailable, resolution stays on defaults.
pub struct UnconfiguredFlagService;

impl FlagService for UnconfiguredFlagService {
    fn bootstrap(&self, _ctx: &UserContext) -> Option<HashMap<String, bool>> {
        None
    }

    async fn evaluate(&self, _ctx: &UserContext) -> Result<HashMap<String, bool>, String> {
        Err("flag service not configured".to_string())
    }

    async fn send_events(&self, _events: &[AnalyticsEvent]) -> Result<(), String> {
        Err("flag service not configured".to_string())
    }
}

/// The service client production wires into the flag client
pub enum ServiceClient {
    Http(HttpFlagService),
    Unconfigured(UnconfiguredFlagService),
}

impl ServiceClient {
    pub fn http(
        base_url: String,
        sdk_key: String,
        environment: String,
        cache_dir: Option<PathBuf>,
    ) -> Self {
        ServiceClient::Http(HttpFlagService::new(base_url, sdk_key, environment, cache_dir))
    }

    pub fn unconfigured() -> Self {
        ServiceClient::Unconfigured(UnconfiguredFlagService)
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, ServiceClient::Http(_))
    }
}

impl FlagService for ServiceClient {
    fn bootstrap(&self, ctx: &UserContext) -> Option<HashMap<String, bool>> {
        match self {
            ServiceClient::Http(s) => s.bootstrap(ctx),
            ServiceClient::Unconfigured(s) => s.bootstrap(ctx),
        }
    }

    async fn evaluate(&self, ctx: &UserContext) -> Result<HashMap<String, bool>, String> {
        match self {
            ServiceClient::Http(s) => s.evaluate(ctx).await,
            ServiceClient::Unconfigured(s) => s.evaluate(ctx).await,
        }
    }

    async fn send_events(&self, events: &[AnalyticsEvent]) -> Result<(), String> {
        match self {
            ServiceClient::Http(s) => s.send_events(events).await,
            ServiceClient::Unconfigured(s) => s.send_events(events).await,
        }
    }
}

// HELPER FUNCTIONS

/// Context keys become file names for the bootstrap cache
fn sanitize_cache_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
