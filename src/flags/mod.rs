pub mod catalog;
pub mod context;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod targeting;

use std::collections::HashMap;

use context::UserContext;
use resolver::FlagState;
use service::{AnalyticsEvent, EventBuffer, FlagService, ServiceClient};
use snapshot::{FlagSnapshot, FlagSnapshotCache};

/// What the rest of the service talks to: snapshot cache, service client
/// and the event buffer behind one handle.
pub struct FlagClient {
    cache: FlagSnapshotCache,
    service: ServiceClient,
    events: EventBuffer,
}

impl FlagClient {
    pub fn new(service: ServiceClient) -> Self {
        Self {
            cache: FlagSnapshotCache::new(),
            service,
            events: EventBuffer::new(),
        }
    }

    /// Re-evaluate flags for the context; returns readiness afterwards
    pub async fn identify(&self, ctx: &UserContext) -> bool {
        self.cache.identify(&self.service, ctx).await
    }

    /// Drop the snapshot (reset flows); the next identify rebuilds it
    pub fn reset(&self) {
        self.cache.reset();
    }

    pub fn is_ready(&self) -> bool {
        self.cache.is_ready()
    }

    pub fn get(&self, key: &str, default: bool) -> bool {
        self.cache.get(key, default)
    }

    /// Effective value with the catalog default as fallback; this is what
    /// the page gates call
    pub fn enabled(&self, key: &str) -> bool {
        self.cache.get(key, catalog::default_for(key))
    }

    /// Tri-state view with the catalog default as fallback
    pub fn state(&self, key: &str) -> FlagState {
        self.cache.state(key, catalog::default_for(key))
    }

    pub fn snapshot(&self) -> FlagSnapshot {
        self.cache.current()
    }

    pub fn service_configured(&self) -> bool {
        self.service.is_configured()
    }

    pub fn track_page_view(&self, context_key: &str, page: &str) {
        self.events.record(AnalyticsEvent::page_view(context_key, page));
    }

    pub fn track_custom(&self, context_key: &str, name: &str, properties: HashMap<String, String>) {
        self.events
            .record(AnalyticsEvent::custom(context_key, name, properties));
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drain the buffer toward the service. Returns how many events were
    /// drained; delivery failures are logged and the events dropped, never
    /// surfaced to callers.
    pub async fn flush_events(&self) -> usize {
        let batch = self.events.drain();
        if batch.is_empty() {
            return 0;
        }
        if let Err(e) = self.service.send_events(&batch).await {
            eprintln!("dropping {} events: {}", batch.len(), e);
        }
        batch.len()
    }
}
