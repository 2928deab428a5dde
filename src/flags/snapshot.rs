use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use super::catalog::FLAG_CATALOG;
use super::context::UserContext;
use super::resolver::{self, FlagState};
use super::service::FlagService;

// MODELS

/// The complete set of flag values evaluated for one identified context.
/// Replaced wholesale on every identify, never merged field by field.
#[derive(Debug, Clone, Default)]
pub struct FlagSnapshot {
    values: HashMap<String, bool>,
}

impl FlagSnapshot {
    pub fn new(values: HashMap<String, bool>) -> Self {
        Self { values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    pub fn values(&self) -> &HashMap<String, bool> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Decides when a snapshot is trustworthy enough to drive gating. The gate
/// stays shut for an empty snapshot and for snapshots made up entirely of
/// keys the catalog does not know, so surfaces never flash wrong defaults.
pub struct ReadinessGate {
    recognized: Vec<&'static str>,
}

impl ReadinessGate {
    pub fn from_catalog() -> Self {
        Self {
            recognized: FLAG_CATALOG.iter().map(|d| d.key).collect(),
        }
    }

    #[cfg(test)]
    pub fn with_recognized(recognized: Vec<&'static str>) -> Self {
        Self { recognized }
    }

    pub fn is_ready(&self, snapshot: &FlagSnapshot) -> bool {
        if snapshot.is_empty() {
            return false;
        }
        snapshot
            .values()
            .keys()
            .any(|key| self.recognized.iter().any(|r| r == key))
    }
}

/// Holds the last-known snapshot for the current context. Single logical
/// writer (the identify flow), any number of readers; every write replaces
/// the whole map under the lock.
pub struct FlagSnapshotCache {
    snapshot: RwLock<FlagSnapshot>,
    issued: AtomicU64,
    gate: ReadinessGate,
}

impl FlagSnapshotCache {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(FlagSnapshot::empty()),
            issued: AtomicU64::new(0),
            gate: ReadinessGate::from_catalog(),
        }
    }

    /// Re-evaluate flags for `ctx`. Bootstraps from the service client's
    /// cached snapshot first so surfaces can render optimistically, then
    /// installs the authoritative response. Each call gets a sequence
    /// number; a response whose number is no longer the latest issued is
    /// discarded, so a slow response from an old identify can never clobber
    /// a newer one. Service failures resolve quietly with whatever snapshot
    /// is already in place.
    pub async fn identify<S: FlagService>(&self, service: &S, ctx: &UserContext) -> bool {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(bootstrap) = service.bootstrap(ctx) {
            self.install(seq, bootstrap);
        }

        match service.evaluate(ctx).await {
            Ok(values) => {
                self.install(seq, values);
            }
            Err(e) => {
                eprintln!("flag evaluation failed for {}: {}", ctx.key, e);
            }
        }

        self.is_ready()
    }

    /// Drop the snapshot and supersede any identify still in flight.
    pub fn reset(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut snapshot) = self.snapshot.write() {
            *snapshot = FlagSnapshot::empty();
        }
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot
            .read()
            .map(|snap| self.gate.is_ready(&snap))
            .unwrap_or(false)
    }

    /// Snapshot value for `key`, falling back to `default`. Safe to call
    /// before the gate opens.
    pub fn get(&self, key: &str, default: bool) -> bool {
        self.snapshot
            .read()
            .map(|snap| resolver::resolve(key, &snap, default))
            .unwrap_or(default)
    }

    /// Tri-state view for loading-aware surfaces
    pub fn state(&self, key: &str, default: bool) -> FlagState {
        self.snapshot
            .read()
            .map(|snap| resolver::resolve_state(key, &snap, self.gate.is_ready(&snap), default))
            .unwrap_or(FlagState::NotReady)
    }

    /// Clone of the current snapshot for display surfaces
    pub fn current(&self) -> FlagSnapshot {
        self.snapshot
            .read()
            .map(|snap| snap.clone())
            .unwrap_or_default()
    }

    // The stale-response guard: writes happen under the lock and only when
    // the tag still matches the latest issued sequence number.
    fn install(&self, seq: u64, values: HashMap<String, bool>) -> bool {
        let Ok(mut snapshot) = self.snapshot.write() else {
            return false;
        };
        if seq != self.issued.load(Ordering::SeqCst) {
            return false;
        }
        *snapshot = FlagSnapshot::new(values);
        true
    }
}

impl Default for FlagSnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::context::demo_roster;
    use crate::flags::service::FlagService;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn values_of(pairs: &[(&str, bool)]) -> HashMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Service stub that answers per context key, optionally holding a
    /// response until the test releases it.
    struct ScriptedService {
        responses: HashMap<String, HashMap<String, bool>>,
        hold: Option<(String, Arc<Notify>)>,
        bootstrap: Option<HashMap<String, bool>>,
    }

    impl ScriptedService {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                hold: None,
                bootstrap: None,
            }
        }

        fn respond(mut self, ctx_key: &str, pairs: &[(&str, bool)]) -> Self {
            self.responses.insert(ctx_key.to_string(), values_of(pairs));
            self
        }

        fn hold_response(mut self, ctx_key: &str, gate: Arc<Notify>) -> Self {
            self.hold = Some((ctx_key.to_string(), gate));
            self
        }

        fn with_bootstrap(mut self, pairs: &[(&str, bool)]) -> Self {
            self.bootstrap = Some(values_of(pairs));
            self
        }
    }

    impl FlagService for ScriptedService {
        fn bootstrap(&self, _ctx: &UserContext) -> Option<HashMap<String, bool>> {
            self.bootstrap.clone()
        }

        async fn evaluate(&self, ctx: &UserContext) -> Result<HashMap<String, bool>, String> {
            if let Some((held_key, gate)) = &self.hold {
                if *held_key == ctx.key {
                    gate.notified().await;
                }
            }
            self.responses
                .get(&ctx.key)
                .cloned()
                .ok_or_else(|| "service unavailable".to_string())
        }

        async fn send_events(
            &self,
            _events: &[crate::flags::service::AnalyticsEvent],
        ) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_gate_needs_a_recognized_key() {
        let gate = ReadinessGate::from_catalog();
        assert!(!gate.is_ready(&FlagSnapshot::empty()));
        assert!(gate.is_ready(&FlagSnapshot::new(values_of(&[("show-jobs-page", true)]))));
        // a recognized key that evaluated to off still opens the gate
        assert!(gate.is_ready(&FlagSnapshot::new(values_of(&[("show-admin-page", false)]))));
        // unknown keys alone do not
        assert!(!gate.is_ready(&FlagSnapshot::new(values_of(&[("mystery-flag", true)]))));
    }

    #[test]
    fn test_gate_with_custom_recognized_set() {
        let gate = ReadinessGate::with_recognized(vec!["only-this"]);
        assert!(gate.is_ready(&FlagSnapshot::new(values_of(&[("only-this", false)]))));
        assert!(!gate.is_ready(&FlagSnapshot::new(values_of(&[("show-jobs-page", true)]))));
    }

    #[test]
    fn test_get_before_ready_returns_defaults() {
        let cache = FlagSnapshotCache::new();
        assert!(!cache.is_ready());
        assert!(cache.get("show-jobs-page", true));
        assert!(!cache.get("show-jobs-page", false));
        assert_eq!(cache.state("show-jobs-page", true), FlagState::NotReady);
    }

    #[tokio::test]
    async fn test_identify_installs_snapshot() {
        let roster = demo_roster();
        let service = ScriptedService::new().respond(
            &roster[0].key,
            &[("show-jobs-page", true), ("show-admin-page", false)],
        );
        let cache = FlagSnapshotCache::new();

        let ready = cache.identify(&service, &roster[0]).await;
        assert!(ready);
        assert!(cache.is_ready());
        assert!(cache.get("show-jobs-page", false));
        assert!(!cache.get("show-admin-page", true));
    }

    #[tokio::test]
    async fn test_identify_failure_keeps_existing_snapshot() {
        let roster = demo_roster();
        let service = ScriptedService::new().respond(&roster[0].key, &[("show-jobs-page", true)]);
        let cache = FlagSnapshotCache::new();
        cache.identify(&service, &roster[0]).await;

        // roster[1] has no scripted response: evaluate fails
        let ready = cache.identify(&service, &roster[1]).await;
        assert!(ready, "previous snapshot still present");
        assert!(cache.get("show-jobs-page", false));
    }

    #[tokio::test]
    async fn test_identify_failure_on_empty_cache_stays_not_ready() {
        let roster = demo_roster();
        let service = ScriptedService::new();
        let cache = FlagSnapshotCache::new();

        let ready = cache.identify(&service, &roster[0]).await;
        assert!(!ready);
        assert!(!cache.is_ready());
    }

    #[tokio::test]
    async fn test_bootstrap_applies_before_authoritative_response() {
        let roster = demo_roster();
        let gate = Arc::new(Notify::new());
        let service = ScriptedService::new()
            .with_bootstrap(&[("show-jobs-page", false)])
            .respond(&roster[0].key, &[("show-jobs-page", true)])
            .hold_response(&roster[0].key, gate.clone());
        let cache = Arc::new(FlagSnapshotCache::new());

        let task = {
            let cache = cache.clone();
            let ctx = roster[0].clone();
            tokio::spawn(async move { cache.identify(&service, &ctx).await })
        };

        // bootstrap snapshot is visible while the live response is held
        tokio::task::yield_now().await;
        assert!(cache.is_ready());
        assert!(!cache.get("show-jobs-page", true));

        gate.notify_one();
        task.await.unwrap();
        // authoritative response replaced the bootstrap in place
        assert!(cache.get("show-jobs-page", false));
    }

    #[tokio::test]
    async fn test_last_write_wins_across_racing_identifies() {
        let roster = demo_roster();
        let free = roster[2].clone();
        let premium = roster[0].clone();

        let gate = Arc::new(Notify::new());
        let service = Arc::new(
            ScriptedService::new()
                .respond(&free.key, &[("premium-analytics", false), ("show-jobs-page", true)])
                .respond(&premium.key, &[("premium-analytics", true), ("show-jobs-page", true)])
                .hold_response(&free.key, gate.clone()),
        );
        let cache = Arc::new(FlagSnapshotCache::new());

        // identify(free) is issued first but its response is held back
        let stale = {
            let cache = cache.clone();
            let service = service.clone();
            let ctx = free.clone();
            tokio::spawn(async move { cache.identify(service.as_ref(), &ctx).await })
        };
        tokio::task::yield_now().await;

        // identify(premium) is issued second and completes immediately
        cache.identify(service.as_ref(), &premium).await;
        assert!(cache.get("premium-analytics", false));

        // now let the stale free-tier response arrive; it must be discarded
        gate.notify_one();
        stale.await.unwrap();
        assert!(
            cache.get("premium-analytics", false),
            "stale response must not overwrite the newer snapshot"
        );
    }

    #[tokio::test]
    async fn test_reset_clears_and_supersedes() {
        let roster = demo_roster();
        let gate = Arc::new(Notify::new());
        let service = Arc::new(
            ScriptedService::new()
                .respond(&roster[0].key, &[("show-jobs-page", true)])
                .hold_response(&roster[0].key, gate.clone()),
        );
        let cache = Arc::new(FlagSnapshotCache::new());

        let held = {
            let cache = cache.clone();
            let service = service.clone();
            let ctx = roster[0].clone();
            tokio::spawn(async move { cache.identify(service.as_ref(), &ctx).await })
        };
        tokio::task::yield_now().await;

        cache.reset();
        gate.notify_one();
        held.await.unwrap();

        // the in-flight response was superseded by the reset
        assert!(!cache.is_ready());
        assert!(cache.current().is_empty());
    }
}
